//! End-to-end scoring over generated files.
//!
//! Exercises the whole chain: score definition -> feature map ->
//! proxy ids -> catalog -> aligned proxies -> VCF-backed computer.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use grs_core::catalog::CatalogBuilder;
use grs_core::computer::ScoreComputer;
use grs_core::resolver::build_proxy_map;
use grs_core::score::{RiskScore, VariantFeatureMap};
use grs_geno::info_table::{write_info_table, InfoRecord};
use grs_geno::proxy_file::read_proxy_ids;
use grs_geno::vcf::VcfReader;

const SOURCE: &str = "cohort.vcf";

fn record(
    id: &str,
    pos: u64,
    r: &str,
    a: &str,
    maf: f64,
    genotyped: bool,
    score: f64,
) -> InfoRecord {
    InfoRecord {
        chrom: "1".into(),
        pos,
        id: id.into(),
        ref_allele: r.into(),
        alt_allele: a.into(),
        maf,
        genotyped,
        info_score: score,
    }
}

fn write_fixtures(dir: &Path) {
    let mut vcf = File::create(dir.join("cohort.vcf")).unwrap();
    writeln!(vcf, "##fileformat=VCFv4.2").unwrap();
    writeln!(
        vcf,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2"
    )
    .unwrap();
    writeln!(vcf, "1\t100\trs1\tA\tG\t.\tPASS\t.\tGT\t0/1\t1/1").unwrap();
    writeln!(vcf, "1\t200\trs2\tA\tG\t.\tPASS\t.\tGT\t0/0\t0/1").unwrap();
    writeln!(vcf, "1\t300\trs3\tT\tC\t.\tPASS\t.\tGT\t0/1\t0/0").unwrap();
    writeln!(vcf, "1\t400\trs40\tG\tA\t.\tPASS\t.\tGT\t0/0\t0/1").unwrap();

    write_info_table(
        dir.join("cohort.info.txt"),
        SOURCE,
        &[
            record("rs1", 100, "A", "G", 0.3, true, f64::NAN),
            record("rs2", 200, "A", "G", 0.3, true, f64::NAN),
            record("rs3", 300, "T", "C", 0.3, true, f64::NAN),
            // Poorly imputed, substituted by rs40 (same MAF side, so
            // the proxy's labels are kept: C->G, T->A).
            record("rs4", 150, "C", "T", 0.2, false, 0.4),
            record("rs40", 400, "G", "A", 0.25, true, f64::NAN),
        ],
    )
    .unwrap();

    let mut score = File::create(dir.join("score.txt")).unwrap();
    writeln!(score, "# name: demo").unwrap();
    writeln!(score, "# version: 1.0").unwrap();
    writeln!(score, "rs1\trs1\tA\t1.0\tA").unwrap();
    writeln!(score, "rs2,rs3\thapA\tA|A,T|C\t2.0\tH").unwrap();
    writeln!(score, "rs4\trs4\tC\t0.5\tA").unwrap();

    let mut proxies = File::create(dir.join("proxies.txt")).unwrap();
    writeln!(proxies, "id\tproxy").unwrap();
    writeln!(proxies, "rs4\trs40").unwrap();
}

fn run_pipeline(dir: &Path) -> (Vec<String>, Vec<f64>) {
    let score = RiskScore::parse(dir.join("score.txt")).unwrap();
    let feature_map = VariantFeatureMap::new(&score).unwrap();
    let proxy_ids = read_proxy_ids(dir.join("proxies.txt")).unwrap();

    // Targets are the score's markers, pre-substituted through the
    // known proxy ids, plus the originals so proxies can be aligned.
    let mut targets: HashSet<String> = feature_map.variant_ids().clone();
    targets.extend(proxy_ids.values().cloned());

    let builder = CatalogBuilder::new(Some(targets));
    builder.load(dir.join("cohort.info.txt")).unwrap();
    let catalog = builder.finish();

    let proxies = build_proxy_map(&proxy_ids, &catalog).unwrap();

    let reader = VcfReader::open(dir.join("cohort.vcf")).unwrap();
    let computer = ScoreComputer::new(vec![(SOURCE.to_string(), reader)]).unwrap();
    let scores = computer.run(&feature_map, &catalog, &proxies).unwrap();

    (computer.sample_names().to_vec(), scores)
}

#[test]
fn test_end_to_end_scores() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let (samples, scores) = run_pipeline(dir.path());
    assert_eq!(samples, vec!["S1", "S2"]);

    // S1: rs1 A/G -> 1.0; hapA matches (rs2 A/A, rs3 T/C) -> 2.0;
    //     rs4 via rs40 G/G -> C/C, two effect copies -> 1.0.
    // S2: rs1 G/G -> 0; hapA fails at rs2 -> 0;
    //     rs4 via rs40 G/A -> C/T, one effect copy -> 0.5.
    assert_eq!(scores, vec![4.0, 0.5]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let (_, first) = run_pipeline(dir.path());
    let (_, second) = run_pipeline(dir.path());
    assert_eq!(first, second);
}

#[test]
fn test_thread_count_does_not_change_scores() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| run_pipeline(dir.path()).1);
    let parallel = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| run_pipeline(dir.path()).1);
    assert_eq!(single, parallel);
}

#[test]
fn test_score_needing_unknown_marker_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let mut score = File::create(dir.path().join("score.txt")).unwrap();
    writeln!(score, "rs999\trs999\tA\t1.0\tA").unwrap();

    let score = RiskScore::parse(dir.path().join("score.txt")).unwrap();
    let feature_map = VariantFeatureMap::new(&score).unwrap();

    let builder = CatalogBuilder::new(Some(feature_map.variant_ids().clone()));
    builder.load(dir.path().join("cohort.info.txt")).unwrap();
    let catalog = builder.finish();

    let reader = VcfReader::open(dir.path().join("cohort.vcf")).unwrap();
    let computer = ScoreComputer::new(vec![(SOURCE.to_string(), reader)]).unwrap();
    let err = computer
        .run(&feature_map, &catalog, &Default::default())
        .unwrap_err();
    assert!(err.to_string().contains("rs999"));
}
