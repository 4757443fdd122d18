//! Property tests over feature contributions and proxy handling.

use proptest::prelude::*;

use grs_core::model::feature::ScoringFeature;
use grs_core::model::variant::Variant;
use grs_core::resolver::{align_alleles, select_proxy};
use grs_geno::AlleleCall;

fn allele() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "A".to_string(),
        "C".to_string(),
        "G".to_string(),
        "T".to_string(),
    ])
}

fn call() -> impl Strategy<Value = AlleleCall> {
    prop::option::of(prop::collection::vec(allele(), 2))
}

fn variant(id: String, genotyped: bool, info_score: f64, maf: f64) -> Variant {
    Variant {
        id,
        chrom: "1".into(),
        pos: 100,
        ref_allele: "A".into(),
        alt_allele: "G".into(),
        maf,
        genotyped,
        info_score,
    }
}

proptest! {
    /// An additive feature only ever contributes 0, w, or 2w.
    #[test]
    fn additive_contribution_is_a_copy_count(
        effect in allele(),
        weight in 0.01f64..10.0,
        genotype in call(),
    ) {
        let feature = ScoringFeature::Additive {
            marker: "rs1".into(),
            effect_allele: effect.clone(),
            weight,
        };
        let contribution = feature.contribution(&[genotype.clone()]);

        let copies = genotype
            .as_deref()
            .map(|alleles| alleles.iter().filter(|a| **a == effect).count())
            .unwrap_or(0);
        prop_assert_eq!(contribution, weight * copies as f64);
        prop_assert!(copies <= 2);
    }

    /// A haplotype feature is all or nothing.
    #[test]
    fn haplotype_contribution_is_binary(
        weight in 0.01f64..10.0,
        g1 in call(),
        g2 in call(),
    ) {
        let feature = ScoringFeature::Haplotype {
            name: "hap".into(),
            markers: vec!["rs1".into(), "rs2".into()],
            alleles: vec![
                vec!["A".into(), "G".into()],
                vec!["T".into(), "T".into()],
            ],
            weight,
        };
        let contribution = feature.contribution(&[g1, g2]);
        prop_assert!(contribution == 0.0 || contribution == weight);
    }

    /// Selection does not depend on the order candidates arrive in.
    #[test]
    fn proxy_selection_ignores_pool_order(
        scores in prop::collection::vec(0.0f64..1.0, 1..6),
        original_score in 0.0f64..1.0,
    ) {
        let original = variant("rs0".into(), false, original_score, 0.2);
        let candidates: Vec<Variant> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| variant(format!("rs{}", i + 1), false, *s, 0.2))
            .collect();

        let forward: Vec<&Variant> = candidates.iter().collect();
        let backward: Vec<&Variant> = candidates.iter().rev().collect();
        prop_assert_eq!(
            select_proxy(&original, &forward),
            select_proxy(&original, &backward)
        );
    }

    /// Alignment returns the proxy's own alleles, possibly swapped,
    /// and is stable across repeated calls.
    #[test]
    fn alignment_permutes_proxy_alleles(
        original_maf in 0.0f64..=1.0,
        proxy_maf in 0.0f64..=1.0,
    ) {
        let original = variant("rs0".into(), false, 0.4, original_maf);
        let proxy = variant("rs1".into(), true, f64::NAN, proxy_maf);

        let (r, a) = align_alleles(&original, &proxy);
        let kept = (r.clone(), a.clone())
            == (proxy.ref_allele.clone(), proxy.alt_allele.clone());
        let swapped = (r.clone(), a.clone())
            == (proxy.alt_allele.clone(), proxy.ref_allele.clone());
        prop_assert!(kept || swapped);
        prop_assert_eq!(align_alleles(&original, &proxy), (r, a));
    }
}
