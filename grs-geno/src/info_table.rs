//! Variant-info tables exported from the genotyping pipeline.
//!
//! One table per genotype source, plain or gzipped. Header block:
//!
//! ```text
//! # vcf: cohort_chr1.vcf.gz
//! # version: 1.0.0
//! CHR  BP  ID  REF  ALT  MAF  TYPED  INFO
//! ```
//!
//! followed by one tab-separated record per variant. TYPED is 0/1,
//! INFO is the imputation score (NA when the variant was genotyped).

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::vcf::open_text;

/// Info-table format version this build reads and writes.
pub const FORMAT_VERSION: &str = "1.0.0";

const COLUMNS: &str = "CHR\tBP\tID\tREF\tALT\tMAF\tTYPED\tINFO";

/// One variant record from an info table.
#[derive(Debug, Clone)]
pub struct InfoRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub maf: f64,
    pub genotyped: bool,
    /// Imputation quality score, NaN when not applicable.
    pub info_score: f64,
}

/// Streaming reader for one info table.
pub struct InfoTableReader {
    path: PathBuf,
    /// Genotype-source name declared in the header.
    pub source: String,
    reader: Box<dyn BufRead + Send>,
    line_number: usize,
}

impl std::fmt::Debug for InfoTableReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoTableReader")
            .field("path", &self.path)
            .field("source", &self.source)
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}

impl InfoTableReader {
    /// Open a table and validate its header block.
    ///
    /// A declared format version other than [`FORMAT_VERSION`] is fatal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_text(&path)?;

        let mut source = None;
        let mut version = None;
        let mut line_number = 0;

        // Header block: '# key: value' lines, then the column header.
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                bail!("Unexpected end of header in {}", path.display());
            }
            line_number += 1;
            let line = line.trim_end();

            if let Some(rest) = line.strip_prefix('#') {
                let rest = rest.trim();
                if let Some(value) = rest.strip_prefix("vcf:") {
                    source = Some(value.trim().to_string());
                } else if let Some(value) = rest.strip_prefix("version:") {
                    version = Some(value.trim().to_string());
                }
                continue;
            }

            // Column header line ends the block.
            break;
        }

        let source = source
            .with_context(|| format!("No '# vcf:' header in {}", path.display()))?;
        let version = version
            .with_context(|| format!("No '# version:' header in {}", path.display()))?;
        if version != FORMAT_VERSION {
            bail!(
                "Info table {} declares format version {}, expected {}",
                path.display(),
                version,
                FORMAT_VERSION
            );
        }

        Ok(Self {
            path,
            source,
            reader,
            line_number,
        })
    }

    /// Read the next record, `None` at end of file.
    pub fn read_record(&mut self) -> Result<Option<InfoRecord>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 8 {
                bail!(
                    "{} line {}: {} columns found, 8 expected",
                    self.path.display(),
                    self.line_number,
                    fields.len()
                );
            }

            let pos: u64 = fields[1].parse().with_context(|| {
                format!("{} line {}: invalid BP", self.path.display(), self.line_number)
            })?;
            let maf: f64 = fields[5].parse().with_context(|| {
                format!("{} line {}: invalid MAF", self.path.display(), self.line_number)
            })?;
            let genotyped = match fields[6] {
                "1" => true,
                "0" => false,
                other => bail!(
                    "{} line {}: invalid TYPED flag '{}'",
                    self.path.display(),
                    self.line_number,
                    other
                ),
            };
            let info_score = match fields[7] {
                "NA" | "na" | "." | "" => f64::NAN,
                s => s.parse().with_context(|| {
                    format!(
                        "{} line {}: invalid INFO score",
                        self.path.display(),
                        self.line_number
                    )
                })?,
            };

            return Ok(Some(InfoRecord {
                chrom: fields[0].to_string(),
                pos,
                id: fields[2].to_string(),
                ref_allele: fields[3].to_string(),
                alt_allele: fields[4].to_string(),
                maf,
                genotyped,
                info_score,
            }));
        }
    }
}

/// Write an info table, gzipped when the path ends in .gz.
pub fn write_info_table<P: AsRef<Path>>(
    path: P,
    source: &str,
    records: &[InfoRecord],
) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer: Box<dyn Write> = if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
    } else {
        Box::new(BufWriter::new(file))
    };

    writeln!(writer, "# vcf: {}", source)?;
    writeln!(writer, "# version: {}", FORMAT_VERSION)?;
    writeln!(writer, "{}", COLUMNS)?;
    for r in records {
        let score = if r.info_score.is_nan() {
            "NA".to_string()
        } else {
            format!("{}", r.info_score)
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.chrom,
            r.pos,
            r.id,
            r.ref_allele,
            r.alt_allele,
            r.maf,
            if r.genotyped { 1 } else { 0 },
            score
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// How to find the typed flag and imputation score in a VCF.
#[derive(Debug, Clone)]
pub struct VcfExtractSettings {
    /// Flag marking directly genotyped variants.
    pub typed_flag: String,
    /// Whether the flag lives in FILTER (true) or INFO (false).
    pub typed_in_filter: bool,
    /// INFO key holding the imputation score.
    pub score_key: String,
}

/// Extract info records from a VCF file.
///
/// MAF is estimated as the ALT allele frequency over called alleles.
/// Multi-allelic and monomorphic records are skipped, as are records
/// outside `targets` when a target set is given.
pub fn extract_from_vcf<P: AsRef<Path>>(
    vcf_path: P,
    settings: &VcfExtractSettings,
    targets: Option<&HashSet<String>>,
) -> Result<Vec<InfoRecord>> {
    let path = vcf_path.as_ref();
    let reader = open_text(path)?;
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 10 {
            continue;
        }

        let id = fields[2];
        if let Some(targets) = targets {
            if !targets.contains(id) {
                continue;
            }
        }

        let ref_allele = fields[3];
        let alts: Vec<&str> = fields[4].split(',').collect();
        if alts.len() != 1 || alts[0] == ref_allele {
            continue;
        }
        let alt_allele = alts[0];

        let typed = if settings.typed_in_filter {
            fields[6].split(';').any(|f| f == settings.typed_flag)
        } else {
            info_has_flag(fields[7], &settings.typed_flag)
        };
        let info_score = if typed {
            f64::NAN
        } else {
            info_value(fields[7], &settings.score_key).unwrap_or(f64::NAN)
        };

        let gt_idx = match fields[8].split(':').position(|f| f == "GT") {
            Some(i) => i,
            None => continue,
        };

        let mut n_alt = 0u64;
        let mut n_all = 0u64;
        for sample_field in &fields[9..] {
            let gt = sample_field.split(':').nth(gt_idx).unwrap_or(".");
            let sep = if gt.contains('|') { '|' } else { '/' };
            for part in gt.split(sep) {
                match part {
                    "." => {}
                    "0" => n_all += 1,
                    _ => {
                        n_alt += 1;
                        n_all += 1;
                    }
                }
            }
        }
        if n_all == 0 {
            continue;
        }
        let maf = n_alt as f64 / n_all as f64;

        let pos: u64 = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => bail!("Malformed position in {}: {}", path.display(), line),
        };

        records.push(InfoRecord {
            chrom: fields[0].to_string(),
            pos,
            id: id.to_string(),
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            maf,
            genotyped: typed,
            info_score,
        });
    }

    Ok(records)
}

fn info_has_flag(info: &str, flag: &str) -> bool {
    info.split(';').any(|entry| {
        entry == flag || entry.split('=').next() == Some(flag)
    })
}

fn info_value(info: &str, key: &str) -> Option<f64> {
    info.split(';').find_map(|entry| {
        let (k, v) = entry.split_once('=')?;
        if k == key {
            v.parse().ok()
        } else {
            None
        }
    })
}
