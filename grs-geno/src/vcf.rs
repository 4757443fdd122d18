//! VCF reader with coordinate lookup.
//!
//! Reads plain or gzipped text VCF files, keeps the records in memory
//! with a (chromosome, position) index, and answers genotype queries
//! with hard-call allele strings resolved against REF/ALT.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::traits::{AlleleCall, GenotypeSource};

/// Open a possibly gzipped text file for buffered reading.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reader for one VCF file.
pub struct VcfReader {
    path: PathBuf,
    sample_ids: Vec<String>,
    /// Raw record lines, in file order.
    records: Vec<String>,
    /// (chrom, pos) -> indices into `records`.
    coord_index: HashMap<(String, u64), Vec<usize>>,
}

impl VcfReader {
    /// Open a VCF file and index its records by coordinate.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = open_text(&path)?;

        let mut sample_ids = Vec::new();
        let mut records = Vec::new();
        let mut coord_index: HashMap<(String, u64), Vec<usize>> = HashMap::new();

        for line in reader.lines() {
            let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
            if line.starts_with("##") {
                continue;
            }
            if let Some(header) = line.strip_prefix('#') {
                let fields: Vec<&str> = header.split('\t').collect();
                if fields.len() > 9 {
                    sample_ids = fields[9..].iter().map(|s| s.to_string()).collect();
                }
                continue;
            }

            let mut it = line.split('\t');
            let chrom = match it.next() {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => continue,
            };
            let pos: u64 = match it.next().and_then(|p| p.parse().ok()) {
                Some(p) => p,
                None => bail!("Malformed position in {}: {}", path.display(), line),
            };

            coord_index
                .entry((chrom, pos))
                .or_default()
                .push(records.len());
            records.push(line);
        }

        if sample_ids.is_empty() {
            bail!("No sample columns found in {}", path.display());
        }
        debug!(
            "Indexed {} records for {} samples from {}",
            records.len(),
            sample_ids.len(),
            path.display()
        );

        Ok(Self {
            path,
            sample_ids,
            records,
            coord_index,
        })
    }

    /// Parse one record line into per-sample allele calls.
    fn parse_record_calls(&self, line: &str) -> Result<Vec<AlleleCall>> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 10 + self.sample_ids.len() - 1 {
            bail!(
                "VCF record in {} has {} fields, expected {}",
                self.path.display(),
                fields.len(),
                9 + self.sample_ids.len()
            );
        }

        // Allele strings addressed by GT indices: 0 = REF, 1.. = ALTs.
        let mut allele_strings = vec![fields[3].to_string()];
        allele_strings.extend(fields[4].split(',').map(|s| s.to_string()));

        let gt_idx = fields[8]
            .split(':')
            .position(|f| f == "GT")
            .with_context(|| {
                format!("No GT field in record at {}:{}", fields[0], fields[1])
            })?;

        let mut calls = Vec::with_capacity(self.sample_ids.len());
        for sample_field in &fields[9..9 + self.sample_ids.len()] {
            let gt = sample_field.split(':').nth(gt_idx).unwrap_or(".");
            calls.push(parse_gt_alleles(gt, &allele_strings)?);
        }
        Ok(calls)
    }
}

/// Parse a GT value ("0/1", "1|0", "./.") into allele base strings.
///
/// Any missing allele makes the whole call a no-call.
fn parse_gt_alleles(gt: &str, allele_strings: &[String]) -> Result<AlleleCall> {
    let sep = if gt.contains('|') { '|' } else { '/' };
    let mut alleles = Vec::with_capacity(2);
    for part in gt.split(sep) {
        if part == "." {
            return Ok(None);
        }
        let idx: usize = part
            .parse()
            .with_context(|| format!("Invalid GT allele index: {}", gt))?;
        let base = allele_strings
            .get(idx)
            .with_context(|| format!("GT index {} out of range for record", idx))?;
        alleles.push(base.clone());
    }
    Ok(Some(alleles))
}

impl GenotypeSource for VcfReader {
    fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    fn query(&mut self, chrom: &str, pos: u64, id: &str) -> Result<Option<Vec<AlleleCall>>> {
        let indices = match self.coord_index.get(&(chrom.to_string(), pos)) {
            Some(indices) => indices,
            None => return Ok(None),
        };

        for &i in indices {
            let line = &self.records[i];
            let record_id = line.split('\t').nth(2).unwrap_or(".");
            if record_id == id {
                let calls = self.parse_record_calls(line)?;
                return Ok(Some(calls));
            }
        }

        Ok(None)
    }
}
