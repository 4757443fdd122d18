//! Proxy mapping files.
//!
//! Two tab-separated columns, `id` and `proxy`, one header line. Each
//! original id may appear at most once.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::vcf::open_text;

/// Parse a proxy file into an id -> proxy id map.
pub fn read_proxy_ids<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    let mut result = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            bail!(
                "{} line {}: {} columns found, two expected: id, proxy",
                path.display(),
                i + 1,
                fields.len()
            );
        }

        // First line is the header.
        if i == 0 {
            continue;
        }

        let snp_id = fields[0].to_string();
        let proxy_id = fields[1].to_string();
        if result.contains_key(&snp_id) {
            bail!("Two proxies found for {}", snp_id);
        }
        result.insert(snp_id, proxy_id);
    }

    Ok(result)
}

/// Write a proxy mapping, sorted by original id.
pub fn write_proxy_ids<P: AsRef<Path>>(path: P, ids: &HashMap<String, String>) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "id\tproxy")?;
    let mut sorted: Vec<_> = ids.iter().collect();
    sorted.sort();
    for (id, proxy) in sorted {
        writeln!(writer, "{}\t{}", id, proxy)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a candidate-pool file: `id<TAB>candidate`, repeated lines per
/// id, one header line. Order of candidates is preserved per id.
pub fn read_candidate_pools<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<String, Vec<String>>> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    let mut pools: HashMap<String, Vec<String>> = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            bail!(
                "{} line {}: {} columns found, two expected: id, candidate",
                path.display(),
                i + 1,
                fields.len()
            );
        }
        if i == 0 {
            continue;
        }
        pools
            .entry(fields[0].to_string())
            .or_default()
            .push(fields[1].to_string());
    }

    Ok(pools)
}
