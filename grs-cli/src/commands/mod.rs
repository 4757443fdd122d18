pub mod build_score;
pub mod compute_score;
pub mod info_file;
pub mod list_markers;
pub mod proxy_file;
pub mod sanity_check;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use grs_core::catalog::{CatalogBuilder, VariantCatalog};
use grs_core::score::VariantFeatureMap;

/// Markers a run needs in its catalog: the score's own markers plus
/// any proxies that will stand in for them.
pub(crate) fn catalog_targets(
    feature_map: &VariantFeatureMap,
    proxy_ids: &HashMap<String, String>,
) -> HashSet<String> {
    let mut targets = feature_map.variant_ids().clone();
    targets.extend(proxy_ids.values().cloned());
    targets
}

/// Load the given info tables concurrently into one catalog.
pub(crate) fn load_catalog(
    info_files: &[String],
    targets: Option<HashSet<String>>,
) -> Result<VariantCatalog> {
    let builder = CatalogBuilder::new(targets);
    info_files
        .par_iter()
        .map(|path| {
            builder
                .load(path)
                .with_context(|| format!("Failed to load info table {}", path))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(builder.finish())
}

/// Source name a VCF is registered under: its file name, which is what
/// the matching info table's `# vcf:` header carries.
pub(crate) fn source_name(path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path))
}
