//! Variant catalog built from per-source info tables.
//!
//! Many tables can be loaded concurrently; inserts into the shared
//! maps are serialized per map. When a target id set is given, a load
//! may stop early once every target has been observed — records are
//! always processed whole before the exit check, so racing past the
//! exit can only read a little more than necessary, never corrupt the
//! maps.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing::debug;

use crate::model::variant::Variant;
use grs_geno::info_table::InfoTableReader;

/// Accumulates variants while info tables load.
pub struct CatalogBuilder {
    variants: Mutex<HashMap<String, Variant>>,
    sources: Mutex<HashMap<String, String>>,
    /// Target ids not yet observed, when a target set was given.
    remaining: Option<Mutex<HashSet<String>>>,
}

impl CatalogBuilder {
    /// `targets` are the marker ids the run needs (already substituted
    /// through known proxy ids); `None` loads everything.
    pub fn new(targets: Option<HashSet<String>>) -> Self {
        CatalogBuilder {
            variants: Mutex::new(HashMap::new()),
            sources: Mutex::new(HashMap::new()),
            remaining: targets.map(Mutex::new),
        }
    }

    /// Ingest one info table. Safe to call from several threads for
    /// different tables.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut reader = InfoTableReader::open(path.as_ref())?;
        let source = reader.source.clone();
        let mut n_kept = 0usize;

        while let Some(record) = reader.read_record()? {
            if let Some(remaining) = &self.remaining {
                let mut remaining = remaining.lock().expect("catalog lock poisoned");
                if !remaining.remove(&record.id) && !self.contains(&record.id) {
                    continue;
                }
                let done = remaining.is_empty();
                drop(remaining);

                self.insert(record.into(), &source);
                n_kept += 1;

                if done {
                    debug!(
                        "All target markers seen, stopping {} early",
                        path.as_ref().display()
                    );
                    break;
                }
            } else {
                self.insert(record.into(), &source);
                n_kept += 1;
            }
        }

        debug!(
            "Loaded {} variants from {} (source {})",
            n_kept,
            path.as_ref().display(),
            source
        );
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.variants
            .lock()
            .expect("catalog lock poisoned")
            .contains_key(id)
    }

    fn insert(&self, variant: Variant, source: &str) {
        let id = variant.id.clone();
        self.variants
            .lock()
            .expect("catalog lock poisoned")
            .entry(id.clone())
            .or_insert(variant);
        self.sources
            .lock()
            .expect("catalog lock poisoned")
            .entry(id)
            .or_insert_with(|| source.to_string());
    }

    /// Freeze into the read-only catalog used during scoring.
    pub fn finish(self) -> VariantCatalog {
        VariantCatalog {
            variants: self.variants.into_inner().expect("catalog lock poisoned"),
            sources: self.sources.into_inner().expect("catalog lock poisoned"),
        }
    }
}

/// Read-only id -> metadata and id -> source indexes.
#[derive(Debug, Clone)]
pub struct VariantCatalog {
    variants: HashMap<String, Variant>,
    sources: HashMap<String, String>,
}

impl VariantCatalog {
    pub fn lookup(&self, id: &str) -> Option<&Variant> {
        self.variants.get(id)
    }

    /// Name of the genotype source the marker was observed in.
    pub fn source_of(&self, id: &str) -> Option<&str> {
        self.sources.get(id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
