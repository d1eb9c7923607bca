use catchdex_model::{Catalog, Generation, RawSpecies};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const GEN1_FILE: &str = "pokemon-data-gen1.json";
pub const GEN2_FILE: &str = "pokemon-data-gen2.json";

/// The static catalog as served and as derived. Raw partition bytes are kept
/// verbatim so `/catalog/gen1|gen2` responses are byte-identical to the files
/// on disk; the parsed union feeds the view derivations. Each partition loads
/// independently: one unreadable file leaves the other partition serving.
pub struct CatalogState {
    raw: BTreeMap<Generation, Vec<u8>>,
    catalog: Catalog,
}

impl CatalogState {
    #[must_use]
    pub fn load(dir: &Path) -> Self {
        let mut raw = BTreeMap::new();
        let mut partitions = Vec::new();
        for (generation, file) in [(Generation::One, GEN1_FILE), (Generation::Two, GEN2_FILE)] {
            let path = dir.join(file);
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), "catalog partition unavailable: {e}");
                    continue;
                }
            };
            let records: Vec<RawSpecies> = match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    warn!(path = %path.display(), "catalog partition unreadable: {e}");
                    continue;
                }
            };
            info!(
                path = %path.display(),
                species = records.len(),
                "catalog partition loaded"
            );
            raw.insert(generation, bytes);
            partitions.push((generation, records));
        }

        let catalog = match Catalog::from_partitions(partitions) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("catalog normalization failed: {e}");
                Catalog::default()
            }
        };
        Self { raw, catalog }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            raw: BTreeMap::new(),
            catalog: Catalog::default(),
        }
    }

    /// Verbatim partition bytes, when that partition loaded.
    #[must_use]
    pub fn raw_partition(&self, generation: Generation) -> Option<&[u8]> {
        self.raw.get(&generation).map(Vec::as_slice)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// False only when every partition failed to load.
    #[must_use]
    pub fn has_any_partition(&self) -> bool {
        !self.raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partitions_load_independently() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join(GEN1_FILE),
            r#"[{"id":1,"name":"Bulbasaur","types":["Grass"],"availability":{}}]"#,
        )
        .expect("write gen1");
        // No gen2 file at all.
        let state = CatalogState::load(dir.path());
        assert!(state.has_any_partition());
        assert!(state.raw_partition(Generation::One).is_some());
        assert!(state.raw_partition(Generation::Two).is_none());
        assert_eq!(state.catalog().len(), 1);
    }

    #[test]
    fn corrupt_partition_does_not_poison_the_other() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(GEN1_FILE), "{ not json").expect("write gen1");
        fs::write(
            dir.path().join(GEN2_FILE),
            r#"[{"id":152,"name":"Chikorita","types":["Grass"],"availability":{}}]"#,
        )
        .expect("write gen2");
        let state = CatalogState::load(dir.path());
        assert!(state.raw_partition(Generation::One).is_none());
        assert!(state.raw_partition(Generation::Two).is_some());
        assert_eq!(state.catalog().len(), 1);
    }

    #[test]
    fn total_failure_leaves_an_empty_catalog() {
        let dir = tempdir().expect("tempdir");
        let state = CatalogState::load(dir.path());
        assert!(!state.has_any_partition());
        assert!(state.catalog().is_empty());
    }

    #[test]
    fn raw_bytes_are_served_verbatim() {
        let dir = tempdir().expect("tempdir");
        let body = r#"[
  {"id": 1, "name": "Bulbasaur", "types": ["Grass"], "availability": {}}
]"#;
        fs::write(dir.path().join(GEN1_FILE), body).expect("write gen1");
        let state = CatalogState::load(dir.path());
        assert_eq!(
            state.raw_partition(Generation::One),
            Some(body.as_bytes())
        );
    }
}
