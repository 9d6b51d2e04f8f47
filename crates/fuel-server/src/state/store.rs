//! In-memory catalog snapshot store.

use fuel_core::{CatalogFormat, PlannerRules, StationCatalog};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open station catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse station catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to parse station CSV {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Load a station catalog from disk: CSV for `.csv` files, JSON otherwise.
pub fn load_catalog(path: &Path) -> Result<StationCatalog, CatalogError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: display.clone(),
        source,
    })?;
    let reader = BufReader::new(file);
    match CatalogFormat::for_path(path) {
        CatalogFormat::Json => StationCatalog::from_json_reader(reader)
            .map_err(|source| CatalogError::Parse { path: display, source }),
        CatalogFormat::Csv => StationCatalog::from_csv_reader(reader)
            .map_err(|source| CatalogError::Csv { path: display, source }),
    }
}

/// Application state shared by all handlers.
///
/// The catalog is swapped as a whole; readers clone the `Arc` and keep
/// planning against the snapshot they took even if it is replaced meanwhile.
pub struct AppState {
    catalog: RwLock<Arc<StationCatalog>>,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_catalog(config, StationCatalog::default())
    }

    pub fn with_catalog(config: Config, catalog: StationCatalog) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            config,
        }
    }

    pub fn rules(&self) -> &PlannerRules {
        &self.config.planner
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<StationCatalog> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new snapshot, returning the previous one.
    pub fn replace_catalog(&self, catalog: StationCatalog) -> Arc<StationCatalog> {
        let mut guard = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuel_core::StationRecord;

    fn one_station(id: &str) -> StationCatalog {
        StationCatalog::from_records(vec![StationRecord {
            id: id.to_string(),
            latitude: Some(35.0),
            longitude: Some(-100.0),
            price_per_gallon: Some(3.0),
            ..Default::default()
        }])
    }

    #[test]
    fn snapshot_survives_replacement() {
        let state = AppState::with_catalog(Config::default(), one_station("old"));
        let snapshot = state.catalog();

        let previous = state.replace_catalog(one_station("new"));
        assert!(previous.get("old").is_some());
        assert!(snapshot.get("old").is_some());
        assert!(state.catalog().get("new").is_some());
    }

    #[test]
    fn missing_catalog_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/stations.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn catalog_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("fuel-catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"id": "a", "lat": 35.0, "lon": -100.0, "price": 3.0}, {"id": "b"}]"#,
        )
        .expect("write catalog");
        let catalog = load_catalog(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped(), 1);
    }

    #[test]
    fn csv_catalog_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("fuel-catalog-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "Truckstop Name,Address,City,State,Retail Price,Latitude,Longitude\n\
             Stop A,I-40 EXIT 70,Amarillo,TX,3.19,35.19,-101.83\n\
             Stop B,I-40 EXIT 75,Amarillo,TX,3.09,,\n",
        )
        .expect("write catalog");
        let catalog = load_catalog(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped(), 1);
        assert_eq!(catalog.stations()[0].name, "Stop A");
    }
}
