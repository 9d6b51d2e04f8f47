//! Read-only station catalog snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::models::{FuelStation, StationRecord};

/// An immutable, validated list of stations for planning.
///
/// Records without coordinates or a usable price are dropped on construction
/// and only counted in [`StationCatalog::skipped`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationCatalog {
    stations: Vec<FuelStation>,
    skipped: usize,
}

/// Accepted catalog file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<StationRecord>),
    Keyed(BTreeMap<String, StationRecord>),
}

/// On-disk catalog layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    /// OPIS-style truck stop price export
    Csv,
}

impl CatalogFormat {
    /// Pick the format from a file extension; anything but `.csv` is JSON.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => CatalogFormat::Csv,
            _ => CatalogFormat::Json,
        }
    }
}

/// One row of a station price export.
///
/// Price exports carry no coordinates; rows only become usable stations when
/// `Latitude`/`Longitude` columns have been added by geocoding.
#[derive(Deserialize)]
struct CsvRow {
    #[serde(default, rename = "OPIS Truckstop ID", alias = "id")]
    id: String,
    #[serde(default, rename = "Truckstop Name", alias = "name")]
    name: String,
    #[serde(default, rename = "Address", alias = "address")]
    address: String,
    #[serde(default, rename = "City", alias = "city")]
    city: String,
    #[serde(default, rename = "State", alias = "state")]
    state: String,
    #[serde(
        default,
        rename = "Latitude",
        alias = "latitude",
        alias = "lat",
        deserialize_with = "csv::invalid_option"
    )]
    latitude: Option<f64>,
    #[serde(
        default,
        rename = "Longitude",
        alias = "longitude",
        alias = "lon",
        alias = "lng",
        deserialize_with = "csv::invalid_option"
    )]
    longitude: Option<f64>,
    #[serde(
        default,
        rename = "Retail Price",
        alias = "price",
        alias = "retail_price",
        deserialize_with = "csv::invalid_option"
    )]
    price: Option<f64>,
}

impl CsvRow {
    fn into_record(self, row: usize) -> StationRecord {
        StationRecord {
            // Rows without an id are numbered from 1 in file order.
            id: if self.id.is_empty() {
                row.to_string()
            } else {
                self.id
            },
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            latitude: self.latitude,
            longitude: self.longitude,
            price_per_gallon: self.price,
        }
    }
}

impl StationCatalog {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StationRecord>,
    {
        let mut stations = Vec::new();
        let mut skipped = 0;
        for record in records {
            match record.to_station() {
                Some(station) => stations.push(station),
                None => {
                    tracing::debug!(station_id = %record.id, "skipping incomplete station record");
                    skipped += 1;
                }
            }
        }
        Self { stations, skipped }
    }

    pub fn from_stations(stations: Vec<FuelStation>) -> Self {
        Self {
            stations,
            skipped: 0,
        }
    }

    /// Parse a JSON array of records, or an object keyed by station id.
    ///
    /// Keyed catalogs are ordered by id; a record without its own id takes
    /// its key.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_file(serde_json::from_str(json)?))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        Ok(Self::from_file(serde_json::from_reader(reader)?))
    }

    /// Parse a CSV price export with a header row.
    ///
    /// Unparsable numbers count as missing, so such rows are skipped rather
    /// than failing the load.
    pub fn from_csv_reader<R: Read>(reader: R) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            records.push(row?.into_record(index + 1));
        }
        Ok(Self::from_records(records))
    }

    fn from_file(file: CatalogFile) -> Self {
        match file {
            CatalogFile::List(records) => Self::from_records(records),
            CatalogFile::Keyed(map) => Self::from_records(map.into_iter().map(|(key, mut record)| {
                if record.id.is_empty() {
                    record.id = key;
                }
                record
            })),
        }
    }

    pub fn stations(&self) -> &[FuelStation] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of records dropped for missing or invalid fields.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn get(&self, id: &str) -> Option<&FuelStation> {
        self.stations.iter().find(|station| station.id == id)
    }
}
