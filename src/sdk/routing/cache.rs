use super::route::Place;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, io::Result as IoResult, path::Path};

/// Address → place lookups persisted between runs.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct GeoCache {
    geocodes: HashMap<String, Place>,
}

impl GeoCache {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        if path.as_ref().exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
    }

    /// Addresses differing only in case or surrounding whitespace share an entry.
    pub fn normalize(address: &str) -> String {
        address.trim().to_lowercase()
    }

    pub fn get_geocode(&self, address: &str) -> Option<Place> {
        self.geocodes.get(&Self::normalize(address)).cloned()
    }

    pub fn insert_geocode(&mut self, address: &str, place: Place) {
        self.geocodes.insert(Self::normalize(address), place);
    }

    pub fn len(&self) -> usize {
        self.geocodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geocodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::route::Coord;

    fn gent() -> Place {
        Place {
            name: "Gent".into(),
            display_name: "Gent, Oost-Vlaanderen, België".into(),
            coord: Coord::new(51.05, 3.72),
        }
    }

    #[test]
    fn lookups_ignore_case_and_padding() {
        let mut cache = GeoCache::default();
        cache.insert_geocode("Gent", gent());
        assert_eq!(cache.get_geocode("  gENT "), Some(gent()));
        assert!(cache.get_geocode("Brugge").is_none());
    }

    #[test]
    fn survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo_cache.json");

        let mut cache = GeoCache::default();
        cache.insert_geocode("Gent", gent());
        cache.save_to_file(&path).unwrap();

        let loaded = GeoCache::load_from_file(&path).unwrap();
        assert_eq!(loaded.get_geocode("gent"), Some(gent()));
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GeoCache::load_from_file(dir.path().join("nope.json")).unwrap();
        assert!(cache.is_empty());
    }
}
