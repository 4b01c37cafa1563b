use super::cache::GeoCache;
use super::error::RoutingError;
use super::route::Place;
use super::service::Geocoder;
use async_trait::async_trait;
use std::{
    io::Result as IoResult,
    path::Path,
    sync::{Arc, Mutex},
};

/// Wraps a geocoder so each address is only looked up once.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: Mutex<GeoCache>,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, cache: GeoCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .save_to_file(path)
    }

    fn cached(&self, query: &str) -> Option<Place> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_geocode(query)
    }
}

#[async_trait]
impl Geocoder for CachedGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, RoutingError> {
        self.inner.search(query, limit).await
    }

    async fn geocode(&self, query: &str) -> Result<Option<Place>, RoutingError> {
        if let Some(place) = self.cached(query) {
            log::debug!("[CACHE HIT] geocode \"{}\"", query);
            return Ok(Some(place));
        }

        let found = self.inner.geocode(query).await?;
        if let Some(place) = &found {
            self.cache
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert_geocode(query, place.clone());
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::routing::route::Coord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<Place>, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("nowhere") {
                return Ok(vec![]);
            }
            Ok(vec![Place {
                name: query.to_string(),
                display_name: query.to_string(),
                coord: Coord::new(50.0, 4.0),
            }])
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let inner = Arc::new(CountingGeocoder::default());
        let geocoder = CachedGeocoder::new(inner.clone(), GeoCache::default());

        geocoder.geocode("Antwerpen").await.unwrap();
        let again = geocoder.geocode("antwerpen ").await.unwrap();

        assert!(again.is_some());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let inner = Arc::new(CountingGeocoder::default());
        let geocoder = CachedGeocoder::new(inner.clone(), GeoCache::default());

        assert!(geocoder.geocode("nowhere").await.unwrap().is_none());
        assert!(geocoder.geocode("nowhere").await.unwrap().is_none());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cache_is_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geo_cache.json");
        let geocoder = CachedGeocoder::new(Arc::new(CountingGeocoder::default()), GeoCache::default());

        geocoder.geocode("Hasselt").await.unwrap();
        geocoder.save_to_file(&path).unwrap();

        let reloaded = GeoCache::load_from_file(&path).unwrap();
        assert!(reloaded.get_geocode("hasselt").is_some());
    }
}
