use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex};

use crate::{
    catalog::{Catalog, Item},
    error::RecommendationError,
};

/// Uniform random pick from a genre's items. Seed it for reproducible picks.
pub struct RecommendationSelector {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
}

impl RecommendationSelector {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(catalog: Arc<Catalog>, seed: u64) -> Self {
        Self {
            catalog,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn select(&self, genre: &str) -> Result<Item, RecommendationError> {
        let items = self
            .catalog
            .items(genre)
            .ok_or_else(|| RecommendationError::Resolution(format!("unknown genre '{genre}'")))?;
        if items.is_empty() {
            return Err(RecommendationError::CatalogIntegrity(genre.to_string()));
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.random_range(0..items.len())
        };
        Ok(items[index].clone())
    }
}
