use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::Path,
};

use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Road distance and duration between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub meters: f64,
    pub seconds: f64,
}

/// Cache key built from the raw bits of the origin and destination coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegKey([u64; 4]);

impl LegKey {
    pub fn new<P>(from: P, to: P) -> Self
    where
        P: Into<geo_types::Point>,
    {
        let from: geo_types::Point = from.into();
        let to: geo_types::Point = to.into();

        LegKey([
            from.x().to_bits(),
            from.y().to_bits(),
            to.x().to_bits(),
            to.y().to_bits(),
        ])
    }
}

impl Hash for LegKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for bits in self.0 {
            state.write_u64(bits);
        }
    }
}

/// Travel legs keyed by (origin, destination). Reads from concurrent solves share the lock.
#[derive(Debug, Default)]
pub struct LegCache {
    entries: RwLock<FxHashMap<LegKey, TravelLeg>>,
}

impl LegCache {
    pub fn get(&self, key: &LegKey) -> Option<TravelLeg> {
        self.entries.read().get(key).copied()
    }

    pub fn insert(&self, key: LegKey, leg: TravelLeg) {
        self.entries.write().insert(key, leg);
    }

    pub fn extend(&self, legs: impl IntoIterator<Item = (LegKey, TravelLeg)>) {
        self.entries.write().extend(legs);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.is_file() {
            return Ok(LegCache::default());
        }

        let file = std::fs::File::open(path)?;
        let entries: Vec<(LegKey, TravelLeg)> = serde_json::from_reader(file)?;

        Ok(LegCache {
            entries: RwLock::new(entries.into_iter().collect()),
        })
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), anyhow::Error> {
        let entries = self
            .entries
            .read()
            .iter()
            .map(|(key, leg)| (*key, *leg))
            .collect::<Vec<_>>();

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &entries)?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_directional() {
        let a = geo_types::Point::new(2.35, 48.85);
        let b = geo_types::Point::new(4.35, 50.85);

        assert_ne!(LegKey::new(a, b), LegKey::new(b, a));
        assert_eq!(LegKey::new(a, b), LegKey::new(a, b));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = LegCache::default();
        let key = LegKey::new(
            geo_types::Point::new(0.0, 0.0),
            geo_types::Point::new(0.01, 0.0),
        );

        assert!(cache.get(&key).is_none());

        cache.insert(
            key,
            TravelLeg {
                meters: 1200.0,
                seconds: 120.0,
            },
        );

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).map(|leg| leg.meters), Some(1200.0));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("ruta_leg_cache_{}.json", std::process::id()));
        let cache = LegCache::default();
        let key = LegKey::new(
            geo_types::Point::new(1.0, 2.0),
            geo_types::Point::new(3.0, 4.0),
        );
        cache.insert(
            key,
            TravelLeg {
                meters: 10.0,
                seconds: 1.0,
            },
        );

        cache.save_to_file(&path).unwrap();
        let loaded = LegCache::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.get(&key), cache.get(&key));
    }
}
