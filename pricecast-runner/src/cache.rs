//! In-memory TTL cache for validation results, keyed by symbol.
//!
//! Each entry carries a BLAKE3 fingerprint of the forecast and realized
//! prices it was computed from; a lookup with a different fingerprint is a
//! miss. Reads share an `RwLock`. Recomputation for a symbol is serialized
//! by a per-symbol `Mutex`, so concurrent callers for the same symbol run at
//! most one computation and the rest pick up its result. A stale entry is
//! never returned; it is simply recomputed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use pricecast_core::domain::ForecastSequence;
use pricecast_core::validation::{RealizedPrices, ValidationResult};

/// Identity of the inputs a validation result was computed from.
pub type Fingerprint = blake3::Hash;

/// Hash the fields of `forecast` and `realized` that validation reads.
pub fn fingerprint(forecast: &ForecastSequence, realized: &RealizedPrices) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(forecast.len() as u64).to_le_bytes());
    for point in forecast {
        hasher.update(point.date.to_string().as_bytes());
        for value in [point.predicted, point.confidence, point.upper_bound, point.lower_bound] {
            hasher.update(&value.to_bits().to_le_bytes());
        }
        hasher.update(point.model_used.as_str().as_bytes());
        hasher.update(&[0]);
        for feature in &point.features_used {
            hasher.update(feature.as_bytes());
            hasher.update(&[0]);
        }
    }
    hasher.update(&(realized.len() as u64).to_le_bytes());
    for (date, price) in realized {
        hasher.update(date.to_string().as_bytes());
        hasher.update(&price.to_bits().to_le_bytes());
    }
    hasher.finalize()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: Fingerprint,
    result: Arc<ValidationResult>,
    expires_at: Instant,
}

/// Thread-safe validation cache.
#[derive(Debug)]
pub struct ValidationCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    ttl: Duration,
}

impl ValidationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Cache that never retains anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl == Duration::ZERO
    }

    /// Fresh cached result for `symbol` computed from the same inputs, if any.
    pub fn get(&self, symbol: &str, fingerprint: &Fingerprint) -> Option<Arc<ValidationResult>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(symbol)
            .filter(|entry| Instant::now() < entry.expires_at && entry.fingerprint == *fingerprint)
            .map(|entry| Arc::clone(&entry.result))
    }

    /// Store `result` under `symbol`, replacing any previous entry. No-op when disabled.
    pub fn put(
        &self,
        symbol: &str,
        fingerprint: Fingerprint,
        result: ValidationResult,
    ) -> Arc<ValidationResult> {
        let result = Arc::new(result);
        if !self.is_disabled() {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(
                symbol.to_string(),
                CacheEntry {
                    fingerprint,
                    result: Arc::clone(&result),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        result
    }

    /// Return the cached result for (`symbol`, `fingerprint`), or run
    /// `compute` and cache it.
    ///
    /// Only one `compute` per symbol runs at a time; callers that waited on
    /// the lock re-check the cache before computing.
    pub fn get_or_compute<F>(
        &self,
        symbol: &str,
        fingerprint: Fingerprint,
        compute: F,
    ) -> Arc<ValidationResult>
    where
        F: FnOnce() -> ValidationResult,
    {
        if let Some(hit) = self.get(symbol, &fingerprint) {
            tracing::debug!(symbol, "validation cache hit");
            return hit;
        }

        let flight = self.flight_lock(symbol);
        let result = {
            let _guard = flight.lock().unwrap_or_else(PoisonError::into_inner);
            match self.get(symbol, &fingerprint) {
                Some(hit) => {
                    tracing::debug!(symbol, "validation cache filled while waiting");
                    hit
                }
                None => {
                    tracing::debug!(symbol, "validation cache miss");
                    self.put(symbol, fingerprint, compute())
                }
            }
        };
        self.release_flight(symbol, flight);
        result
    }

    /// Drop the entry for `symbol`.
    pub fn invalidate(&self, symbol: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(symbol);
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(symbol).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(symbol);
        }
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Remove expired entries.
    pub fn clear_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn flight_lock(&self, symbol: &str) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(symbol.to_string()).or_default())
    }

    /// Forget the per-symbol lock once no other caller holds a clone of it.
    /// The caller's clone is dropped under the map lock so the last releaser
    /// always sees itself as the only holder.
    fn release_flight(&self, symbol: &str, flight: Arc<Mutex<()>>) {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = locks
            .get(symbol)
            .is_some_and(|lock| Arc::ptr_eq(lock, &flight) && Arc::strong_count(&flight) == 2);
        if idle {
            locks.remove(symbol);
        }
        drop(flight);
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ValidationCache {
    /// Five-minute TTL.
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}
