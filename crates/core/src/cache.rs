//! Session-scoped result cache with single-flight aggregation.
//!
//! One aggregation pass may run per session at a time. Claiming the slot
//! yields a [`FlightGuard`]; dropping the guard without completing releases
//! the slot, so the in-flight flag clears on every exit path.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Default)]
struct CacheState {
    result: Option<Vec<String>>,
    in_flight: bool,
}

/// Shared cache handle. Clones refer to the same state.
#[derive(Clone, Default)]
pub struct SessionCache {
    state: Arc<Mutex<CacheState>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached merged result, if a pass has completed since the last
    /// invalidation.
    pub fn get(&self) -> Option<Vec<String>> {
        self.state.lock().result.clone()
    }

    /// Claim the aggregation slot. Returns `None` while another pass is in
    /// flight.
    pub fn try_begin(&self) -> Option<FlightGuard> {
        let mut state = self.state.lock();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        Some(FlightGuard { cache: self.clone(), completed: false })
    }

    /// Drop the cached result. The next extraction recomputes it.
    pub fn invalidate(&self) {
        self.state.lock().result = None;
    }
}

/// Exclusive claim on the aggregation slot.
pub struct FlightGuard {
    cache: SessionCache,
    completed: bool,
}

impl FlightGuard {
    /// Store the pass result and release the slot.
    pub fn complete(mut self, result: Vec<String>) {
        let mut state = self.cache.state.lock();
        state.result = Some(result);
        state.in_flight = false;
        self.completed = true;
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if !self.completed {
            self.cache.state.lock().in_flight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_fails_while_in_flight() {
        let cache = SessionCache::new();
        let guard = cache.try_begin().unwrap();
        assert!(cache.try_begin().is_none());
        guard.complete(vec!["done".to_string()]);
        assert!(cache.try_begin().is_some());
    }

    #[test]
    fn complete_stores_the_result() {
        let cache = SessionCache::new();
        assert!(cache.get().is_none());
        cache.try_begin().unwrap().complete(vec!["a".to_string()]);
        assert_eq!(cache.get(), Some(vec!["a".to_string()]));
    }

    #[test]
    fn dropping_the_guard_releases_the_slot_without_caching() {
        let cache = SessionCache::new();
        drop(cache.try_begin().unwrap());
        assert!(cache.get().is_none());
        assert!(cache.try_begin().is_some());
    }

    #[test]
    fn invalidate_clears_only_the_result() {
        let cache = SessionCache::new();
        cache.try_begin().unwrap().complete(vec!["a".to_string()]);
        cache.invalidate();
        assert!(cache.get().is_none());
        assert!(cache.try_begin().is_some());
    }
}
