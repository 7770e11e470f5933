//! Coalescing of concurrent work by key
//!
//! The first caller for a key runs the work; callers arriving while it runs
//! block until it finishes and receive a clone of the same result. Results are
//! kept for the lifetime of the registry, so later callers get them at once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Registry of in-flight and finished work, keyed by string
#[derive(Debug)]
pub struct InFlight<T> {
    slots: Mutex<HashMap<String, Arc<OnceLock<T>>>>,
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> InFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `key` unless another caller already did or is doing so
    pub fn run(&self, key: &str, work: impl FnOnce() -> T) -> T {
        // The registry lock is only held to find the slot, never during work
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        slot.get_or_init(work).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_run_once_per_key() {
        let registry = InFlight::new();
        assert_eq!(registry.run("a", || 1), 1);
        assert_eq!(registry.run("a", || 2), 1);
        assert_eq!(registry.run("b", || 3), 3);
    }

    #[test]
    fn test_concurrent_callers_share_one_run() {
        let registry = Arc::new(InFlight::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let runs = Arc::clone(&runs);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.run("same-key", || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(50));
                        "fetched".to_string()
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "fetched");
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
