use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter used to drop responses that arrive after the view moved on.
///
/// Every load takes a token with [`RequestEpoch::begin`]; navigating away or
/// unmounting calls [`RequestEpoch::invalidate`]. A response is applied only
/// while its token is still current.
#[derive(Clone, Debug, Default)]
pub struct RequestEpoch {
    generation: Arc<AtomicU64>,
}

#[derive(Clone, Debug)]
pub struct EpochToken {
    generation: u64,
    epoch: Arc<AtomicU64>,
}

impl RequestEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; earlier tokens become stale.
    pub fn begin(&self) -> EpochToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        EpochToken {
            generation,
            epoch: self.generation.clone(),
        }
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl EpochToken {
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_token_wins() {
        let epoch = RequestEpoch::new();
        let first = epoch.begin();
        assert!(first.is_current());
        let second = epoch.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn invalidate_stales_everything() {
        let epoch = RequestEpoch::new();
        let token = epoch.begin();
        epoch.clone().invalidate();
        assert!(!token.is_current());
    }
}
