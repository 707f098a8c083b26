//! Liveness tokens for asynchronous completions.
//!
//! A view-model owns a [`Liveness`] and hands a [`LivenessToken`] to every
//! asynchronous operation it starts. When the operation completes it checks
//! the token and drops its result if the owner was disposed, or moved on to
//! a newer epoch (e.g. started editing a different entity), in the meantime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug)]
struct Inner {
    alive: AtomicBool,
    epoch: AtomicU64,
}

/// Owner side of a liveness flag. Disposed on drop.
#[derive(Debug)]
pub struct Liveness {
    inner: Arc<Inner>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                alive: AtomicBool::new(true),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Issue a token bound to the current epoch.
    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            inner: Arc::clone(&self.inner),
            epoch: self.inner.epoch.load(Ordering::Acquire),
        }
    }

    /// Start a new epoch. Tokens issued before this call stop being live.
    pub fn advance(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn epoch(&self) -> u64 {
        self.inner.epoch.load(Ordering::Acquire)
    }

    /// Invalidate every token, now and forever.
    pub fn dispose(&self) {
        self.inner.alive.store(false, Ordering::Release);
    }

    pub fn is_disposed(&self) -> bool {
        !self.inner.alive.load(Ordering::Acquire)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Completion side: cheap to clone, safe to move into spawned tasks.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    inner: Arc<Inner>,
    epoch: u64,
}

impl LivenessToken {
    pub fn is_live(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
            && self.inner.epoch.load(Ordering::Acquire) == self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_dies_with_owner() {
        let owner = Liveness::new();
        let token = owner.token();
        assert!(token.is_live());
        drop(owner);
        assert!(!token.is_live());
    }

    #[test]
    fn advancing_epoch_invalidates_older_tokens_only() {
        let owner = Liveness::new();
        let old = owner.token();
        assert_eq!(owner.advance(), 1);
        let fresh = owner.token();
        assert!(!old.is_live());
        assert!(fresh.is_live());
        assert_eq!(fresh.epoch(), 1);
    }

    #[test]
    fn dispose_is_sticky() {
        let owner = Liveness::new();
        owner.dispose();
        owner.advance();
        assert!(owner.is_disposed());
        assert!(!owner.token().is_live());
    }
}
