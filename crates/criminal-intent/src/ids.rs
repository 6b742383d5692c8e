//! Identifier generation for new records.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces unique opaque identifiers.
pub trait IdGenerator: Send + Sync + std::fmt::Debug {
    /// Generate a fresh identifier.
    fn generate(&self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential identifiers with a fixed prefix (`crime-1`, `crime-2`, ...).
///
/// Unique only within one process; meant for tests and scripted fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose first id is `{prefix}-1`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", self.prefix)
    }
}
