//! Partition configuration.

use crate::hash::DEFAULT_SALT;

/// Configuration for a [`Partition`](crate::Partition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Salt mixed into every key digest. Partitions with different salts
    /// place the same key at different coordinates.
    pub salt: String,
}

impl PartitionConfig {
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
        }
    }
}
