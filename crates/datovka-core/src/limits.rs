//! Protocol ceilings for outbound data messages.

use serde::{Deserialize, Serialize};

/// Maximum number of recipients of a single message
pub const MAX_RECIPIENTS: usize = 50;

/// Maximum total size of all attachments (25 MiB)
pub const MAX_TOTAL_SIZE_BYTES: u64 = 25 * 1024 * 1024;

/// Limits enforced by [`MessageValidator`](crate::MessageValidator)
///
/// The defaults are the ceilings of the live service. Smaller values are
/// useful in tests and in pipelines that want to stay below the service
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Maximum number of recipients
    #[serde(default = "default_max_recipients")]
    pub max_recipients: usize,
    /// Maximum total attachment size in bytes
    #[serde(default = "default_max_total_size_bytes")]
    pub max_total_size_bytes: u64,
}

fn default_max_recipients() -> usize {
    MAX_RECIPIENTS
}

fn default_max_total_size_bytes() -> u64 {
    MAX_TOTAL_SIZE_BYTES
}

impl ValidationLimits {
    /// Create limits with explicit values
    #[must_use]
    pub const fn new(max_recipients: usize, max_total_size_bytes: u64) -> Self {
        Self {
            max_recipients,
            max_total_size_bytes,
        }
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::new(MAX_RECIPIENTS, MAX_TOTAL_SIZE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.max_recipients, 50);
        assert_eq!(limits.max_total_size_bytes, 26_214_400);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let limits: ValidationLimits =
            serde_json::from_str(r#"{"max_total_size_bytes": 1024}"#).unwrap();
        assert_eq!(limits.max_recipients, MAX_RECIPIENTS);
        assert_eq!(limits.max_total_size_bytes, 1024);
    }
}
