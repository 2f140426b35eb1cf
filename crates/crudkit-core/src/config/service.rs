//! Entity service configuration.

use serde::{Deserialize, Serialize};

/// How deleting a missing key is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Deleting a missing key succeeds silently.
    #[default]
    Idempotent,
    /// Deleting a missing key fails with a not-found error.
    Strict,
}

/// Settings applied by every entity service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Behaviour of delete-by-key on a missing key.
    #[serde(default)]
    pub delete_policy: DeletePolicy,
}
