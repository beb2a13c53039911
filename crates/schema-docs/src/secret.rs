//! Publishing token held in memory that is zeroed on drop

use zeroize::{Zeroize, ZeroizeOnDrop};

/// API token for a publishing backend
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiToken {
    value: String,
}

impl ApiToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the token value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiToken")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
