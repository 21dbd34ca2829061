//! Secret management service trait.
//!
//! Defines the interface for loading provider API keys.

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for loading secret configuration.
///
/// Implementations must never log key material or put it into error
/// messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Loaded secrets, possibly with no provider set
    /// - `Err(_)`: The secret file exists but could not be read or parsed
    async fn load_secrets(&self) -> Result<SecretConfig>;
}
