pub mod openrouter;
pub mod provider;
pub mod resilient;

pub use openrouter::OpenRouterProvider;
pub use provider::{EmbeddingError, EmbeddingProvider};
pub use resilient::{ResilientProvider, RetryConfig, is_retryable_error};
