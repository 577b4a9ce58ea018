//! vakya-client — network and storage side of vakya.
//!
//! Implements the core `SentenceSource` and `VerbQuizSource` traits over
//! HTTP, keeps the credential token on disk, and loads the TOML
//! configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod store;

pub use api::ApiClient;
pub use config::{load_config, load_config_from, VakyaConfig};
pub use error::ServiceError;
pub use mock::MockSentenceSource;
pub use store::FileTokenStore;
