//! Read-only reference data: universes and their worlds.

mod http;
mod mock;
mod provider;
mod types;

pub use http::HttpUniverseProvider;
pub use mock::MockUniverseProvider;
pub use provider::{ProviderError, UniverseProvider};
pub use types::{Attribution, Universe, UniversesResponse, World};
