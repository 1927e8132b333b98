pub mod error;
pub mod extract;
pub mod pipeline;
pub mod search;
pub mod types;

pub(crate) mod fetch;
pub(crate) mod html;

pub use error::DiscoveryError;
pub use pipeline::{DiscoveryOptions, StoreDiscovery};
pub use search::SearchClient;
pub use types::{DiscoveryRequest, StoreCandidate, StoreKind, StoreResult};
