pub mod cep;
pub mod distance;
pub mod position;
pub mod resolver;
pub mod routing;

mod error;

pub use cep::CepClient;
pub use distance::{haversine, DistanceEstimate};
pub use error::GeoError;
pub use position::{JitterEstimator, PositionEstimate};
pub use resolver::{GeoResolver, Location};
pub use routing::OsrmClient;
