pub mod cars;
pub mod error;
pub mod games;
pub mod handlers;
pub mod middleware;
pub mod params;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
