//! hello-consumer: relays the JSON answer of an upstream microservice.
//!
//! Every `GET /` on port 8081 triggers one `GET http://$HOST:80/vert.x`; the
//! JSON object that comes back is returned to the caller unchanged. Upstream
//! failures surface as 5xx responses.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::AppError;
