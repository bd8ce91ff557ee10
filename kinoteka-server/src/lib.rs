//! HTTP surface of the movie catalog service.

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod pagination;
pub mod routes;
pub mod state;

pub use routes::create_api_router;
pub use state::AppState;
