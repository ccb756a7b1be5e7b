pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;
pub mod state;
pub mod templates;

pub use models::*;
pub use router::appointment_routes;
pub use state::AppState;
