//! HTTP API handlers

pub mod alerts;
pub mod diagnostics;
pub mod health;
pub mod upload;

pub use alerts::list_alerts;
pub use diagnostics::ml_status;
pub use health::health_routes;
pub use upload::upload_image;
