//! HTTP API handlers for encore-nf

pub mod artists;
pub mod health;
pub mod token;
pub mod workflow;

pub use artists::artist_routes;
pub use health::health_routes;
pub use token::token_routes;
pub use workflow::workflow_routes;
