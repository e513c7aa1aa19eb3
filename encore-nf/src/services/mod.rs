//! Service layer: catalog clients, diff engine, notifier, workflow

pub mod catalog;
pub mod diff_engine;
pub mod notifier;
pub mod scheduler;
pub mod token_provider;
pub mod workflow;

pub use catalog::CatalogClient;
pub use notifier::WebhookChannel;
pub use token_provider::TokenProvider;
pub use workflow::WorkflowOrchestrator;
