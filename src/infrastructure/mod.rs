// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod discovery;
pub mod http_response;
pub mod memory_sessions;
pub mod static_identity;
