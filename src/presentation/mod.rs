// Presentation layer - HTTP surface generated from the route table
pub mod app_state;
pub mod handlers;
pub mod router;
