// Domain layer - Registry entities and their invariants
pub mod dashboard;
pub mod error;
pub mod panel;
pub mod resolver;
pub mod slug;
pub mod user;
