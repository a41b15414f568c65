// Application layer - Registry, route table and access rules
pub mod access;
pub mod identity;
pub mod session_store;
pub mod site;
pub mod urls;
