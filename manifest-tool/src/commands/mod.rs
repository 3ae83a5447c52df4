/// Inspect command handler
pub mod inspect;

/// Version command handlers
pub mod version;
