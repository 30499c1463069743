pub mod api;
pub mod models;

/// Server-assigned identifier shared by every entity.
pub type Id = u64;
