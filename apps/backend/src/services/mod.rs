pub mod cache;
pub mod reporter;
pub mod sessions;
