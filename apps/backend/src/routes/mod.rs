pub mod auth;
pub mod results;
pub mod sessions;
pub mod sets;
