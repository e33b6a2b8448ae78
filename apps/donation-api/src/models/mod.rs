pub mod admin;
pub mod donation;
pub mod stats;
