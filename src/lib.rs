pub mod api;
pub mod config;
pub mod error;
pub mod scorer;
// cmd and reports belong to the binary crate (main.rs).
