// handlers/public/mod.rs - Endpoints that never touch organization data

pub mod health; // GET /health
pub mod root; // GET /

pub use health::health;
pub use root::root;
