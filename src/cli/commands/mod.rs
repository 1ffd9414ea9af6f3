pub mod db;
pub mod org;
