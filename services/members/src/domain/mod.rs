pub mod avatar;
pub mod repository;
pub mod types;
