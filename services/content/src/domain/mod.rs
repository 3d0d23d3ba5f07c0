pub mod listing;
pub mod repository;
pub mod slug;
pub mod types;
