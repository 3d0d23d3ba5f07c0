//! sea-orm entities for the members service tables.

pub mod communities;
pub mod recent_works;
pub mod user_communities;
pub mod users;
