//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes that entity supports

pub mod labeling_job;
pub mod region;
pub mod user;
pub mod user_label;
