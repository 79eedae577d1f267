//! Database row structs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row.

pub mod badge_mapping;
pub mod staff_setting;
