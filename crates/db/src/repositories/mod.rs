//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod badge_mapping_repo;
pub mod staff_setting_repo;

pub use badge_mapping_repo::BadgeMappingRepo;
pub use staff_setting_repo::StaffSettingRepo;
