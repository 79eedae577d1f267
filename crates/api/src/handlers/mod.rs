pub mod badge;
pub mod pages;
pub mod scan_sessions;
pub mod staff;
