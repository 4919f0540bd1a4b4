pub mod entry;
pub mod habit;
