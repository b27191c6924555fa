pub mod constants;
pub mod error;
pub mod file;
