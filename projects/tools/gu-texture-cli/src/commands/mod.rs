pub mod build;
pub mod formats;
