pub mod dataset;
pub mod loader;
