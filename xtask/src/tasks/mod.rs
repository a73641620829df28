pub mod build;
pub mod tooling;
