pub mod options;
pub mod repo;
pub mod tools_env;
