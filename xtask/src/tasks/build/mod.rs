pub mod configure;
pub mod vars;
