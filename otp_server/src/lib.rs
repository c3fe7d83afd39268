pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::OtpServerConfig;
pub use frameworks::server::{run, run_with_config};
