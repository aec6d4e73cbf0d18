//! Ambient services: configuration and logging

pub mod config;
pub mod logging;

pub use config::{Config, LoggingConfig, MergeConfig, CONFIG_FILES};
pub use logging::{
    init_dev_logging, init_logging, init_prod_logging, LogConfig, LogFormat, LogOutput,
};
