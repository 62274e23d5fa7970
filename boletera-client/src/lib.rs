pub mod app_config;
pub mod dto;
pub mod http;

pub use app_config::{BackendConfig, Config};
pub use http::HttpBackend;
