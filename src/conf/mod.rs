mod cache;
mod config;
mod delegate;
mod server;

pub use cache::{CacheBackend, CacheConfig};
pub use config::Config;
pub use delegate::DelegateConfig;
pub use server::ServerConfig;
