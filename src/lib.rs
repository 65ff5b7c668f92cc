//! HTTP relay that turns poster and logo form requests into hosted image
//! generations, then proxies finished images back from an allow-list of hosts.

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::{Config, KreaConfig, PollConfig, ProxyConfig};
pub use error::{RelayError, Result};
pub use models::*;
pub use relay::{GenerationRelay, ImageProxy, PollPolicy};
pub use upstream::{HttpImageFetcher, ImageFetcher, ImageProvider, KreaClient};
