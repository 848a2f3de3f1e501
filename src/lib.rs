pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::GeminiClient;
pub use config::ServerConfig;
pub use core::engine::FixEngine;
pub use server::{router, HttpSettings};
pub use utils::error::{FixerError, Result};
