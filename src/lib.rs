//! # mockgate
//!
//! Mock status server for exercising build-monitor clients.
//!
//! ## Features
//!
//! - **Health endpoint:** `GET /api/health` behind a static bearer token
//! - **Two layouts:** plain scalars or `{data, hue}` annotated values
//! - **Gateway feed:** `/ws/gateway` plays a timed message script, binary artifact included
//! - **Many instances:** every server gets its own config, so tests can run several at once

pub mod config;
pub mod error;
pub mod gateway;
pub mod health;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{build_router, Server, ServerHandle};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
