//! Typed client for the [Limitless](https://www.limitless.ai/) lifelog REST API.
//!
//! A lifelog is one recorded activity or transcript segment. This crate
//! fetches them page by page, decodes them into [`client::LifelogEntry`]
//! records, and reports HTTP failures as a closed [`client::LifelogFailure`]
//! type so callers can tell a rate limit (with its retry hint) apart from any
//! other API error.
//!
//! ```no_run
//! use lifelog::client::{ClientOptions, LifelogClient, LifelogFailure, ListParams};
//!
//! # async fn run() -> Result<(), LifelogFailure> {
//! let client = LifelogClient::new("my-api-key", ClientOptions::default())?;
//! let params = ListParams::new().limit(Some(10)).timezone(Some("Asia/Tokyo"));
//!
//! match client.list_lifelogs(&params).await {
//!     Ok(page) => println!("{} entries", page.entries.len()),
//!     Err(LifelogFailure::RateLimited { retry_after, .. }) => {
//!         println!("back off for {retry_after:?} seconds");
//!     }
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`]: request construction, response classification, pagination
//! - [`config`]: configuration loading from TOML files and environment variables
//! - [`render`]: text and markdown views of entries
//! - [`cli`]: the `lifelog` command-line front end

pub mod cli;
pub mod client;
pub mod config;
pub mod render;
