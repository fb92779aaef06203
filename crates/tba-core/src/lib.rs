//! Typed client for the Telegram Bot HTTP API.
//!
//! The network itself lives behind [`ports::Transport`]; adapter crates
//! implement it (see `tba-reqwest`). Everything here is about turning typed
//! calls into minimal requests and raw responses into validated entities or
//! classified errors.

pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod methods;
pub mod normalize;
pub mod ports;
pub mod retry;
pub mod status;
pub mod types;

pub use client::Bot;
pub use errors::{Error, Result};
