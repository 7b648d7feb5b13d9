//! devserve is a local development web server.
//!
//! It serves static client assets from a directory and forwards requests
//! under a login API prefix (`/api/login` by default) to a separate
//! login server, rewriting the path and adding permissive CORS headers
//! so a browser client can call an API on another origin.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Startup: `--check` validation or running the server.
//! - [`config`] -- Config file loading, CLI overrides, and validation into
//!   an immutable [`Settings`](config::Settings) value.
//! - [`error`] -- Startup error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Request classification, CORS preflights, and single-attempt
//!   forwarding to the login server.
//! - [`server`] -- Axum router, shared read-only state, upstream HTTP client,
//!   and graceful shutdown.
//! - [`tls`] -- PEM certificate loading for https mode.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
pub mod tls;
