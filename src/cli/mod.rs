//! # CLI Module
//!
//! Command-line entry point for kahless applications. The application itself is supplied by
//! the binary as a builder closure, so the same CLI serves any route set.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! kahless serve --config demo/config.yaml --addr 0.0.0.0:8080
//! ```
//!
//! Options:
//! - `--config <FILE>` - YAML configuration (also `KAHLESS_CONFIG`)
//! - `--templates <DIR>` - templates directory
//! - `--static-dir <DIR>` - static assets directory
//! - `--addr <ADDR>` - listen address
//!
//! ### `routes`
//!
//! Print the registered route templates in lookup order:
//!
//! ```bash
//! kahless routes
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use kahless::{cli::run_cli, Api};
//!
//! fn main() -> anyhow::Result<()> {
//!     run_cli(|config| {
//!         let mut api = Api::with_config(config);
//!         api.route("/", |_req, resp, _params| {
//!             resp.text("home");
//!             Ok(())
//!         })?;
//!         Ok(api)
//!     })
//! }
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands, ConfigArgs};
