//! # routegen-cli: Command-Line Interface
//!
//! Provides the `routegen` command. It reads a route snapshot exported from
//! the host application and drives the generation pipeline over it.
//!
//! ## Subcommands
//!
//! - `routegen generate` writes one feature test suite per controller.
//! - `routegen list` previews the selected (method, URI, handler) rows.
//!
//! ```bash
//! routegen -v generate --routes routes.json --dir tests/Feature --sync
//! routegen list --routes routes.yaml --filter /api
//! ```

pub mod config;
pub mod generate;
pub mod list;
