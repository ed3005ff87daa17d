//! # List: Preview the Selection
//!
//! `routegen list` prints the (method, URI, handler, auth) rows a
//! `generate` run would build cases for, without writing anything.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use routegen_core::{HttpMethod, RouteTable};
use routegen_routes::{extract, RouteSelector};

use crate::config::ConfigFile;

/// Arguments for `routegen list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Route snapshot file (JSON, or YAML by extension). `-` reads JSON from stdin.
    #[arg(long)]
    pub routes: PathBuf,

    /// Only list routes whose URI starts with this literal prefix.
    #[arg(long)]
    pub filter: Option<String>,
}

/// One selected (route, verb).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub method: HttpMethod,
    pub uri: String,
    /// `Controller@Action` after the naming transform.
    pub handler: String,
    pub requires_auth: bool,
}

/// Rows for every selected (route, verb), in selection order.
pub fn list_rows(table: &RouteTable, filter: Option<&str>) -> Vec<ListRow> {
    RouteSelector::new(filter)
        .select(table)
        .entries
        .iter()
        .map(|entry| {
            let meta = extract(entry.route, &entry.uri);
            ListRow {
                method: entry.method,
                uri: entry.uri.clone(),
                handler: format!("{}@{}", meta.controller_name, meta.action_name),
                requires_auth: meta.requires_auth,
            }
        })
        .collect()
}

/// Execute `routegen list`.
pub fn run_list(args: &ListArgs, config_path: Option<&Path>) -> Result<u8> {
    let file = ConfigFile::load_optional(config_path)?;
    let filter = args.filter.clone().or(file.filter);

    let table = RouteTable::load(&args.routes)
        .with_context(|| format!("loading route snapshot: {}", args.routes.display()))?;

    let rows = list_rows(&table, filter.as_deref());
    let uri_width = rows.iter().map(|r| r.uri.len()).max().unwrap_or(0).max(3);
    let handler_width = rows.iter().map(|r| r.handler.len()).max().unwrap_or(0).max(7);

    println!("{:<7} {:<uri_width$} {:<handler_width$} AUTH", "METHOD", "URI", "HANDLER");
    for row in &rows {
        println!(
            "{:<7} {:<uri_width$} {:<handler_width$} {}",
            row.method.as_str(),
            row.uri,
            row.handler,
            if row.requires_auth { "yes" } else { "no" }
        );
    }
    println!();
    println!("{} route/verb pair(s) selected.", rows.len());
    Ok(0)
}
