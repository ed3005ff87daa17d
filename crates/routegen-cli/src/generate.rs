//! # Generate: Route Snapshot to Test Suites
//!
//! Provides the `routegen generate` subcommand and the orchestrator behind
//! it. One run is a single synchronous pass:
//!
//! ```text
//! RouteTable ─▶ RouteSelector ─▶ extract ─▶ TestCaseBuilder ─▶ TestSuiteFormatter::flush
//! ```
//!
//! Per-route and per-field problems are recovered and counted in the
//! [`GenerationReport`]; only a failed flush aborts the run.
//!
//! ## Usage
//!
//! ```bash
//! routegen generate --routes routes.json
//! routegen generate --routes routes.json --dir tests/Feature/Api --filter /api --sync
//! php artisan route:json | routegen generate --routes - --format json
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use routegen_core::{HttpMethod, RouteGenError, RouteTable};
use routegen_emit::{OutputFormat, TestSuiteFormatter};
use routegen_routes::{extract, RouteSelector, SkippedRoute};
use routegen_synth::{CaseInput, TestCaseBuilder};

use crate::config::{ConfigFile, GeneratorConfig, Overrides};

/// Arguments for `routegen generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Route snapshot file (JSON, or YAML by extension). `-` reads JSON from stdin.
    #[arg(long)]
    pub routes: PathBuf,

    /// Output directory for generated test files.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Gate each generated test on the one before it.
    #[arg(long)]
    pub sync: bool,

    /// Only generate for routes whose URI starts with this literal prefix.
    #[arg(long)]
    pub filter: Option<String>,

    /// Output format.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,
}

fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse()
}

/// A route whose rules could not be resolved; it got a happy-path-only case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedRoute {
    pub uri: String,
    pub reason: String,
}

/// A field that got no failure scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncheckedField {
    pub uri: String,
    pub method: HttpMethod,
    pub field: String,
}

/// What one generation run did.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Distinct routes that produced at least one case.
    pub routes_processed: usize,
    /// TestCases built (one per route and verb).
    pub cases: usize,
    pub skipped: Vec<SkippedRoute>,
    pub degraded: Vec<DegradedRoute>,
    pub unchecked: Vec<UncheckedField>,
    pub files: Vec<PathBuf>,
}

/// Run the whole pipeline over a snapshot and write the suites.
pub fn generate(
    table: &RouteTable,
    config: &GeneratorConfig,
) -> std::result::Result<GenerationReport, RouteGenError> {
    let selector = RouteSelector::new(config.filter.as_deref());
    let selection = selector.select(table);
    let builder = TestCaseBuilder::default();
    let mut formatter = TestSuiteFormatter::new(config.emit.clone());

    let mut report = GenerationReport {
        skipped: selection.skipped,
        ..GenerationReport::default()
    };
    let mut seen_routes = BTreeSet::new();

    for entry in &selection.entries {
        let meta = extract(entry.route, &entry.uri);
        let first_visit = seen_routes.insert(entry.index);

        if let (Some(issue), true) = (&meta.issue, first_visit) {
            match issue {
                RouteGenError::UnresolvableHandler { .. } => {
                    tracing::warn!(uri = %entry.uri, "{issue}; generating happy path only");
                }
                _ => tracing::info!(uri = %entry.uri, "{issue}; generating happy path only"),
            }
            report.degraded.push(DegradedRoute {
                uri: entry.uri.clone(),
                reason: issue.to_string(),
            });
        }

        let case = builder.build(CaseInput {
            uri: &entry.uri,
            method: entry.method,
            controller_name: &meta.controller_name,
            action_name: &meta.action_name,
            rules: &meta.rules,
            requires_auth: meta.requires_auth,
            auth_guard: meta.auth_guard.as_deref(),
        });

        report
            .unchecked
            .extend(case.unchecked_fields.iter().map(|field| UncheckedField {
                uri: entry.uri.clone(),
                method: entry.method,
                field: field.clone(),
            }));
        report.cases += 1;
        formatter.format(case);
    }
    report.routes_processed = seen_routes.len();

    tracing::info!(
        routes = report.routes_processed,
        cases = report.cases,
        skipped = report.skipped.len(),
        "selection complete"
    );

    let flushed = formatter.flush()?;
    report.files = flushed.files;
    Ok(report)
}

/// Execute `routegen generate`.
pub fn run_generate(args: &GenerateArgs, config_path: Option<&Path>) -> Result<u8> {
    let file = ConfigFile::load_optional(config_path)?;
    let config = GeneratorConfig::resolve(
        file,
        Overrides {
            output_dir: args.dir.clone(),
            sync: args.sync,
            filter: args.filter.clone(),
            format: args.format,
        },
    );

    let table = RouteTable::load(&args.routes)
        .with_context(|| format!("loading route snapshot: {}", args.routes.display()))?;
    tracing::debug!(routes = table.routes.len(), "loaded route snapshot");

    let report = generate(&table, &config).context("generating test suites")?;
    print_summary(&report, &config);
    Ok(0)
}

fn print_summary(report: &GenerationReport, config: &GeneratorConfig) {
    println!(
        "Generated {} test case(s) from {} route(s).",
        report.cases, report.routes_processed
    );
    if let Some(filter) = &config.filter {
        println!("  filter:    {filter}");
    }
    println!("  format:    {}", config.emit.format);
    if config.emit.sequential {
        println!("  mode:      sequential");
    }

    if !report.skipped.is_empty() {
        println!("  skipped:   {}", report.skipped.len());
        for skipped in &report.skipped {
            println!("    {}: {}", skipped.uri, skipped.reason);
        }
    }
    if !report.degraded.is_empty() {
        println!("  happy path only: {}", report.degraded.len());
        for degraded in &report.degraded {
            println!("    {}: {}", degraded.uri, degraded.reason);
        }
    }
    if !report.unchecked.is_empty() {
        println!("  fields without failure tests: {}", report.unchecked.len());
        for unchecked in &report.unchecked {
            println!(
                "    {} {} → {}",
                unchecked.method, unchecked.uri, unchecked.field
            );
        }
    }

    println!("  files:     {}", report.files.len());
    for file in &report.files {
        println!("    {}", file.display());
    }
}
