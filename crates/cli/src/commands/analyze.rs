use std::fmt::Write as _;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use avrcycles_core::model::{AnalysisReport, Diagnostic, FunctionReport};
use avrcycles_core::services::{default_dialect_registry, Analyzer};

use crate::commands::{apply_overrides, load_config};
use crate::{sha256_file, validate_listing_path};

/// Input selection shared by the analysis commands.
#[derive(Debug, Clone, Default)]
pub struct ListingArgs {
    pub path: String,
    pub dialect: Option<String>,
    pub config: Option<PathBuf>,
    pub recursion_cost: Option<u64>,
}

impl ListingArgs {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Whole-listing totals, as printed by `total --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatTotals {
    pub instructions: usize,
    pub cycles: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl From<&AnalysisReport> for FlatTotals {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            instructions: report.instruction_count,
            cycles: report.cycle_count,
            diagnostics: report.diagnostics.clone(),
        }
    }
}

/// Machine-readable wrapper around a report with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub tool_version: String,
    pub input: String,
    pub input_sha256: String,
    pub generated_at: String,
    pub dialect: String,
    pub report: AnalysisReport,
}

/// Validate the input, build an analyzer from config + flags, and run it.
///
/// Returns the validated path, the dialect name used, and the report.
pub fn analyze_listing(args: &ListingArgs) -> Result<(PathBuf, String, AnalysisReport)> {
    let config = apply_overrides(
        load_config(args.config.as_deref())?,
        args.dialect.clone(),
        args.recursion_cost,
    );
    let path = validate_listing_path(&args.path, &config)?;

    let registry = default_dialect_registry();
    let analyzer = Analyzer::from_config(&config, &registry)?;
    let dialect = analyzer.dialect().name().to_string();

    let file = fs::File::open(&path)
        .with_context(|| format!("Failed to open listing: {}", path.display()))?;
    let report = analyzer
        .analyze_reader(BufReader::new(file))
        .with_context(|| format!("Failed to analyze listing: {}", path.display()))?;
    Ok((path, dialect, report))
}

/// Flat mode: total instructions and cycles across the whole listing.
pub fn total_command(args: &ListingArgs, json: bool) -> Result<()> {
    let (_path, _dialect, report) = analyze_listing(args)?;
    let totals = FlatTotals::from(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    println!("Total number of cycles: {}", totals.cycles);
    println!("Total number of instructions: {}", totals.instructions);
    print_diagnostics(&report);
    Ok(())
}

/// Per-function mode: local and resolved totals for each function.
pub fn functions_command(args: &ListingArgs, format: OutputFormat, name: Option<&str>) -> Result<()> {
    let (path, dialect, report) = analyze_listing(args)?;
    let report = match name {
        Some(name) => only_function(report, name)?,
        None => report,
    };

    match format {
        OutputFormat::Text => {
            print!("{}", render_functions(&report));
            print_diagnostics(&report);
        }
        OutputFormat::Json => {
            let envelope = build_envelope(&path, &dialect, report)?;
            let serialized = serde_json::to_string_pretty(&envelope)
                .context("Failed to serialize report to JSON")?;
            println!("{}", serialized);
        }
        OutputFormat::Yaml => {
            let envelope = build_envelope(&path, &dialect, report)?;
            let serialized =
                serde_yaml::to_string(&envelope).context("Failed to serialize report to YAML")?;
            print!("{}", serialized);
        }
    }
    Ok(())
}

/// Narrow a report to the function called `name`.
pub fn only_function(mut report: AnalysisReport, name: &str) -> Result<AnalysisReport> {
    let start = report
        .function_named(name)
        .map(|f| f.start.clone())
        .ok_or_else(|| anyhow!("No function named '{}' in listing", name))?;
    report.functions.retain(|key, _| *key == start);
    Ok(report)
}

pub fn build_envelope(path: &Path, dialect: &str, report: AnalysisReport) -> Result<ReportEnvelope> {
    Ok(ReportEnvelope {
        tool_version: avrcycles_core::version().to_string(),
        input: path.display().to_string(),
        input_sha256: sha256_file(path)?,
        generated_at: Utc::now().to_rfc3339(),
        dialect: dialect.to_string(),
        report,
    })
}

/// Human-readable function table.
pub fn render_functions(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Functions ({}):", report.functions.len());
    if report.functions.is_empty() {
        out.push_str("  (none)\n");
    }
    for function in report.functions.values() {
        let _ = writeln!(out, "  - {}", describe_function(function));
    }
    let _ = writeln!(out, "Total number of cycles: {}", report.cycle_count);
    let _ = writeln!(out, "Total number of instructions: {}", report.instruction_count);
    out
}

fn describe_function(function: &FunctionReport) -> String {
    let name = if function.name.is_empty() { "(anonymous)" } else { function.name.as_str() };
    let end = function.end.as_ref().map(|e| format!("0x{e}")).unwrap_or_else(|| "-".into());
    let mut line = format!(
        "{name} [0x{}..{end}] instructions={} local={} total={}",
        function.start, function.instruction_count, function.local_cycles, function.total_cycles
    );
    if function.has_calls {
        let calls: Vec<String> = function.calls.iter().map(|c| format!("0x{c}")).collect();
        let _ = write!(line, " calls=[{}]", calls.join(", "));
    }
    line
}

fn print_diagnostics(report: &AnalysisReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    println!("Diagnostics ({}):", report.diagnostics.len());
    for diagnostic in &report.diagnostics {
        println!("  - {diagnostic}");
    }
}
