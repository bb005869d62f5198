use std::io::BufRead;

use thiserror::Error;

use crate::analysis::{
    resolve_in_place, CostTable, InstructionParser, ResolveOptions, Segmentation, Segmenter,
};
use crate::config::{AnalyzerConfig, ConfigError};
use crate::model::{AnalysisReport, FunctionReport};
use crate::services::dialects::{DialectRegistry, ListingDialect, DEFAULT_DIALECT};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unknown listing dialect '{name}' (available: {available})")]
    UnknownDialect { name: String, available: String },
    #[error("Invalid analyzer config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read listing: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the full pipeline over one listing: segment, then resolve.
pub struct Analyzer<'d> {
    table: CostTable,
    dialect: &'d dyn ListingDialect,
    options: ResolveOptions,
}

impl<'d> Analyzer<'d> {
    pub fn new(table: CostTable, dialect: &'d dyn ListingDialect, options: ResolveOptions) -> Self {
        Self { table, dialect, options }
    }

    /// Build an analyzer from config, picking the dialect out of `registry`.
    pub fn from_config(
        config: &AnalyzerConfig,
        registry: &'d DialectRegistry,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        let name = config.dialect.as_deref().unwrap_or(DEFAULT_DIALECT);
        let dialect = registry.get(name).ok_or_else(|| AnalysisError::UnknownDialect {
            name: name.to_string(),
            available: registry.names().join(", "),
        })?;
        let options = ResolveOptions { recursion_cost: config.recursion_cost };
        Ok(Self::new(config.cost_table(), dialect, options))
    }

    pub fn table(&self) -> &CostTable {
        &self.table
    }

    pub fn dialect(&self) -> &dyn ListingDialect {
        self.dialect
    }

    /// Analyze a listing streamed line by line.
    pub fn analyze_reader<R: BufRead>(&self, reader: R) -> Result<AnalysisReport, AnalysisError> {
        let mut segmenter = self.segmenter();
        for line in reader.lines() {
            segmenter.feed(&line?);
        }
        Ok(self.report(segmenter.finish()))
    }

    pub fn analyze_str(&self, text: &str) -> AnalysisReport {
        let mut segmenter = self.segmenter();
        for line in text.lines() {
            segmenter.feed(line);
        }
        self.report(segmenter.finish())
    }

    fn segmenter(&self) -> Segmenter<'_> {
        Segmenter::new(InstructionParser::new(&self.table, self.dialect))
    }

    fn report(&self, segmentation: Segmentation) -> AnalysisReport {
        let Segmentation { mut records, instruction_count, cycle_count, mut diagnostics } =
            segmentation;
        diagnostics.extend(resolve_in_place(&mut records, &self.options));
        tracing::info!(
            instructions = instruction_count,
            cycles = cycle_count,
            functions = records.len(),
            diagnostics = diagnostics.len(),
            "listing analyzed"
        );
        AnalysisReport {
            instruction_count,
            cycle_count,
            functions: records
                .iter()
                .map(|(start, record)| (start.clone(), FunctionReport::from(record)))
                .collect(),
            diagnostics,
        }
    }
}
