pub mod analyzer;
pub mod dialects;

pub use analyzer::{AnalysisError, Analyzer};
pub use dialects::{default_dialect_registry, DialectRegistry, ListingDialect, DEFAULT_DIALECT};
