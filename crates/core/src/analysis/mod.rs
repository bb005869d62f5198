//! Disassembly-to-cost analysis.
//!
//! Data flows through these modules in order:
//! - [`classify`]: symbol header, instruction row, or neither
//! - [`parser`]: address, mnemonic, cost, and call target of a row
//! - [`segment`]: per-function local cost and call edges
//! - [`resolve`]: per-function totals across the call graph
//!
//! [`cost_table`] holds the worst-case cycle counts the parser charges.

pub mod classify;
pub mod cost_table;
pub mod parser;
pub mod resolve;
pub mod segment;

pub use classify::{classify, is_instruction_line, symbol_line, LineKind};
pub use cost_table::{CostTable, AVR_CYCLES};
pub use parser::{is_call_mnemonic, InstructionParser, ParseError, ParsedInstruction};
pub use resolve::{resolve, resolve_in_place, Resolution, ResolveOptions};
pub use segment::{segment, Segmentation, Segmenter};
