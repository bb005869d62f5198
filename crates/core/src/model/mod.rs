//! Core data model for listings, functions, and analysis results.
//!
//! Everything here is plain data: the analysis components in
//! [`crate::analysis`] build these values and the CLI serializes them.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized program address used as a function key.
///
/// The raw text (`0000031e`, ` 31e:`, `0x31e`) is trimmed, lowercased, and
/// stripped of leading zeros, keeping at least one digit so that address zero
/// stays representable as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches(':').trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        let stripped = digits.trim_start_matches('0');
        if stripped.is_empty() {
            Self("0".to_string())
        } else {
            Self(stripped.to_string())
        }
    }

    pub fn from_value(value: u64) -> Self {
        Self(format!("{value:x}"))
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the key is valid hex.
    pub fn value(&self) -> Option<u64> {
        u64::from_str_radix(&self.0, 16).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keys carry no leading zeros, so a shorter key is always the smaller hex value.
impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One parsed instruction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionLine {
    pub address: Address,
    pub mnemonic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_target: Option<Address>,
    /// Cycles attributed to this occurrence; zero when the mnemonic is unknown.
    pub cycles: u32,
    pub known: bool,
}

/// A function scope delimited by symbol lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub start: Address,
    /// Address of the last instruction in scope; `None` for an empty scope.
    pub end: Option<Address>,
    pub name: String,
    pub local_cycles: u64,
    pub instruction_count: usize,
    pub callees: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cycles: Option<u64>,
}

impl FunctionRecord {
    pub fn new(start: Address, name: impl Into<String>) -> Self {
        Self {
            start,
            end: None,
            name: name.into(),
            local_cycles: 0,
            instruction_count: 0,
            callees: Vec::new(),
            total_cycles: None,
        }
    }

    /// Fold one parsed instruction into this scope.
    pub fn absorb(&mut self, instruction: &InstructionLine) {
        self.local_cycles = self.local_cycles.saturating_add(u64::from(instruction.cycles));
        self.instruction_count += 1;
        self.end = Some(instruction.address.clone());
        if let Some(target) = &instruction.call_target {
            self.callees.push(target.clone());
        }
    }

    pub fn has_calls(&self) -> bool {
        !self.callees.is_empty()
    }
}

/// Function records keyed by start address.
pub type FunctionMap = BTreeMap<Address, FunctionRecord>;

/// Non-fatal findings reported next to the primary result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Mnemonic missing from the cost table; the occurrence was costed at zero.
    UnknownMnemonic { line: usize, address: Address, mnemonic: String },
    /// Call target with no matching function record; contributed zero.
    UnresolvedCall { caller: Address, target: Address },
    /// Call edge back onto the active resolution path.
    CallCycle { caller: Address, target: Address, path: Vec<Address> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownMnemonic { line, address, mnemonic } => {
                write!(f, "line {line}: unknown instruction '{mnemonic}' at 0x{address} (cost 0)")
            }
            Diagnostic::UnresolvedCall { caller, target } => {
                write!(f, "0x{caller}: call to 0x{target} has no matching function (cost 0)")
            }
            Diagnostic::CallCycle { caller, target, path } => {
                let chain: Vec<String> = path.iter().map(|a| format!("0x{a}")).collect();
                write!(
                    f,
                    "0x{caller}: recursive call to 0x{target} broken (path {})",
                    chain.join(" -> ")
                )
            }
        }
    }
}

/// Per-function entry in an analysis report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionReport {
    pub start: Address,
    pub end: Option<Address>,
    pub name: String,
    pub instruction_count: usize,
    pub local_cycles: u64,
    pub total_cycles: u64,
    pub calls: Vec<Address>,
    pub has_calls: bool,
}

impl From<&FunctionRecord> for FunctionReport {
    fn from(record: &FunctionRecord) -> Self {
        Self {
            start: record.start.clone(),
            end: record.end.clone(),
            name: record.name.clone(),
            instruction_count: record.instruction_count,
            local_cycles: record.local_cycles,
            total_cycles: record.total_cycles.unwrap_or(record.local_cycles),
            calls: record.callees.clone(),
            has_calls: record.has_calls(),
        }
    }
}

/// Result of analyzing one listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Instruction rows recognized across the whole input.
    pub instruction_count: usize,
    /// Sum of per-instruction costs across the whole input.
    pub cycle_count: u64,
    pub functions: BTreeMap<Address, FunctionReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    /// Look up a function by symbol name.
    pub fn function_named(&self, name: &str) -> Option<&FunctionReport> {
        self.functions.values().find(|f| f.name == name)
    }
}
