//! Instruction row parsing and cost attribution.

use thiserror::Error;

use crate::analysis::cost_table::CostTable;
use crate::model::{Address, Diagnostic, InstructionLine};
use crate::services::dialects::ListingDialect;

/// Subroutine-call mnemonics whose operand names a call target.
pub const CALL_MNEMONICS: &[&str] = &["call", "rcall", "icall", "eicall"];

pub fn is_call_mnemonic(mnemonic: &str) -> bool {
    CALL_MNEMONICS.contains(&mnemonic)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {0}: no mnemonic field in instruction row")]
    MissingMnemonic(usize),
}

/// Parsed row plus the diagnostic it raised, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    pub instruction: InstructionLine,
    pub diagnostic: Option<Diagnostic>,
}

pub struct InstructionParser<'a> {
    table: &'a CostTable,
    dialect: &'a dyn ListingDialect,
}

impl<'a> InstructionParser<'a> {
    pub fn new(table: &'a CostTable, dialect: &'a dyn ListingDialect) -> Self {
        Self { table, dialect }
    }

    /// Parse a row already accepted by
    /// [`is_instruction_line`](crate::analysis::classify::is_instruction_line).
    ///
    /// Unknown mnemonics cost zero and come back with an
    /// [`Diagnostic::UnknownMnemonic`] rather than an error.
    pub fn parse(&self, line: &str, line_no: usize) -> Result<ParsedInstruction, ParseError> {
        let fields = self.dialect.split(line).ok_or(ParseError::MissingMnemonic(line_no))?;
        let address = Address::parse(fields.address);
        let mnemonic = fields.mnemonic.to_string();

        let (cycles, known, diagnostic) = match self.table.cost(&mnemonic) {
            Some(cycles) => (cycles, true, None),
            None => {
                tracing::warn!(line = line_no, %address, %mnemonic, "unknown instruction, cost 0");
                let diagnostic = Diagnostic::UnknownMnemonic {
                    line: line_no,
                    address: address.clone(),
                    mnemonic: mnemonic.clone(),
                };
                (0, false, Some(diagnostic))
            }
        };

        let call_target = if is_call_mnemonic(&mnemonic) {
            call_target(&address, fields.operand, fields.comment)
        } else {
            None
        };

        Ok(ParsedInstruction {
            instruction: InstructionLine {
                address,
                mnemonic,
                operand: fields.operand.map(str::to_string),
                call_target,
                cycles,
                known,
            },
            diagnostic,
        })
    }
}

/// Resolve the target named by a call operand.
///
/// Absolute operands are taken literally, so `0` is the zero address.
/// Relative operands (`.+4`) prefer the absolute address objdump prints in
/// the comment and otherwise count from the following instruction.
fn call_target(address: &Address, operand: Option<&str>, comment: Option<&str>) -> Option<Address> {
    let token = operand?.split(|c: char| c == ',' || c.is_whitespace()).next()?;
    if let Some(offset) = token.strip_prefix('.') {
        if let Some(target) = comment.and_then(comment_address) {
            return Some(target);
        }
        let offset: i64 = offset.trim_start_matches('+').parse().ok()?;
        let base = i64::try_from(address.value()?).ok()?;
        let target = base.checked_add(2)?.checked_add(offset)?;
        return u64::try_from(target).ok().map(Address::from_value);
    }
    if is_hex_literal(token) {
        return Some(Address::parse(token));
    }
    comment.and_then(comment_address)
}

fn comment_address(comment: &str) -> Option<Address> {
    let token = comment.split_whitespace().next()?;
    let digits = token.strip_prefix("0x")?;
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| Address::parse(token))
}

fn is_hex_literal(token: &str) -> bool {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}
