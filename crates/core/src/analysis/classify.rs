//! Line classification for disassembler output.

use crate::model::Address;

/// Classification of one listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Symbol { address: Address, name: String },
    Instruction,
    Other,
}

pub fn classify(line: &str) -> LineKind {
    if let Some((address, name)) = symbol_line(line) {
        LineKind::Symbol { address, name }
    } else if is_instruction_line(line) {
        LineKind::Instruction
    } else {
        LineKind::Other
    }
}

/// True for rows such as ` 1b6:	ff cf	rjmp	.-2`.
///
/// The first word must be alphanumerics ending in a colon, and the row must
/// carry at least three words (address, raw bytes, mnemonic).
pub fn is_instruction_line(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    let Some(label) = first.strip_suffix(':') else {
        return false;
    };
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    words.take(2).count() == 2
}

/// Parse a symbol header such as `0000031e <digitalRead>:`.
pub fn symbol_line(line: &str) -> Option<(Address, String)> {
    let trimmed = line.trim();
    let (hex, rest) = trimmed.split_once(' ')?;
    if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let name = rest.strip_prefix('<')?.strip_suffix(">:")?;
    if name.contains('>') {
        return None;
    }
    Some((Address::parse(hex), name.to_string()))
}
