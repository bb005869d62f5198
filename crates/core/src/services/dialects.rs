use std::collections::HashMap;

/// Positional fields of an instruction row: address, raw bytes, mnemonic,
/// then optional operand and trailing `;` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub address: &'a str,
    pub bytes: &'a str,
    pub mnemonic: &'a str,
    pub operand: Option<&'a str>,
    pub comment: Option<&'a str>,
}

/// Trait implemented by listing formats; callers select by name.
pub trait ListingDialect: Send + Sync {
    /// Split a classified instruction row into fields, or `None` when the row
    /// has no mnemonic in this dialect.
    fn split<'a>(&self, line: &'a str) -> Option<RawFields<'a>>;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
}

/// Tab-separated rows as written by `avr-objdump -d`.
pub struct ObjdumpDialect;

impl ListingDialect for ObjdumpDialect {
    fn split<'a>(&self, line: &'a str) -> Option<RawFields<'a>> {
        // Rows that lost their tabs (pasted snippets) still parse by words.
        if !line.contains('\t') {
            return WhitespaceDialect.split(line);
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 3 || fields[2].is_empty() {
            return None;
        }
        let mut operand = None;
        let mut comment = None;
        for field in &fields[3..] {
            if field.is_empty() {
                continue;
            }
            if let Some(text) = field.strip_prefix(';') {
                if comment.is_none() {
                    comment = Some(text.trim());
                }
            } else if operand.is_none() && comment.is_none() {
                operand = Some(*field);
            }
        }
        Some(RawFields {
            address: fields[0],
            bytes: fields[1],
            mnemonic: fields[2],
            operand,
            comment,
        })
    }

    fn name(&self) -> &'static str {
        "objdump"
    }

    fn description(&self) -> &'static str {
        "Tab-separated avr-objdump rows (falls back to words when tabs are missing)"
    }
}

/// Whitespace-delimited rows; byte pairs after the address form the bytes field.
pub struct WhitespaceDialect;

impl ListingDialect for WhitespaceDialect {
    fn split<'a>(&self, line: &'a str) -> Option<RawFields<'a>> {
        let (code, comment) = match line.split_once(';') {
            Some((code, comment)) => (code, Some(comment.trim())),
            None => (line, None),
        };
        let code = code.trim();
        let address_end = code.find(char::is_whitespace)?;
        let address = &code[..address_end];
        let rest = code[address_end..].trim_start();

        // Consume two-hex-digit byte tokens; no AVR mnemonic looks like one.
        let mut cursor = rest;
        let mut bytes_end = 0;
        loop {
            let token_len = cursor.find(char::is_whitespace).unwrap_or(cursor.len());
            let token = &cursor[..token_len];
            if token.len() != 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
                break;
            }
            let consumed = rest.len() - cursor.len() + token_len;
            bytes_end = consumed;
            cursor = cursor[token_len..].trim_start();
        }
        let bytes = rest[..bytes_end].trim();

        let mnemonic_len = cursor.find(char::is_whitespace).unwrap_or(cursor.len());
        let mnemonic = &cursor[..mnemonic_len];
        if mnemonic.is_empty() {
            return None;
        }
        let operand = cursor[mnemonic_len..].trim();
        Some(RawFields {
            address,
            bytes,
            mnemonic,
            operand: (!operand.is_empty()).then_some(operand),
            comment: comment.filter(|c| !c.is_empty()),
        })
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn description(&self) -> &'static str {
        "Whitespace-delimited rows with raw byte pairs after the address"
    }
}

/// Registry for listing dialects.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Box<dyn ListingDialect>>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self { dialects: HashMap::new() }
    }

    pub fn register<D: ListingDialect + 'static>(&mut self, dialect: D) -> &mut Self {
        self.dialects.insert(dialect.name().to_string(), Box::new(dialect));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ListingDialect> {
        self.dialects.get(name).map(|d| &**d)
    }

    /// Sorted dialect names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.dialects.keys().cloned().collect();
        keys.sort();
        keys
    }
}

pub const DEFAULT_DIALECT: &str = "objdump";

pub fn default_dialect_registry() -> DialectRegistry {
    let mut registry = DialectRegistry::new();
    registry.register(ObjdumpDialect).register(WhitespaceDialect);
    registry
}
