//! Mnemonic to clock-cycle lookup.
//!
//! Instructions whose cost depends on operands, flags, or device family store
//! their maximum. Branches count as taken, skips as skipping a two-word
//! instruction, and call/return costs assume a 22-bit program counter.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Built-in worst-case AVR cycle counts, sorted by mnemonic.
pub const AVR_CYCLES: &[(&str, u32)] = &[
    ("adc", 1),
    ("add", 1),
    ("adiw", 2),
    ("and", 1),
    ("andi", 1),
    ("asr", 1),
    ("bclr", 1),
    ("bld", 1),
    ("brbc", 2),
    ("brbs", 2),
    ("brcc", 2),
    ("brcs", 2),
    ("break", 1),
    ("breq", 2),
    ("brge", 2),
    ("brhc", 2),
    ("brhs", 2),
    ("brid", 2),
    ("brie", 2),
    ("brlo", 2),
    ("brlt", 2),
    ("brmi", 2),
    ("brne", 2),
    ("brpl", 2),
    ("brsh", 2),
    ("brtc", 2),
    ("brts", 2),
    ("brvc", 2),
    ("brvs", 2),
    ("bset", 1),
    ("bst", 1),
    ("call", 5),
    ("cbi", 2),
    ("cbr", 1),
    ("clc", 1),
    ("clh", 1),
    ("cli", 1),
    ("cln", 1),
    ("clr", 1),
    ("cls", 1),
    ("clt", 1),
    ("clv", 1),
    ("clz", 1),
    ("com", 1),
    ("cp", 1),
    ("cpc", 1),
    ("cpi", 1),
    ("cpse", 3),
    ("dec", 1),
    ("des", 2),
    ("eicall", 4),
    ("eijmp", 2),
    ("elpm", 3),
    ("eor", 1),
    ("fmul", 2),
    ("fmuls", 2),
    ("fmulsu", 2),
    ("icall", 4),
    ("ijmp", 2),
    ("in", 1),
    ("inc", 1),
    ("jmp", 3),
    ("lac", 2),
    ("las", 2),
    ("lat", 2),
    ("ld", 3),
    ("ldd", 3),
    ("ldi", 1),
    ("lds", 3),
    ("lpm", 3),
    ("lsl", 1),
    ("lsr", 1),
    ("mov", 1),
    ("movw", 1),
    ("mul", 2),
    ("muls", 2),
    ("mulsu", 2),
    ("neg", 1),
    ("nop", 1),
    ("or", 1),
    ("ori", 1),
    ("out", 1),
    ("pop", 2),
    ("push", 2),
    ("rcall", 4),
    ("ret", 5),
    ("reti", 5),
    ("rjmp", 2),
    ("rol", 1),
    ("ror", 1),
    ("sbc", 1),
    ("sbci", 1),
    ("sbi", 2),
    ("sbic", 4),
    ("sbis", 4),
    ("sbiw", 2),
    ("sbr", 1),
    ("sbrc", 3),
    ("sbrs", 3),
    ("sec", 1),
    ("seh", 1),
    ("sei", 1),
    ("sen", 1),
    ("ser", 1),
    ("ses", 1),
    ("set", 1),
    ("sev", 1),
    ("sez", 1),
    ("sleep", 1),
    ("spm", 4),
    ("st", 2),
    ("std", 2),
    ("sts", 2),
    ("sub", 1),
    ("subi", 1),
    ("swap", 1),
    ("tst", 1),
    ("wdr", 1),
    ("xch", 2),
];

/// Immutable mnemonic to cycle-count mapping. Lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable {
    cycles: HashMap<String, u32>,
}

impl CostTable {
    /// Shared built-in AVR table, built on first use.
    pub fn avr() -> &'static CostTable {
        static TABLE: OnceLock<CostTable> = OnceLock::new();
        TABLE.get_or_init(|| CostTable::from_entries(AVR_CYCLES.iter().copied()))
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self { cycles: entries.into_iter().map(|(m, c)| (m.to_string(), c)).collect() }
    }

    /// New table with `overrides` added on top of this one.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, u32>) -> Self {
        let mut cycles = self.cycles.clone();
        for (mnemonic, count) in overrides {
            cycles.insert(mnemonic.clone(), *count);
        }
        Self { cycles }
    }

    pub fn cost(&self, mnemonic: &str) -> Option<u32> {
        self.cycles.get(mnemonic).copied()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// All entries sorted by mnemonic.
    pub fn entries(&self) -> Vec<(&str, u32)> {
        let mut out: Vec<(&str, u32)> =
            self.cycles.iter().map(|(m, c)| (m.as_str(), *c)).collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::avr().clone()
    }
}
