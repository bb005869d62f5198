//! Single-pass grouping of instruction rows into function scopes.

use crate::analysis::classify::{classify, LineKind};
use crate::analysis::parser::InstructionParser;
use crate::model::{Diagnostic, FunctionMap, FunctionRecord};

/// Output of a segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub records: FunctionMap,
    pub instruction_count: usize,
    pub cycle_count: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulator fed one line at a time.
///
/// Only the scope currently being scanned is held open; finished scopes move
/// into the output map keyed by start address (a repeated key replaces the
/// earlier record).
pub struct Segmenter<'a> {
    parser: InstructionParser<'a>,
    current: Option<FunctionRecord>,
    line_no: usize,
    out: Segmentation,
}

impl<'a> Segmenter<'a> {
    pub fn new(parser: InstructionParser<'a>) -> Self {
        Self { parser, current: None, line_no: 0, out: Segmentation::default() }
    }

    pub fn feed(&mut self, line: &str) {
        self.line_no += 1;
        match classify(line) {
            LineKind::Symbol { address, name } => {
                self.close_current();
                tracing::debug!(line = self.line_no, %address, %name, "function scope opened");
                self.current = Some(FunctionRecord::new(address, name));
            }
            LineKind::Instruction => match self.parser.parse(line, self.line_no) {
                Ok(parsed) => {
                    let instruction = parsed.instruction;
                    if let Some(diagnostic) = parsed.diagnostic {
                        self.out.diagnostics.push(diagnostic);
                    }
                    self.out.instruction_count += 1;
                    self.out.cycle_count =
                        self.out.cycle_count.saturating_add(u64::from(instruction.cycles));
                    // Rows before the first symbol form an anonymous scope.
                    let scope = self.current.get_or_insert_with(|| {
                        tracing::debug!(address = %instruction.address, "implicit scope opened");
                        FunctionRecord::new(instruction.address.clone(), "")
                    });
                    scope.absorb(&instruction);
                }
                Err(err) => tracing::trace!("ignored row: {err}"),
            },
            LineKind::Other => {}
        }
    }

    pub fn finish(mut self) -> Segmentation {
        self.close_current();
        self.out
    }

    fn close_current(&mut self) {
        if let Some(record) = self.current.take() {
            tracing::debug!(
                start = %record.start,
                local_cycles = record.local_cycles,
                calls = record.callees.len(),
                "function scope closed"
            );
            if let Some(previous) = self.out.records.insert(record.start.clone(), record) {
                tracing::debug!(start = %previous.start, "duplicate symbol address replaced");
            }
        }
    }
}

/// Segment every line yielded by `lines`.
pub fn segment<'l>(
    parser: InstructionParser<'_>,
    lines: impl IntoIterator<Item = &'l str>,
) -> Segmentation {
    let mut segmenter = Segmenter::new(parser);
    for line in lines {
        segmenter.feed(line);
    }
    segmenter.finish()
}
