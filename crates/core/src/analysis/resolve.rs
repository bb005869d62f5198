//! Call-graph cost resolution.
//!
//! A function's total is its local cost plus the total of every callee, once
//! per call site. Resolution walks the graph with an explicit stack, keeps the
//! set of functions on the active path, and memoizes finished totals so shared
//! callees are walked once.
//!
//! Every total is the value the function gets when walked as its own root.
//! Functions inside a multi-function recursion cycle are therefore never
//! memoized: where their cycle is cut depends on which member the walk entered
//! through.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::model::{Address, Diagnostic, FunctionMap, FunctionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Cost charged for a call edge that closes a cycle.
    #[serde(default)]
    pub recursion_cost: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub totals: BTreeMap<Address, u64>,
    pub diagnostics: Vec<Diagnostic>,
}

struct Frame<'r> {
    record: &'r FunctionRecord,
    next: usize,
    total: u64,
}

impl<'r> Frame<'r> {
    fn new(record: &'r FunctionRecord) -> Self {
        Self { record, next: 0, total: record.local_cycles }
    }
}

/// Shared state across the per-root walks of one `resolve` call.
struct Walker<'r> {
    records: &'r FunctionMap,
    options: &'r ResolveOptions,
    /// Members of strongly connected components with more than one function.
    cyclic: HashSet<&'r Address>,
    memo: HashMap<&'r Address, u64>,
    /// (caller, target) edges already reported, per diagnostic kind.
    reported_cycles: HashSet<(&'r Address, &'r Address)>,
    reported_unresolved: HashSet<(&'r Address, &'r Address)>,
    diagnostics: Vec<Diagnostic>,
}

/// Resolve totals for every record.
///
/// Calls to addresses with no record add nothing. A call back onto the active
/// path adds `recursion_cost` instead of recursing. Both are reported as
/// diagnostics, once per distinct caller/target edge. Totals do not depend on
/// the order in which functions are visited.
pub fn resolve(records: &FunctionMap, options: &ResolveOptions) -> Resolution {
    let mut walker = Walker::new(records, options);
    let totals: BTreeMap<Address, u64> = records
        .iter()
        .map(|(start, record)| (start.clone(), walker.total_of(record)))
        .collect();
    tracing::debug!(
        functions = totals.len(),
        cyclic = walker.cyclic.len(),
        diagnostics = walker.diagnostics.len(),
        "call graph resolved"
    );
    Resolution { totals, diagnostics: walker.diagnostics }
}

/// Resolve and store each total in its record's `total_cycles`.
pub fn resolve_in_place(records: &mut FunctionMap, options: &ResolveOptions) -> Vec<Diagnostic> {
    let Resolution { totals, diagnostics } = resolve(records, options);
    for (start, total) in totals {
        if let Some(record) = records.get_mut(&start) {
            record.total_cycles = Some(total);
        }
    }
    diagnostics
}

/// Functions that share a recursion cycle with at least one other function.
/// A function that only calls itself is not included.
fn cyclic_functions(records: &FunctionMap) -> HashSet<&Address> {
    let mut graph: DiGraphMap<&Address, ()> = DiGraphMap::new();
    for (start, record) in records {
        graph.add_node(start);
        for target in &record.callees {
            if let Some((callee, _)) = records.get_key_value(target) {
                graph.add_edge(start, callee, ());
            }
        }
    }
    tarjan_scc(&graph).into_iter().filter(|scc| scc.len() > 1).flatten().collect()
}

impl<'r> Walker<'r> {
    fn new(records: &'r FunctionMap, options: &'r ResolveOptions) -> Self {
        Self {
            records,
            options,
            cyclic: cyclic_functions(records),
            memo: HashMap::new(),
            reported_cycles: HashSet::new(),
            reported_unresolved: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Total for `root`, walked as the root of its own call tree.
    fn total_of(&mut self, root: &'r FunctionRecord) -> u64 {
        if let Some(done) = self.memo.get(&root.start) {
            return *done;
        }

        let records = self.records;
        let mut stack = vec![Frame::new(root)];
        let mut on_path: HashSet<&'r Address> = HashSet::from([&root.start]);

        while let Some(frame) = stack.last_mut() {
            let record = frame.record;
            let Some(target) = record.callees.get(frame.next) else {
                let total = frame.total;
                stack.pop();
                on_path.remove(&record.start);
                if !self.cyclic.contains(&record.start) {
                    self.memo.insert(&record.start, total);
                }
                match stack.last_mut() {
                    Some(parent) => parent.total = parent.total.saturating_add(total),
                    None => return total,
                }
                continue;
            };
            frame.next += 1;

            if let Some(done) = self.memo.get(target) {
                frame.total = frame.total.saturating_add(*done);
                continue;
            }
            match records.get_key_value(target) {
                None => self.report_unresolved(&record.start, target),
                Some((target, _)) if on_path.contains(target) => {
                    frame.total = frame.total.saturating_add(self.options.recursion_cost);
                    let path = stack
                        .iter()
                        .map(|f| &f.record.start)
                        .skip_while(|start| *start != target)
                        .chain(std::iter::once(target));
                    self.report_cycle(&record.start, target, path);
                }
                Some((_, callee)) => {
                    on_path.insert(&callee.start);
                    stack.push(Frame::new(callee));
                }
            }
        }
        root.local_cycles
    }

    fn report_unresolved(&mut self, caller: &'r Address, target: &'r Address) {
        if !self.reported_unresolved.insert((caller, target)) {
            return;
        }
        tracing::warn!(%caller, %target, "call target has no function");
        self.diagnostics
            .push(Diagnostic::UnresolvedCall { caller: caller.clone(), target: target.clone() });
    }

    fn report_cycle<'p>(
        &mut self,
        caller: &'r Address,
        target: &'r Address,
        path: impl Iterator<Item = &'p Address>,
    ) {
        if !self.reported_cycles.insert((caller, target)) {
            return;
        }
        tracing::warn!(%caller, %target, "recursive call cycle broken");
        self.diagnostics.push(Diagnostic::CallCycle {
            caller: caller.clone(),
            target: target.clone(),
            path: path.cloned().collect(),
        });
    }
}
