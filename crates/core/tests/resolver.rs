use avrcycles_core::analysis::{resolve, resolve_in_place, ResolveOptions};
use avrcycles_core::model::{Address, Diagnostic, FunctionMap, FunctionRecord};

fn addr(raw: &str) -> Address {
    Address::parse(raw)
}

fn function(start: &str, local: u64, callees: &[&str]) -> FunctionRecord {
    let mut record = FunctionRecord::new(addr(start), format!("fn_{start}"));
    record.local_cycles = local;
    record.callees = callees.iter().map(|c| addr(c)).collect();
    record
}

fn graph(records: Vec<FunctionRecord>) -> FunctionMap {
    records.into_iter().map(|r| (r.start.clone(), r)).collect()
}

#[test]
fn caller_total_includes_callee() {
    let records = graph(vec![function("a", 10, &[]), function("b", 5, &["a"])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("a")], 10);
    assert_eq!(resolution.totals[&addr("b")], 15);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn self_recursion_terminates_and_is_reported() {
    let records = graph(vec![function("c", 3, &["c"])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("c")], 3);
    assert_eq!(
        resolution.diagnostics,
        vec![Diagnostic::CallCycle {
            caller: addr("c"),
            target: addr("c"),
            path: vec![addr("c"), addr("c")],
        }]
    );
}

#[test]
fn mutual_recursion_gives_each_member_its_own_root_total() {
    let records = graph(vec![function("10", 4, &["20"]), function("20", 6, &["10"])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    // 10 -> 20 -> (10 on path) and 20 -> 10 -> (20 on path).
    assert_eq!(resolution.totals[&addr("10")], 10);
    assert_eq!(resolution.totals[&addr("20")], 10);
    assert_eq!(
        resolution.diagnostics,
        vec![
            Diagnostic::CallCycle {
                caller: addr("20"),
                target: addr("10"),
                path: vec![addr("10"), addr("20"), addr("10")],
            },
            Diagnostic::CallCycle {
                caller: addr("10"),
                target: addr("20"),
                path: vec![addr("20"), addr("10"), addr("20")],
            },
        ]
    );
}

#[test]
fn cycle_totals_do_not_depend_on_address_order() {
    // Same shape twice, with the two members' addresses swapped.
    let low_first = graph(vec![function("10", 4, &["20"]), function("20", 6, &["10"])]);
    let high_first = graph(vec![function("20", 4, &["10"]), function("10", 6, &["20"])]);
    let low = resolve(&low_first, &ResolveOptions::default());
    let high = resolve(&high_first, &ResolveOptions::default());
    assert_eq!(low.totals[&addr("10")], high.totals[&addr("20")]);
    assert_eq!(low.totals[&addr("20")], high.totals[&addr("10")]);
}

#[test]
fn caller_outside_a_cycle_sees_the_full_cycle() {
    let records = graph(vec![
        function("5", 1, &["20"]),
        function("10", 4, &["20"]),
        function("20", 6, &["10"]),
        function("30", 1, &["10"]),
    ]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("5")], 11);
    assert_eq!(resolution.totals[&addr("30")], 11);
    assert_eq!(resolution.totals[&addr("10")], 10);
    assert_eq!(resolution.totals[&addr("20")], 10);
}

#[test]
fn three_member_cycle_is_cut_at_each_root() {
    let records = graph(vec![
        function("1", 1, &["2"]),
        function("2", 10, &["3"]),
        function("3", 100, &["1"]),
    ]);
    let resolution = resolve(&records, &ResolveOptions { recursion_cost: 1000 });
    for start in ["1", "2", "3"] {
        assert_eq!(resolution.totals[&addr(start)], 1111, "total of {start}");
    }
    assert_eq!(resolution.diagnostics.len(), 3);
}

#[test]
fn recursion_cost_is_charged_per_cycle_edge() {
    let records = graph(vec![function("c", 3, &["c", "c"])]);
    let resolution = resolve(&records, &ResolveOptions { recursion_cost: 100 });
    assert_eq!(resolution.totals[&addr("c")], 203);
    // Both call sites share one caller/target edge.
    assert_eq!(resolution.diagnostics.len(), 1);
}

#[test]
fn diamond_counts_shared_callee_per_call_site() {
    let records = graph(vec![
        function("d", 1, &["e", "f"]),
        function("e", 10, &["9"]),
        function("f", 100, &["9"]),
        function("9", 1000, &[]),
    ]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("9")], 1000);
    assert_eq!(resolution.totals[&addr("e")], 1010);
    assert_eq!(resolution.totals[&addr("f")], 1100);
    assert_eq!(resolution.totals[&addr("d")], 1 + 10 + 100 + 2 * 1000);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn repeated_call_sites_each_add_the_callee() {
    let records = graph(vec![function("1", 2, &["2", "2", "2"]), function("2", 5, &[])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("1")], 17);
}

#[test]
fn missing_callee_adds_nothing_and_is_reported() {
    let records = graph(vec![function("1", 7, &["400"])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("1")], 7);
    assert_eq!(
        resolution.diagnostics,
        vec![Diagnostic::UnresolvedCall { caller: addr("1"), target: addr("400") }]
    );
}

#[test]
fn call_to_address_zero_resolves_when_defined() {
    let records = graph(vec![function("0", 6, &[]), function("7c", 3, &["0"])]);
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&addr("7c")], 9);
}

#[test]
fn deep_chains_do_not_recurse_on_the_native_stack() {
    let depth = 50_000u64;
    let records: FunctionMap = (0..depth)
        .map(|i| {
            let callees: Vec<Address> =
                if i + 1 < depth { vec![Address::from_value(i + 1)] } else { vec![] };
            let mut record = FunctionRecord::new(Address::from_value(i), "");
            record.local_cycles = 1;
            record.callees = callees;
            record
        })
        .map(|r| (r.start.clone(), r))
        .collect();
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&Address::from_value(0)], depth);
}

#[test]
fn resolve_in_place_fills_totals_without_touching_local_data() {
    let mut records = graph(vec![function("a", 10, &[]), function("b", 5, &["a", "ff"])]);
    let diagnostics = resolve_in_place(&mut records, &ResolveOptions::default());
    assert_eq!(diagnostics.len(), 1);
    let b = &records[&addr("b")];
    assert_eq!(b.total_cycles, Some(15));
    assert_eq!(b.local_cycles, 5);
    assert_eq!(b.callees, vec![addr("a"), addr("ff")]);
    assert_eq!(records[&addr("a")].total_cycles, Some(10));
}

#[test]
fn exponential_call_trees_saturate_instead_of_overflowing() {
    // Each function calls the next one twice: the root total is 2^70 - 1.
    let depth = 70u64;
    let records: FunctionMap = (0..depth)
        .map(|i| {
            let mut record = FunctionRecord::new(Address::from_value(i), "");
            record.local_cycles = 1;
            if i + 1 < depth {
                record.callees = vec![Address::from_value(i + 1), Address::from_value(i + 1)];
            }
            record
        })
        .map(|r| (r.start.clone(), r))
        .collect();
    let resolution = resolve(&records, &ResolveOptions::default());
    assert_eq!(resolution.totals[&Address::from_value(0)], u64::MAX);
    assert_eq!(resolution.totals[&Address::from_value(depth - 1)], 1);
    assert_eq!(resolution.totals[&Address::from_value(depth - 10)], (1 << 10) - 1);
}

#[test]
fn recursion_cost_near_the_limit_saturates() {
    let records = graph(vec![function("c", 3, &["c", "c"])]);
    let resolution = resolve(&records, &ResolveOptions { recursion_cost: u64::MAX });
    assert_eq!(resolution.totals[&addr("c")], u64::MAX);
}
