//! Property-based tests for the ledger invariants.
//!
//! Whatever sequence of appends, edits and deletes is applied, every cached
//! running total must match a fresh walk over the surviving entries.

use engine::{Ledger, OperationKind};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Step {
    Append(OperationKind, f64),
    Edit(usize, f64),
    Remove(usize),
}

fn kind() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::Add), Just(OperationKind::Subtract)]
}

/// Amounts in cents, the way a till would see them.
fn amount() -> impl Strategy<Value = f64> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| cents as f64 / 100.0)
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (kind(), amount()).prop_map(|(kind, value)| Step::Append(kind, value)),
        1 => (any::<usize>(), amount()).prop_map(|(at, value)| Step::Edit(at, value)),
        1 => any::<usize>().prop_map(Step::Remove),
    ]
}

fn apply(ledger: &mut Ledger, step: &Step) {
    match *step {
        Step::Append(kind, value) => {
            ledger.append(kind, value).unwrap();
        }
        Step::Edit(at, value) if !ledger.is_empty() => {
            let id = ledger.entries()[at % ledger.len()].id;
            ledger.edit(id, value).unwrap();
        }
        Step::Remove(at) if !ledger.is_empty() => {
            let id = ledger.entries()[at % ledger.len()].id;
            ledger.remove(id).unwrap();
        }
        _ => {}
    }
}

fn replay(ledger: &Ledger) -> Ledger {
    let mut fresh = Ledger::new();
    for op in ledger.entries() {
        fresh.append(op.kind, op.value).unwrap();
    }
    fresh
}

fn running_totals(ledger: &Ledger) -> Vec<f64> {
    ledger.entries().iter().map(|op| op.running_total).collect()
}

proptest! {
    /// Property: cached totals equal a fresh append-only replay.
    #[test]
    fn running_totals_match_a_fresh_replay(
        steps in prop::collection::vec(step(), 0..40),
    ) {
        let mut ledger = Ledger::new();
        for step in &steps {
            apply(&mut ledger, step);
        }

        let fresh = replay(&ledger);
        prop_assert_eq!(running_totals(&ledger), running_totals(&fresh));
        prop_assert_eq!(ledger.total(), fresh.total());
    }

    /// Property: each running total is the previous one plus the signed value.
    #[test]
    fn running_totals_step_by_signed_value(
        steps in prop::collection::vec(step(), 1..40),
    ) {
        let mut ledger = Ledger::new();
        for step in &steps {
            apply(&mut ledger, step);
        }

        let mut previous = 0.0;
        for op in ledger.entries() {
            let expected = previous + op.signed_value();
            prop_assert!(
                (op.running_total - expected).abs() < 1e-6,
                "entry {} expected {} got {}",
                op.id,
                expected,
                op.running_total
            );
            previous = op.running_total;
        }
        prop_assert_eq!(ledger.total(), previous);
    }

    /// Property: recalculating twice changes nothing.
    #[test]
    fn recalculation_is_idempotent(
        steps in prop::collection::vec(step(), 0..40),
    ) {
        let mut ledger = Ledger::new();
        for step in &steps {
            apply(&mut ledger, step);
        }

        ledger.recalculate_all().unwrap();
        let once = ledger.clone();
        ledger.recalculate_all().unwrap();

        prop_assert_eq!(ledger, once);
    }

    /// Property: an edit leaves ids and order untouched.
    #[test]
    fn edit_keeps_positions(
        values in prop::collection::vec((kind(), amount()), 1..20),
        at in any::<usize>(),
        replacement in amount(),
    ) {
        let mut ledger = Ledger::new();
        for (kind, value) in values {
            ledger.append(kind, value).unwrap();
        }
        let ids: Vec<_> = ledger.entries().iter().map(|op| op.id).collect();
        let target = ids[at % ids.len()];

        ledger.edit(target, replacement).unwrap();

        let after: Vec<_> = ledger.entries().iter().map(|op| op.id).collect();
        prop_assert_eq!(after, ids);
        prop_assert_eq!(ledger.get(target).map(|op| op.value), Some(replacement));
    }
}
