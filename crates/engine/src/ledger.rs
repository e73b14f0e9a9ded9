//! The operation-history ledger.
//!
//! A [`Ledger`] is an ordered list of [`Operation`]s, each caching the
//! running total up to and including itself. Appending extends the totals
//! in O(1); edits and deletes re-derive every total from an empty
//! accumulator so a stale partial sum can never survive a change in the
//! middle of the history.
//!
//! Mutations are staged on a copy of the history and only swapped in once
//! the recalculation succeeded, so a failing edit or delete leaves the
//! ledger untouched.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    EngineError, Operation, OperationKind, ResultEngine,
    util::{ensure_finite, round_value},
};

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    operations: Vec<Operation>,
    total: f64,
    revision: u64,
}

/// Two ledgers are equal when they hold the same history; the revision
/// counter is local bookkeeping and does not take part.
impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.operations == other.operations && self.total == other.total
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from restored entries.
    ///
    /// Cached running totals in `entries` are ignored and re-derived.
    /// Fails with [`EngineError::InvalidValue`] on a non-finite value or a
    /// duplicated id.
    pub fn from_entries(entries: Vec<Operation>) -> ResultEngine<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for op in &entries {
            ensure_finite(op.value, "entry value")?;
            if !seen.insert(op.id) {
                return Err(EngineError::InvalidValue(format!(
                    "duplicated entry id {}",
                    op.id
                )));
            }
        }

        let mut operations = entries;
        let total = recalculate(&mut operations)?;
        Ok(Self {
            operations,
            total,
            revision: 0,
        })
    }

    /// Append a new entry at the end of the history.
    pub fn append(&mut self, kind: OperationKind, value: f64) -> ResultEngine<Operation> {
        let value = ensure_finite(value, "value")?;
        let total = round_value(self.total + kind.signed(value));
        if !total.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "running total overflows after {} {value}",
                kind.as_str()
            )));
        }

        // Creation markers never go backwards, even if the wall clock does.
        let now = Utc::now();
        let created_at = self
            .operations
            .last()
            .map_or(now, |last| last.created_at.max(now));

        let mut op = Operation::new(kind, value, created_at);
        op.running_total = total;
        self.operations.push(op.clone());
        self.total = total;
        self.revision += 1;

        tracing::debug!(id = %op.id, kind = kind.as_str(), value, total, "ledger append");
        Ok(op)
    }

    /// Replace the value of the entry `id`, keeping its kind and position.
    pub fn edit(&mut self, id: Uuid, value: f64) -> ResultEngine<()> {
        let index = self.position(id)?;
        let value = ensure_finite(value, "value")?;

        let mut staged = self.operations.clone();
        staged[index].value = value;
        self.commit(staged)?;

        tracing::debug!(%id, value, total = self.total, "ledger edit");
        Ok(())
    }

    /// Remove the entry `id` and return it.
    pub fn remove(&mut self, id: Uuid) -> ResultEngine<Operation> {
        let index = self.position(id)?;

        let mut staged = self.operations.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        tracing::debug!(%id, total = self.total, "ledger remove");
        Ok(removed)
    }

    /// Re-derive every running total from scratch.
    ///
    /// Idempotent: a second call yields the same totals.
    pub fn recalculate_all(&mut self) -> ResultEngine<()> {
        let staged = self.operations.clone();
        self.commit(staged)
    }

    /// Grand total: the last running total, or 0 when empty.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, id: Uuid) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Counter bumped by every mutation, including `clear`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clear(&mut self) {
        self.operations.clear();
        self.total = 0.0;
        self.revision += 1;
        tracing::debug!("ledger cleared");
    }

    fn position(&self, id: Uuid) -> ResultEngine<usize> {
        self.operations
            .iter()
            .position(|op| op.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    fn commit(&mut self, mut staged: Vec<Operation>) -> ResultEngine<()> {
        let total = recalculate(&mut staged)?;
        self.operations = staged;
        self.total = total;
        self.revision += 1;
        Ok(())
    }
}

/// Walk `operations` in order and write each running total.
///
/// Returns the final total. On overflow `operations` is left half-written,
/// which is why callers only ever pass a staged copy.
fn recalculate(operations: &mut [Operation]) -> ResultEngine<f64> {
    let mut total = 0.0;
    for op in operations.iter_mut() {
        total = round_value(total + op.signed_value());
        if !total.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "running total overflows at entry {}",
                op.id
            )));
        }
        op.running_total = total;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_totals(ledger: &Ledger) -> Vec<f64> {
        ledger.entries().iter().map(|op| op.running_total).collect()
    }

    #[test]
    fn append_extends_running_total() {
        let mut ledger = Ledger::new();
        let first = ledger.append(OperationKind::Add, 5.0).unwrap();
        let second = ledger.append(OperationKind::Subtract, 3.0).unwrap();

        assert_eq!(first.running_total, 5.0);
        assert_eq!(second.running_total, 2.0);
        assert_eq!(ledger.total(), 2.0);
        assert_eq!(running_totals(&ledger), vec![5.0, 2.0]);
    }

    #[test]
    fn append_rejects_non_finite_values() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.append(OperationKind::Add, f64::NAN),
            Err(EngineError::InvalidValue(_))
        ));
        assert!(matches!(
            ledger.append(OperationKind::Subtract, f64::NEG_INFINITY),
            Err(EngineError::InvalidValue(_))
        ));
        assert!(ledger.is_empty());
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn append_rejects_overflowing_total() {
        let mut ledger = Ledger::new();
        ledger.append(OperationKind::Add, f64::MAX).unwrap();
        let before = ledger.clone();

        assert!(matches!(
            ledger.append(OperationKind::Add, f64::MAX),
            Err(EngineError::InvalidValue(_))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn creation_markers_are_monotonic() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.append(OperationKind::Add, 1.0).unwrap();
        }
        assert!(
            ledger
                .entries()
                .windows(2)
                .all(|pair| pair[0].created_at <= pair[1].created_at)
        );
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let mut ledger = Ledger::new();
        ledger.append(OperationKind::Add, 1.0).unwrap();
        let id = Uuid::new_v4();
        assert_eq!(
            ledger.edit(id, 2.0),
            Err(EngineError::NotFound(id.to_string()))
        );
    }

    #[test]
    fn edit_to_zero_keeps_the_entry() {
        let mut ledger = Ledger::new();
        let op = ledger.append(OperationKind::Add, 8.0).unwrap();
        ledger.append(OperationKind::Add, 2.0).unwrap();

        ledger.edit(op.id, 0.0).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(running_totals(&ledger), vec![0.0, 2.0]);
        assert_eq!(ledger.total(), 2.0);
    }

    #[test]
    fn edit_with_nan_leaves_ledger_untouched() {
        let mut ledger = Ledger::new();
        let op = ledger.append(OperationKind::Add, 8.0).unwrap();
        let before = ledger.clone();

        assert!(matches!(
            ledger.edit(op.id, f64::NAN),
            Err(EngineError::InvalidValue(_))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn remove_that_would_overflow_rolls_back() {
        let mut ledger = Ledger::new();
        ledger.append(OperationKind::Add, f64::MAX).unwrap();
        let compensating = ledger.append(OperationKind::Subtract, f64::MAX).unwrap();
        ledger.append(OperationKind::Add, f64::MAX).unwrap();
        let before = ledger.clone();

        assert!(matches!(
            ledger.remove(compensating.id),
            Err(EngineError::InvalidValue(_))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn removing_the_only_entry_empties_the_ledger() {
        let mut ledger = Ledger::new();
        let op = ledger.append(OperationKind::Subtract, 4.0).unwrap();

        let removed = ledger.remove(op.id).unwrap();

        assert_eq!(removed.id, op.id);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0.0);
    }

    #[test]
    fn clear_resets_total_and_bumps_revision() {
        let mut ledger = Ledger::new();
        ledger.append(OperationKind::Add, 4.0).unwrap();
        let revision = ledger.revision();

        ledger.clear();

        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0.0);
        assert!(ledger.revision() > revision);
    }

    #[test]
    fn from_entries_rederives_stale_totals() {
        let mut source = Ledger::new();
        source.append(OperationKind::Add, 10.0).unwrap();
        source.append(OperationKind::Subtract, 4.0).unwrap();
        let mut entries = source.entries().to_vec();
        entries[0].running_total = 999.0;
        entries[1].running_total = -1.0;

        let ledger = Ledger::from_entries(entries).unwrap();

        assert_eq!(running_totals(&ledger), vec![10.0, 6.0]);
        assert_eq!(ledger.total(), 6.0);
    }

    #[test]
    fn from_entries_rejects_duplicated_ids() {
        let mut source = Ledger::new();
        let op = source.append(OperationKind::Add, 1.0).unwrap();

        assert!(matches!(
            Ledger::from_entries(vec![op.clone(), op]),
            Err(EngineError::InvalidValue(_))
        ));
    }
}
