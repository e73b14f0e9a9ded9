//! Persisted calculator snapshots.
//!
//! A [`Snapshot`] is the flat record an external store keeps between
//! sessions. Reading one is a versioned union:
//!
//! 1. the current shape, recognized by its `operationHistory` field;
//! 2. the legacy shape, recognized by a flat `addedNumbers` list. Those
//!    entries have no identity, so the ledger starts empty;
//! 3. anything else falls back to a fresh calculator.
//!
//! Inside a recognized shape a malformed field falls back to its initial
//! value on its own, so one bad field never discards the rest.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Calculator, CalculatorState, DisplayMode, EngineError, Ledger, Operation, Operator,
    ResultEngine,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_entry: String,
    pub previous_value: Option<f64>,
    pub pending_operator: Option<Operator>,
    pub awaiting_new_entry: bool,
    pub last_added_value: Option<f64>,
    pub display_mode: DisplayMode,
    pub operation_history: Vec<Operation>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::from(&Calculator::default())
    }
}

impl Snapshot {
    /// Read a stored snapshot. Never fails: unknown or broken input yields
    /// the initial state.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<StoredSnapshot>(raw) {
            Ok(StoredSnapshot::Current(current)) => current.into(),
            Ok(StoredSnapshot::Legacy(legacy)) => {
                tracing::warn!(
                    dropped = legacy.added_numbers.len(),
                    "legacy snapshot without entry identities, starting with an empty ledger"
                );
                legacy.into()
            }
            Err(err) => {
                tracing::warn!("unreadable snapshot, starting fresh: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        serde_json::to_string(self).map_err(|err| EngineError::InvalidValue(err.to_string()))
    }
}

impl From<&Calculator> for Snapshot {
    fn from(calculator: &Calculator) -> Self {
        let state = calculator.state();
        Self {
            current_entry: state.current_entry.clone(),
            previous_value: state.previous_value,
            pending_operator: state.pending_operator,
            awaiting_new_entry: state.awaiting_new_entry,
            last_added_value: state.last_added_value,
            display_mode: state.display_mode,
            operation_history: calculator.ledger().entries().to_vec(),
        }
    }
}

impl From<Snapshot> for Calculator {
    /// Cached running totals are re-derived; a history that cannot be
    /// rebuilt (duplicated ids, overflow) is dropped as a whole.
    fn from(snapshot: Snapshot) -> Self {
        let ledger = Ledger::from_entries(snapshot.operation_history).unwrap_or_else(|err| {
            tracing::warn!("discarding stored history: {err}");
            Ledger::new()
        });

        let state = CalculatorState {
            current_entry: sanitize_entry(snapshot.current_entry),
            previous_value: snapshot.previous_value.filter(|v| v.is_finite()),
            pending_operator: snapshot.pending_operator,
            awaiting_new_entry: snapshot.awaiting_new_entry,
            last_added_value: snapshot.last_added_value.filter(|v| v.is_finite()),
            display_mode: snapshot.display_mode,
        };
        Calculator::from_parts(state, ledger)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Current(CurrentShape),
    Legacy(LegacyShape),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentShape {
    #[serde(default, deserialize_with = "lenient")]
    current_entry: String,
    #[serde(default, deserialize_with = "lenient")]
    previous_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pending_operator: Option<Operator>,
    #[serde(default, deserialize_with = "lenient")]
    awaiting_new_entry: bool,
    #[serde(default, deserialize_with = "lenient")]
    last_added_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    display_mode: DisplayMode,
    #[serde(deserialize_with = "lenient")]
    operation_history: Vec<Operation>,
}

impl From<CurrentShape> for Snapshot {
    fn from(shape: CurrentShape) -> Self {
        Self {
            current_entry: shape.current_entry,
            previous_value: shape.previous_value,
            pending_operator: shape.pending_operator,
            awaiting_new_entry: shape.awaiting_new_entry,
            last_added_value: shape.last_added_value,
            display_mode: shape.display_mode,
            operation_history: shape.operation_history,
        }
    }
}

/// The pre-ledger shape: totals were a bare list of added numbers.
///
/// Only the entry buffer and the display mode carry over. The staged
/// operand and operator belonged to the discarded running total.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyShape {
    #[serde(default, alias = "currentValue", deserialize_with = "lenient")]
    current_entry: String,
    #[serde(default, alias = "dollarMode", deserialize_with = "legacy_mode")]
    display_mode: DisplayMode,
    #[serde(deserialize_with = "lenient")]
    added_numbers: Vec<Value>,
}

impl From<LegacyShape> for Snapshot {
    fn from(shape: LegacyShape) -> Self {
        Self {
            current_entry: shape.current_entry,
            display_mode: shape.display_mode,
            ..Self::default()
        }
    }
}

/// Deserialize a field, substituting its default when the value is
/// malformed instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Legacy stores kept the mode as a `dollarMode` boolean.
fn legacy_mode<'de, D>(deserializer: D) -> Result<DisplayMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(true) => DisplayMode::Currency,
        other => serde_json::from_value(other).unwrap_or_default(),
    })
}

/// Accept only buffers the keypad could have produced: an optional `-`,
/// digits, and at most one `.`.
fn sanitize_entry(entry: String) -> String {
    let body = entry.strip_prefix('-').unwrap_or(&entry);
    let mut dots = 0;
    let well_formed = !body.is_empty()
        && body.chars().all(|c| {
            if c == '.' {
                dots += 1;
            }
            c.is_ascii_digit() || c == '.'
        })
        && dots <= 1
        && body != ".";
    if well_formed {
        entry
    } else {
        "0".to_string()
    }
}
