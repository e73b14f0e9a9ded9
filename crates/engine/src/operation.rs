//! Ledger operations.
//!
//! An `Operation` is one committed addition or subtraction. Its identity and
//! kind never change; its `value` can be edited and its `running_total` is
//! derived by the [`Ledger`](crate::Ledger).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Operator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Add,
    Subtract,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
        }
    }

    /// Symbol shown in front of a ledger row.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
        }
    }

    /// Contribution of `value` to the running total.
    #[must_use]
    pub fn signed(self, value: f64) -> f64 {
        match self {
            Self::Add => value,
            Self::Subtract => -value,
        }
    }
}

impl TryFrom<Operator> for OperationKind {
    type Error = EngineError;

    fn try_from(value: Operator) -> Result<Self, Self::Error> {
        match value {
            Operator::Add => Ok(Self::Add),
            Operator::Subtract => Ok(Self::Subtract),
            other => Err(EngineError::InvalidInput(format!(
                "{} never reaches the ledger",
                other.as_str()
            ))),
        }
    }
}

impl From<OperationKind> for Operator {
    fn from(value: OperationKind) -> Self {
        match value {
            OperationKind::Add => Operator::Add,
            OperationKind::Subtract => Operator::Subtract,
        }
    }
}

/// A committed ledger entry.
///
/// Serialized with the snapshot field names (`createdAt`, `runningTotal`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: Uuid,
    pub kind: OperationKind,
    pub value: f64,
    pub created_at: DateTime<Utc>,
    /// Derived; stores may omit it.
    #[serde(default)]
    pub running_total: f64,
}

impl Operation {
    pub(crate) fn new(kind: OperationKind, value: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value,
            created_at,
            running_total: 0.0,
        }
    }

    /// Contribution of this entry to the running total.
    #[must_use]
    pub fn signed_value(&self) -> f64 {
        self.kind.signed(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtract_contributes_negatively() {
        assert_eq!(OperationKind::Add.signed(4.5), 4.5);
        assert_eq!(OperationKind::Subtract.signed(4.5), -4.5);
    }

    #[test]
    fn only_add_and_subtract_map_to_ledger_kinds() {
        assert_eq!(
            OperationKind::try_from(Operator::Subtract),
            Ok(OperationKind::Subtract)
        );
        assert!(OperationKind::try_from(Operator::Multiply).is_err());
        assert!(OperationKind::try_from(Operator::Divide).is_err());
    }

    #[test]
    fn serializes_with_snapshot_field_names() {
        let op = Operation::new(OperationKind::Subtract, 3.0, Utc::now());
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["kind"], "Subtract");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("runningTotal").is_some());
    }
}
