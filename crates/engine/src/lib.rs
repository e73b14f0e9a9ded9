//! Running-total calculator engine.
//!
//! The [`Ledger`] keeps every committed addition and subtraction with its
//! running total; the [`Calculator`] turns keystrokes into ledger commits;
//! the [`Session`] wires both to front-end observers and [`Snapshot`]s.

pub use calculator::{Calculator, CalculatorState, ClearKey, DisplayMode, Operator, Phase};
pub use error::EngineError;
pub use ledger::Ledger;
pub use operation::{Operation, OperationKind};
pub use session::{Key, Observer, Session, SessionEvent};
pub use snapshot::Snapshot;

pub mod display;

mod calculator;
mod error;
mod ledger;
mod operation;
mod session;
mod snapshot;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
