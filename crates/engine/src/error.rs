//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidValue`] returned when a ledger mutation receives a non-finite
//!   number, or would push a running total out of the finite range.
//! - [`NotFound`] returned when an edit or delete references an unknown entry.
//! - [`DivideByZero`] returned when a division has a zero right operand.
//! - [`InvalidInput`] returned when a key carries something that is not a digit.
//!
//! Every error is recoverable: the operation that produced it leaves the
//! calculator and the ledger exactly as they were.
//!
//!  [`InvalidValue`]: EngineError::InvalidValue
//!  [`NotFound`]: EngineError::NotFound
//!  [`DivideByZero`]: EngineError::DivideByZero
//!  [`InvalidInput`]: EngineError::InvalidInput
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("\"{0}\" entry not found!")]
    NotFound(String),
    #[error("Cannot divide by zero")]
    DivideByZero,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
