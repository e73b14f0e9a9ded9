//! The calculator state machine.
//!
//! A [`Calculator`] interprets keystrokes against its [`CalculatorState`] and
//! owns the [`Ledger`]. Only additions and subtractions are committed to the
//! ledger; multiplication and division transform the displayed number only.
//!
//! Every operation either completes or returns an error with the state and
//! the ledger left exactly as they were.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Ledger, Operation, OperationKind, ResultEngine,
    display::{format_currency, format_plain},
    util::{ensure_finite, number_to_entry, parse_currency, parse_number, round_value},
};

/// Binary operator keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Plain,
    /// Integer input is read as minor units (cents).
    Currency,
}

/// Coarse phase of the state machine, derived from [`CalculatorState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Building `current_entry`.
    Entering,
    /// Operator chosen, waiting for the right operand.
    OperatorPending,
    /// A result is shown; the next digit starts a fresh entry.
    Result,
}

/// What the clear key does right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearKey {
    AllClear,
    Clear,
}

impl ClearKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::AllClear => "AC",
            Self::Clear => "C",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    pub current_entry: String,
    pub previous_value: Option<f64>,
    pub pending_operator: Option<Operator>,
    pub awaiting_new_entry: bool,
    pub last_added_value: Option<f64>,
    pub display_mode: DisplayMode,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_entry: "0".to_string(),
            previous_value: None,
            pending_operator: None,
            awaiting_new_entry: false,
            last_added_value: None,
            display_mode: DisplayMode::Plain,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Calculator {
    state: CalculatorState,
    ledger: Ledger,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(state: CalculatorState, ledger: Ledger) -> Self {
        Self { state, ledger }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn current_entry(&self) -> &str {
        &self.state.current_entry
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.state.display_mode
    }

    pub fn phase(&self) -> Phase {
        match (self.state.awaiting_new_entry, self.state.pending_operator) {
            (false, _) => Phase::Entering,
            (true, Some(_)) => Phase::OperatorPending,
            (true, None) => Phase::Result,
        }
    }

    /// Numeric value of the entry buffer, honoring currency mode.
    ///
    /// Infinite when the buffer holds more digits than an `f64` can carry.
    pub fn current_value(&self) -> f64 {
        match self.state.display_mode {
            DisplayMode::Plain => parse_number(&self.state.current_entry),
            DisplayMode::Currency => parse_currency(&self.state.current_entry),
        }
    }

    /// The entry as an operand; `InvalidValue` when it overflowed.
    fn entry_value(&self) -> ResultEngine<f64> {
        ensure_finite(self.current_value(), "entry")
    }

    pub fn input_digit(&mut self, digit: char) -> ResultEngine<()> {
        if !digit.is_ascii_digit() {
            return Err(EngineError::InvalidInput(format!("{digit:?} is not a digit")));
        }
        self.push_digit(digit);
        Ok(())
    }

    /// The `00` key: two zeroes, collapsed like any other leading zero.
    pub fn input_double_zero(&mut self) {
        self.push_digit('0');
        self.push_digit('0');
    }

    fn push_digit(&mut self, digit: char) {
        let entry = &mut self.state.current_entry;
        if self.state.awaiting_new_entry {
            *entry = digit.to_string();
            self.state.awaiting_new_entry = false;
        } else if entry == "0" {
            *entry = digit.to_string();
        } else if entry == "-0" {
            *entry = format!("-{digit}");
        } else {
            entry.push(digit);
        }
    }

    pub fn input_decimal_point(&mut self) {
        if self.state.awaiting_new_entry {
            self.state.current_entry = "0.".to_string();
            self.state.awaiting_new_entry = false;
        } else if !self.state.current_entry.contains('.') {
            self.state.current_entry.push('.');
        }
    }

    pub fn toggle_sign(&mut self) {
        let entry = &mut self.state.current_entry;
        if entry == "0" {
            return;
        }
        *entry = match entry.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{entry}"),
        };
    }

    /// Leaves an overflowed entry as typed.
    pub fn input_percent(&mut self) {
        let value = round_value(parse_number(&self.state.current_entry) / 100.0);
        if !value.is_finite() {
            return;
        }
        self.state.current_entry = number_to_entry(value);
    }

    pub fn backspace(&mut self) {
        let entry = &mut self.state.current_entry;
        if entry.chars().count() > 1 {
            entry.pop();
            if entry == "-" {
                *entry = "0".to_string();
            }
        } else {
            *entry = "0".to_string();
        }
    }

    /// Press an operator key.
    ///
    /// A second `+` with no new digits repeats the last addition. The first
    /// `+`/`−` on an empty ledger seeds it with the staged operand. Pressing
    /// a different operator before typing an operand only swaps the pending
    /// operator; it does not resolve the pending one against the shown result.
    ///
    /// Fails with `InvalidValue`, state untouched, when the entry overflowed.
    pub fn set_operator(&mut self, op: Operator) -> ResultEngine<()> {
        let pending = self.state.pending_operator;
        let awaiting = self.state.awaiting_new_entry;

        if op == Operator::Add
            && pending == Some(Operator::Add)
            && awaiting
            && let Some(last) = self.state.last_added_value
        {
            let left = match self.state.previous_value {
                Some(previous) => previous,
                None => self.entry_value()?,
            };
            let result = self.calculate(Operator::Add, left, last)?;
            tracing::debug!(last, result, "repeat addition");
            self.state.current_entry = self.result_entry(result);
            self.state.previous_value = Some(result);
            self.state.awaiting_new_entry = true;
            return Ok(());
        }

        let input = self.entry_value()?;
        match (self.state.previous_value, pending) {
            (None, _) => {
                if matches!(op, Operator::Add | Operator::Subtract) && self.ledger.is_empty() {
                    // The first operand is the starting balance, whatever follows it.
                    self.ledger.append(OperationKind::Add, input)?;
                    if op == Operator::Add {
                        self.state.last_added_value = Some(input);
                    }
                }
                self.state.previous_value = Some(input);
            }
            (Some(_), Some(_)) if awaiting => {}
            (Some(left), Some(pending)) => {
                let result = self.calculate(pending, left, input)?;
                self.state.current_entry = self.result_entry(result);
                self.state.previous_value = Some(result);
            }
            (Some(_), None) => {}
        }

        self.state.pending_operator = Some(op);
        self.state.awaiting_new_entry = true;
        Ok(())
    }

    /// Resolve the pending operation. A no-op when nothing is pending.
    pub fn equals(&mut self) -> ResultEngine<()> {
        if self.state.previous_value.is_none() || self.state.pending_operator.is_none() {
            return Ok(());
        }

        let result = self.perform_calculation()?;
        self.state.current_entry = self.result_entry(result);
        self.state.previous_value = None;
        self.state.pending_operator = None;
        self.state.awaiting_new_entry = true;
        Ok(())
    }

    /// Apply the pending operator to the staged operand and the entry.
    ///
    /// Returns the entry's value unchanged when nothing is pending.
    pub fn perform_calculation(&mut self) -> ResultEngine<f64> {
        let right = self.entry_value()?;
        match (self.state.previous_value, self.state.pending_operator) {
            (Some(left), Some(op)) => self.calculate(op, left, right),
            _ => Ok(right),
        }
    }

    /// `full_reset` empties the ledger and every register but keeps the
    /// display mode; otherwise only the entry is reset.
    pub fn clear(&mut self, full_reset: bool) {
        if full_reset {
            self.state = CalculatorState {
                display_mode: self.state.display_mode,
                ..CalculatorState::default()
            };
            self.ledger.clear();
        } else {
            self.state.current_entry = "0".to_string();
        }
    }

    pub fn clear_key(&self) -> ClearKey {
        let state = &self.state;
        let pristine = state.current_entry == "0"
            && state.previous_value.is_none()
            && state.pending_operator.is_none()
            && !state.awaiting_new_entry
            && self.ledger.is_empty();
        if pristine {
            ClearKey::AllClear
        } else {
            ClearKey::Clear
        }
    }

    /// The clear key as shown: `C` clears the entry, or everything when the
    /// entry is already `0`; `AC` clears everything.
    pub fn press_clear(&mut self) {
        let full_reset = match self.clear_key() {
            ClearKey::AllClear => true,
            ClearKey::Clear => self.state.current_entry == "0",
        };
        self.clear(full_reset);
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.state.display_mode = mode;
    }

    pub fn toggle_display_mode(&mut self) {
        self.state.display_mode = match self.state.display_mode {
            DisplayMode::Plain => DisplayMode::Currency,
            DisplayMode::Currency => DisplayMode::Plain,
        };
    }

    pub fn edit_entry(&mut self, id: Uuid, value: f64) -> ResultEngine<()> {
        self.ledger.edit(id, value)
    }

    pub fn remove_entry(&mut self, id: Uuid) -> ResultEngine<Operation> {
        self.ledger.remove(id)
    }

    /// Text for the main display.
    pub fn primary_display(&self) -> String {
        let state = &self.state;
        match state.display_mode {
            DisplayMode::Plain => format_plain(&state.current_entry),
            DisplayMode::Currency => match (state.awaiting_new_entry, state.previous_value) {
                (true, Some(previous)) => format_currency(previous),
                _ => format_currency(self.current_value()),
            },
        }
    }

    /// Staged operand and operator, e.g. `"12 +"`; empty when nothing is
    /// pending.
    pub fn secondary_display(&self) -> String {
        match (self.state.previous_value, self.state.pending_operator) {
            (Some(previous), Some(op)) => {
                format!("{} {}", self.format_amount(previous), op.symbol())
            }
            _ => String::new(),
        }
    }

    /// Render any value in the active display mode.
    pub fn format_amount(&self, value: f64) -> String {
        match self.state.display_mode {
            DisplayMode::Plain => format_plain(&number_to_entry(value)),
            DisplayMode::Currency => format_currency(value),
        }
    }

    /// Ledger row text: signed value and running total, e.g. `("+5", "= 12")`.
    pub fn entry_row(&self, op: &Operation) -> (String, String) {
        (
            format!("{}{}", op.kind.symbol(), self.format_amount(op.value)),
            format!("= {}", self.format_amount(op.running_total)),
        )
    }

    fn calculate(&mut self, op: Operator, left: f64, right: f64) -> ResultEngine<f64> {
        let raw = match op {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    tracing::warn!(left, "division by zero rejected");
                    return Err(EngineError::DivideByZero);
                }
                left / right
            }
        };
        let result = round_value(raw);
        if !result.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "{left} {} {right} is out of range",
                op.symbol()
            )));
        }

        if let Ok(kind) = OperationKind::try_from(op) {
            self.ledger.append(kind, right)?;
            if kind == OperationKind::Add {
                self.state.last_added_value = Some(right);
            }
        }

        tracing::debug!(left, op = op.as_str(), right, result, "calculated");
        Ok(result)
    }

    /// Results written back into the buffer must read back as the same
    /// value; in currency mode a buffer without `.` would be taken as cents.
    fn result_entry(&self, value: f64) -> String {
        let text = number_to_entry(value);
        if self.state.display_mode == DisplayMode::Currency && !text.contains('.') {
            format!("{text}.00")
        } else {
            text
        }
    }
}
