//! A calculator session: the single entry point a front end talks to.
//!
//! The session owns the [`Calculator`] and a list of [`Observer`]s. Every
//! input runs to completion, then each observer is told whether the change
//! went through and whether the ledger moved, so renderers and persistence
//! can react without reaching into global state.

use core::fmt;

use uuid::Uuid;

use crate::{Calculator, DisplayMode, EngineError, Operator, ResultEngine, Snapshot};

/// A keypad key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    DoubleZero,
    Decimal,
    Operator(Operator),
    Equals,
    /// The context-sensitive `AC`/`C` key.
    Clear,
    AllClear,
    ClearEntry,
    ToggleSign,
    Percent,
    Backspace,
    ToggleCurrency,
}

impl Key {
    /// Keyboard shortcut for a typed character, if there is one.
    pub fn from_char(ch: char) -> Option<Self> {
        let key = match ch {
            '0'..='9' => Self::Digit(ch),
            '+' => Self::Operator(Operator::Add),
            '-' => Self::Operator(Operator::Subtract),
            '*' | 'x' | '×' => Self::Operator(Operator::Multiply),
            '/' | '÷' => Self::Operator(Operator::Divide),
            '=' => Self::Equals,
            '.' | ',' => Self::Decimal,
            '%' => Self::Percent,
            _ => return None,
        };
        Some(key)
    }
}

/// What happened after an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent<'a> {
    Changed { ledger_changed: bool },
    Rejected(&'a EngineError),
}

/// Receives every session event together with the post-event calculator.
pub trait Observer {
    fn notify(&mut self, event: &SessionEvent<'_>, calculator: &Calculator);
}

impl<F> Observer for F
where
    F: FnMut(&SessionEvent<'_>, &Calculator),
{
    fn notify(&mut self, event: &SessionEvent<'_>, calculator: &Calculator) {
        self(event, calculator)
    }
}

#[derive(Default)]
pub struct Session {
    calculator: Calculator,
    observers: Vec<Box<dyn Observer>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("calculator", &self.calculator)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(snapshot: Snapshot) -> Self {
        Self {
            calculator: Calculator::from(snapshot),
            observers: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Self {
        Self::restore(Snapshot::from_json(raw))
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.calculator)
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        self.snapshot().to_json()
    }

    pub fn press(&mut self, key: Key) -> ResultEngine<()> {
        self.apply(|calc| match key {
            Key::Digit(digit) => calc.input_digit(digit),
            Key::DoubleZero => {
                calc.input_double_zero();
                Ok(())
            }
            Key::Decimal => {
                calc.input_decimal_point();
                Ok(())
            }
            Key::Operator(op) => calc.set_operator(op),
            Key::Equals => calc.equals(),
            Key::Clear => {
                calc.press_clear();
                Ok(())
            }
            Key::AllClear => {
                calc.clear(true);
                Ok(())
            }
            Key::ClearEntry => {
                calc.clear(false);
                Ok(())
            }
            Key::ToggleSign => {
                calc.toggle_sign();
                Ok(())
            }
            Key::Percent => {
                calc.input_percent();
                Ok(())
            }
            Key::Backspace => {
                calc.backspace();
                Ok(())
            }
            Key::ToggleCurrency => {
                calc.toggle_display_mode();
                Ok(())
            }
        })
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.calculator.set_display_mode(mode);
        self.notify(&SessionEvent::Changed {
            ledger_changed: false,
        });
    }

    pub fn edit_entry(&mut self, id: Uuid, value: f64) -> ResultEngine<()> {
        self.apply(|calc| calc.edit_entry(id, value))
    }

    pub fn remove_entry(&mut self, id: Uuid) -> ResultEngine<()> {
        self.apply(|calc| calc.remove_entry(id).map(|_| ()))
    }

    fn apply(
        &mut self,
        action: impl FnOnce(&mut Calculator) -> ResultEngine<()>,
    ) -> ResultEngine<()> {
        let revision = self.calculator.ledger().revision();
        let result = action(&mut self.calculator);

        let event = match &result {
            Ok(()) => SessionEvent::Changed {
                ledger_changed: self.calculator.ledger().revision() != revision,
            },
            Err(err) => {
                tracing::warn!("input rejected: {err}");
                SessionEvent::Rejected(err)
            }
        };
        self.notify(&event);

        result
    }

    fn notify(&mut self, event: &SessionEvent<'_>) {
        for observer in &mut self.observers {
            observer.notify(event, &self.calculator);
        }
    }
}
