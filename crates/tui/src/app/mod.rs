use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use engine::{DisplayMode, EngineError, Key, Session};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    local_state::SnapshotStore,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

/// Inline editor for one ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EditState {
    pub id: Uuid,
    pub input: String,
    /// Set when the last submit did not parse.
    pub invalid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Calculator,
    Edit(EditState),
}

#[derive(Debug)]
pub struct AppState {
    pub session: Session,
    pub mode: Mode,
    /// Highlighted ledger row; `None` follows the newest entry.
    pub selected: Option<usize>,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            mode: Mode::Calculator,
            selected: None,
            toast: None,
        }
    }

    /// Index of the highlighted row, if the ledger has any.
    pub fn selected_index(&self) -> Option<usize> {
        let len = self.session.calculator().ledger().len();
        if len == 0 {
            return None;
        }
        Some(self.selected.map_or(len - 1, |idx| idx.min(len - 1)))
    }

    fn select_prev(&mut self) {
        if let Some(idx) = self.selected_index() {
            self.selected = Some(idx.saturating_sub(1));
        }
    }

    fn select_next(&mut self) {
        let len = self.session.calculator().ledger().len();
        match self.selected_index() {
            Some(idx) if idx + 1 < len => self.selected = Some(idx + 1),
            // Past the last row the highlight goes back to following new entries.
            _ => self.selected = None,
        }
    }

    fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }

    fn report(&mut self, result: std::result::Result<(), EngineError>) {
        if let Err(err) = result {
            self.show_toast(ToastLevel::Error, err.to_string());
        }
    }

    fn press(&mut self, key: Key) {
        let result = self.session.press(key);
        self.report(result);
    }

    /// Apply one keyboard action. Returns `true` when the app should quit.
    pub fn handle_action(&mut self, action: AppAction) -> bool {
        if action == AppAction::Quit {
            return true;
        }
        match self.mode.clone() {
            Mode::Calculator => self.handle_calculator(action),
            Mode::Edit(edit) => self.handle_edit(action, edit),
        }
        false
    }

    fn handle_calculator(&mut self, action: AppAction) {
        match action {
            AppAction::Submit => self.press(Key::Equals),
            AppAction::Cancel => self.press(Key::Clear),
            AppAction::Backspace => self.press(Key::Backspace),
            AppAction::Up => self.select_prev(),
            AppAction::Down => self.select_next(),
            AppAction::Input(ch) => self.handle_calculator_char(ch),
            AppAction::Delete | AppAction::Quit | AppAction::None => {}
        }
    }

    fn handle_calculator_char(&mut self, ch: char) {
        match ch {
            'e' | 'E' => self.begin_edit(),
            'n' | 'N' => self.press(Key::ToggleSign),
            'd' | 'D' => self.press(Key::DoubleZero),
            '$' => self.press(Key::ToggleCurrency),
            'k' | 'K' => self.select_prev(),
            'j' | 'J' => self.select_next(),
            _ => {
                if let Some(key) = Key::from_char(ch) {
                    self.press(key);
                }
            }
        }
    }

    fn begin_edit(&mut self) {
        let Some(idx) = self.selected_index() else {
            self.show_toast(ToastLevel::Info, "Nothing to edit yet");
            return;
        };
        let Some(op) = self.session.calculator().ledger().entries().get(idx) else {
            return;
        };
        self.mode = Mode::Edit(EditState {
            id: op.id,
            input: op.value.to_string(),
            invalid: false,
        });
    }

    fn handle_edit(&mut self, action: AppAction, mut edit: EditState) {
        match action {
            AppAction::Cancel => {
                self.mode = Mode::Calculator;
                return;
            }
            AppAction::Submit => {
                self.submit_edit(edit);
                return;
            }
            AppAction::Delete => {
                self.delete_entry(edit.id);
                return;
            }
            AppAction::Backspace => {
                edit.input.pop();
                edit.invalid = false;
            }
            AppAction::Input(ch) if ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-') => {
                edit.input.push(ch);
                edit.invalid = false;
            }
            _ => {}
        }
        self.mode = Mode::Edit(edit);
    }

    fn submit_edit(&mut self, mut edit: EditState) {
        let Some(value) = parse_amount(&edit.input) else {
            edit.invalid = true;
            self.mode = Mode::Edit(edit);
            return;
        };

        match self.session.edit_entry(edit.id, value) {
            Ok(()) => {
                self.mode = Mode::Calculator;
                self.show_toast(ToastLevel::Success, "Entry updated");
            }
            Err(err @ EngineError::NotFound(_)) => {
                self.mode = Mode::Calculator;
                self.show_toast(ToastLevel::Error, err.to_string());
            }
            Err(err) => {
                edit.invalid = true;
                self.mode = Mode::Edit(edit);
                self.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    fn delete_entry(&mut self, id: Uuid) {
        self.mode = Mode::Calculator;
        match self.session.remove_entry(id) {
            Ok(()) => self.show_toast(ToastLevel::Success, "Entry deleted"),
            Err(err) => self.show_toast(ToastLevel::Error, err.to_string()),
        }
    }
}

/// Parse the edit field: a finite number, `,` accepted as decimal point.
fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub struct App {
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = SnapshotStore::new(&config.snapshot_path);
        let mut session = match store.load()? {
            Some(raw) => {
                tracing::info!("restoring snapshot from {}", store.path().display());
                Session::from_json(&raw)
            }
            None => Session::new(),
        };

        if let Some(currency) = config.currency_mode {
            let mode = if currency {
                DisplayMode::Currency
            } else {
                DisplayMode::Plain
            };
            session.set_display_mode(mode);
        }
        session.subscribe(store);

        Ok(Self {
            state: AppState::new(session),
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
            self.state.expire_toast();
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != event::KeyEventKind::Press {
            return;
        }
        if self.state.handle_action(map_key(key)) {
            self.should_quit = true;
        }
    }
}
