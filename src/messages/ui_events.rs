//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The mutually-exclusive views of the client.
///
/// Exactly one section is visible at a time.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Section {
    #[default]
    Register,
    Login,
    Payment,
    Transactions,
}

impl Section {
    /// Payment and Transactions are only reachable with a session token
    pub fn requires_auth(&self) -> bool {
        matches!(self, Section::Payment | Section::Transactions)
    }
}

/// Form field within the visible section
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum FormField {
    #[default]
    Email,
    Password,
    Amount,
    Currency,
    MerchantId,
}

impl FormField {
    pub fn label(&self) -> &str {
        match self {
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::Amount => "Amount",
            FormField::Currency => "Currency",
            FormField::MerchantId => "Merchant ID",
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Section navigation
    ShowSection(Section),

    // Form navigation and editing
    NextField,
    PrevField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Actions
    Submit,
    ReloadTransactions,
    Logout,

    // Transactions list
    ScrollUp,
    ScrollDown,

    // Popups
    ToggleHelp,
    CloseHelp,

    // Clock tick from the UI loop, drives notice expiry
    Tick,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    section: Section,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_mode_key(key, section),
        InputMode::Editing => editing_mode_key(key),
    }
}

/// Handle keys in normal (navigation) mode
fn normal_mode_key(key: KeyEvent, section: Section) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => Some(UiEvent::ShowSection(Section::Register)),
        KeyCode::Char('2') => Some(UiEvent::ShowSection(Section::Login)),
        KeyCode::Char('3') => Some(UiEvent::ShowSection(Section::Payment)),
        KeyCode::Char('4') => Some(UiEvent::ShowSection(Section::Transactions)),
        KeyCode::Char('l') => Some(UiEvent::Logout),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::BackTab => Some(UiEvent::PrevField),
        KeyCode::Char('e') | KeyCode::Enter if section != Section::Transactions => {
            Some(UiEvent::StartEditing)
        }
        KeyCode::Char('s') if section != Section::Transactions => Some(UiEvent::Submit),
        KeyCode::Char('r') | KeyCode::Enter if section == Section::Transactions => {
            Some(UiEvent::ReloadTransactions)
        }
        KeyCode::Up => Some(UiEvent::ScrollUp),
        KeyCode::Down => Some(UiEvent::ScrollDown),
        _ => None,
    }
}

/// Handle keys while editing a form field
fn editing_mode_key(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
