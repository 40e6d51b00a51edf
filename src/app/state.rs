//! App state - pure data structure with no I/O beyond the session store

use crate::messages::ui_events::{FormField, InputMode, Section};
use crate::messages::RenderState;
use crate::models::{Credentials, Notice, PaymentForm, Transaction};
use crate::storage::Storage;

/// Which user action a pending request belongs to.
///
/// Error surfacing differs per action, so the id alone is not enough.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PendingAction {
    Register,
    Login,
    Payment,
    Transactions,
}

/// Main application state - the session/navigation controller's data.
///
/// Holds the bearer token and the visible section, plus the form
/// buffers the user is editing. All mutation happens on the app actor's
/// single control flow.
pub struct AppState {
    // Session
    pub token: Option<String>,

    // Navigation
    pub section: Section,
    pub active_field: FormField,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Forms
    pub register_form: Credentials,
    pub login_form: Credentials,
    pub payment_form: PaymentForm,

    // Transactions
    pub transactions: Vec<Transaction>,
    pub transactions_loaded: bool,
    pub transactions_scroll: u16,

    // Feedback
    pub notice: Option<Notice>,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,
    pub pending_action: Option<PendingAction>,

    // Popups
    pub show_help: bool,

    // Storage (persisted session)
    pub storage: Storage,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_storage(Storage::new())
    }

    /// Build state over an explicit storage (used by tests).
    ///
    /// A persisted token resumes the session on the Payment section,
    /// mirroring the original client's reload behavior.
    pub fn with_storage(storage: Storage) -> Self {
        let token = storage.load_token();
        let section = if token.is_some() {
            Section::Payment
        } else {
            Section::Register
        };

        let mut state = AppState {
            token,
            section,
            active_field: FormField::Email,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            register_form: Credentials::default(),
            login_form: Credentials::default(),
            payment_form: PaymentForm::default(),
            transactions: Vec::new(),
            transactions_loaded: false,
            transactions_scroll: 0,
            notice: None,
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            pending_action: None,
            show_help: false,
            storage,
        };
        state.active_field = state.first_field();
        state
    }

    pub fn logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// First form field of the visible section
    pub fn first_field(&self) -> FormField {
        match self.section {
            Section::Register | Section::Login => FormField::Email,
            Section::Payment => FormField::Amount,
            Section::Transactions => FormField::Email, // no form; unused
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match (self.section, self.active_field) {
            (Section::Register, FormField::Password) => &self.register_form.password,
            (Section::Register, _) => &self.register_form.email,
            (Section::Login, FormField::Password) => &self.login_form.password,
            (Section::Login, _) => &self.login_form.email,
            (Section::Payment, FormField::Currency) => &self.payment_form.currency,
            (Section::Payment, FormField::MerchantId) => &self.payment_form.merchant_id,
            (Section::Payment, _) => &self.payment_form.amount,
            (Section::Transactions, _) => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> &mut String {
        match (self.section, self.active_field) {
            (Section::Register, FormField::Password) => &mut self.register_form.password,
            (Section::Register, _) => &mut self.register_form.email,
            (Section::Login, FormField::Password) => &mut self.login_form.password,
            (Section::Login, _) => &mut self.login_form.email,
            (Section::Payment, FormField::Currency) => &mut self.payment_form.currency,
            (Section::Payment, FormField::MerchantId) => &mut self.payment_form.merchant_id,
            // Transactions has no form; fall back to a harmless buffer
            (_, _) => &mut self.payment_form.amount,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            section: self.section,
            logged_in: self.logged_in(),
            register_form: self.register_form.clone(),
            login_form: self.login_form.clone(),
            payment_form: self.payment_form.clone(),
            active_field: self.active_field,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            transactions: self.transactions.clone(),
            transactions_loaded: self.transactions_loaded,
            transactions_scroll: self.transactions_scroll,
            notice: self.notice.clone(),
            is_loading: self.is_loading,
            show_help: self.show_help,
        }
    }
}
