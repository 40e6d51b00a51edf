//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{FormField, InputMode, Section};
use crate::models::{Credentials, Notice, PaymentForm, Transaction};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Navigation
    pub section: Section,
    pub logged_in: bool,

    // Forms
    pub register_form: Credentials,
    pub login_form: Credentials,
    pub payment_form: PaymentForm,
    pub active_field: FormField,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Transactions
    pub transactions: Vec<Transaction>,
    pub transactions_loaded: bool,
    pub transactions_scroll: u16,

    // Feedback
    pub notice: Option<Notice>,
    pub is_loading: bool,

    // Popups
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            section: Section::Register,
            logged_in: false,
            register_form: Credentials::default(),
            login_form: Credentials::default(),
            payment_form: PaymentForm::default(),
            active_field: FormField::Email,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            transactions: Vec::new(),
            transactions_loaded: false,
            transactions_scroll: 0,
            notice: None,
            is_loading: false,
            show_help: false,
        }
    }
}
