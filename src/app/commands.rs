//! Command handlers - business logic for processing UI events

use uuid::Uuid;

use crate::app::state::PendingAction;
use crate::app::AppState;
use crate::messages::ui_events::{FormField, InputMode, Section};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Notice, PaymentRequest};

impl AppState {
    // ========================
    // Section navigation
    // ========================

    /// Switch the visible section.
    ///
    /// Exactly one section is active at a time. Sections gate on the
    /// session: Payment/Transactions need a token, Register/Login are
    /// only offered while logged out. Selecting Transactions always
    /// kicks off a fresh list fetch.
    pub fn show_section(&mut self, section: Section) -> Option<NetworkCommand> {
        if section.requires_auth() != self.logged_in() {
            return None;
        }

        self.section = section;
        self.input_mode = InputMode::Normal;
        self.active_field = self.first_field();
        self.cursor_position = self.current_input().len();

        if section == Section::Transactions {
            self.fetch_transactions()
        } else {
            None
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = match (self.section, self.active_field) {
            (Section::Register | Section::Login, FormField::Email) => FormField::Password,
            (Section::Register | Section::Login, _) => FormField::Email,
            (Section::Payment, FormField::Amount) => FormField::Currency,
            (Section::Payment, FormField::Currency) => FormField::MerchantId,
            (Section::Payment, _) => FormField::Amount,
            (Section::Transactions, field) => field,
        };
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_field(&mut self) {
        self.active_field = match (self.section, self.active_field) {
            (Section::Register | Section::Login, FormField::Email) => FormField::Password,
            (Section::Register | Section::Login, _) => FormField::Email,
            (Section::Payment, FormField::Amount) => FormField::MerchantId,
            (Section::Payment, FormField::MerchantId) => FormField::Currency,
            (Section::Payment, _) => FormField::Amount,
            (Section::Transactions, field) => field,
        };
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.section == Section::Transactions {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.section == Section::Transactions {
            return;
        }
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.section == Section::Transactions {
            return;
        }
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let input = self.current_input_mut();
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Transactions list scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.transactions_scroll = self.transactions_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.transactions_scroll = self.transactions_scroll.saturating_add(1);
    }

    // ========================
    // Notices
    // ========================

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::success(text));
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::error(text));
    }

    /// Clock tick from the UI loop; drops an expired notice
    pub fn tick(&mut self) {
        if self.notice.as_ref().map_or(false, |n| n.expired()) {
            self.notice = None;
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Submitting
    // ========================

    /// Submit the visible section's form
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match self.section {
            Section::Register => self.submit_register(),
            Section::Login => self.submit_login(),
            Section::Payment => self.submit_payment(),
            Section::Transactions => None,
        }
    }

    fn submit_register(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }

        let id = self.begin_request(PendingAction::Register);
        Some(NetworkCommand::Register {
            id,
            credentials: self.register_form.clone(),
        })
    }

    fn submit_login(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }

        let id = self.begin_request(PendingAction::Login);
        Some(NetworkCommand::Login {
            id,
            credentials: self.login_form.clone(),
        })
    }

    /// Submit the payment form.
    ///
    /// Every attempt carries a fresh idempotency key so the server can
    /// deduplicate retries of the same submission chain independently.
    fn submit_payment(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }
        let token = self.token.clone()?;

        let amount = match self.payment_form.amount.trim().parse::<f64>() {
            Ok(amount) => amount,
            Err(_) => {
                self.notify_error("Invalid amount");
                return None;
            }
        };

        let payment = PaymentRequest {
            amount,
            currency: self.payment_form.currency.clone(),
            merchant_id: self.payment_form.merchant_id.clone(),
            idempotency_key: Uuid::new_v4().to_string(),
        };

        let id = self.begin_request(PendingAction::Payment);
        Some(NetworkCommand::SubmitPayment { id, payment, token })
    }

    /// Re-fetch the transaction list for the current session.
    ///
    /// Always issues a new request; a previous in-flight fetch is
    /// superseded by id and its late response dropped.
    pub fn fetch_transactions(&mut self) -> Option<NetworkCommand> {
        let token = self.token.clone()?;

        let id = self.begin_request(PendingAction::Transactions);
        Some(NetworkCommand::FetchTransactions { id, token })
    }

    fn begin_request(&mut self, action: PendingAction) -> u64 {
        let id = self.next_id();
        self.is_loading = true;
        self.pending_request_id = Some(id);
        self.pending_action = Some(action);
        id
    }

    // ========================
    // Logout
    // ========================

    pub fn logout(&mut self) {
        if !self.logged_in() {
            return;
        }

        let _ = self.storage.clear_token();
        self.token = None;
        self.transactions.clear();
        self.transactions_loaded = false;
        self.section = Section::Register;
        self.input_mode = InputMode::Normal;
        self.active_field = self.first_field();
        self.cursor_position = self.current_input().len();
        self.notify_success("Logged out successfully");
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        // Only process the response to the pending request; anything
        // else is a superseded fetch arriving late.
        if self.pending_request_id != Some(response.id()) {
            return;
        }

        match response {
            NetworkResponse::Registered { .. } => {
                self.notify_success("Registration successful! Please login.");
                self.section = Section::Login;
                self.active_field = self.first_field();
                self.cursor_position = self.current_input().len();
            }
            NetworkResponse::LoggedIn { token, .. } => {
                let _ = self.storage.save_token(&token);
                self.token = Some(token);
                self.notify_success("Login successful!");
                self.section = Section::Payment;
                self.active_field = self.first_field();
                self.cursor_position = self.current_input().len();
            }
            NetworkResponse::PaymentAccepted { .. } => {
                self.payment_form.clear();
                self.active_field = self.first_field();
                self.cursor_position = 0;
                self.notify_success("Payment successful!");
            }
            NetworkResponse::Transactions { transactions, .. } => {
                self.transactions = transactions;
                self.transactions_loaded = true;
                self.transactions_scroll = 0;
            }
            NetworkResponse::ApiError { message, .. } => {
                // The server message is surfaced verbatim, except the
                // transaction list which only gets a generic line
                if self.pending_action == Some(PendingAction::Transactions) {
                    self.notify_error("Failed to load transactions");
                } else {
                    self.notify_error(message);
                }
            }
            NetworkResponse::NetworkError { message, .. } => {
                self.notify_error(message);
            }
        }

        self.finalize_request();
    }

    /// Reset per-request bookkeeping once a response has been consumed
    fn finalize_request(&mut self) {
        self.is_loading = false;
        self.pending_request_id = None;
        self.pending_action = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOTICE_TTL;
    use crate::models::NoticeKind;
    use crate::storage::Storage;
    use std::time::Instant;
    use tempfile::TempDir;

    fn logged_out_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_storage(Storage::with_dir(dir.path().to_path_buf()));
        (state, dir)
    }

    fn logged_in_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        storage.save_token("tok123").unwrap();
        let state = AppState::with_storage(Storage::with_dir(dir.path().to_path_buf()));
        (state, dir)
    }

    #[test]
    fn test_login_stores_token_and_navigates() {
        let (mut state, dir) = logged_out_state();
        state.section = Section::Login;
        state.login_form.email = "a@b.com".to_string();
        state.login_form.password = "x".to_string();

        let cmd = state.submit().expect("login command");
        let id = match cmd {
            NetworkCommand::Login { id, credentials } => {
                assert_eq!(credentials.email, "a@b.com");
                assert_eq!(credentials.password, "x");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };
        assert!(state.is_loading);

        state.handle_response(NetworkResponse::LoggedIn {
            id,
            token: "tok123".to_string(),
        });

        assert_eq!(state.token.as_deref(), Some("tok123"));
        assert_eq!(state.section, Section::Payment);
        assert!(!state.is_loading);
        let notice = state.notice.as_ref().expect("notice");
        assert_eq!(notice.text, "Login successful!");
        assert_eq!(notice.kind, NoticeKind::Success);

        // Token persists across a simulated reload
        let reloaded = AppState::with_storage(Storage::with_dir(dir.path().to_path_buf()));
        assert_eq!(reloaded.token.as_deref(), Some("tok123"));
        assert_eq!(reloaded.section, Section::Payment);
    }

    #[test]
    fn test_register_success_navigates_to_login() {
        let (mut state, _dir) = logged_out_state();
        state.register_form.email = "a@b.com".to_string();
        state.register_form.password = "x".to_string();

        let cmd = state.submit().expect("register command");
        let id = match cmd {
            NetworkCommand::Register { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::Registered { id });

        assert_eq!(state.section, Section::Login);
        assert_eq!(
            state.notice.as_ref().map(|n| n.text.as_str()),
            Some("Registration successful! Please login.")
        );
    }

    #[test]
    fn test_register_error_surfaces_detail_verbatim() {
        let (mut state, _dir) = logged_out_state();
        let cmd = state.submit().expect("register command");
        let id = match cmd {
            NetworkCommand::Register { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::ApiError {
            id,
            message: "Email already registered".to_string(),
        });

        let notice = state.notice.as_ref().expect("notice");
        assert_eq!(notice.text, "Email already registered");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(state.section, Section::Register);
    }

    #[test]
    fn test_logout_clears_token_and_shows_register() {
        let (mut state, dir) = logged_in_state();
        state.logout();

        assert_eq!(state.token, None);
        assert_eq!(state.section, Section::Register);
        assert_eq!(
            state.notice.as_ref().map(|n| n.text.as_str()),
            Some("Logged out successfully")
        );

        // The session file is gone too
        let storage = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(storage.load_token(), None);
    }

    #[test]
    fn test_transactions_section_issues_one_fetch() {
        let (mut state, _dir) = logged_in_state();

        let cmd = state.show_section(Section::Transactions);
        match cmd {
            Some(NetworkCommand::FetchTransactions { token, .. }) => {
                assert_eq!(token, "tok123");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(state.section, Section::Transactions);

        // Other sections never trigger a fetch
        assert!(state.show_section(Section::Payment).is_none());
    }

    #[test]
    fn test_empty_transaction_list_marks_loaded() {
        let (mut state, _dir) = logged_in_state();
        let cmd = state.show_section(Section::Transactions).unwrap();
        let id = match cmd {
            NetworkCommand::FetchTransactions { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::Transactions {
            id,
            transactions: Vec::new(),
        });

        assert!(state.transactions_loaded);
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn test_transactions_error_is_generic() {
        let (mut state, _dir) = logged_in_state();
        let cmd = state.show_section(Section::Transactions).unwrap();
        let id = match cmd {
            NetworkCommand::FetchTransactions { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::ApiError {
            id,
            message: "Invalid token".to_string(),
        });

        assert_eq!(
            state.notice.as_ref().map(|n| n.text.as_str()),
            Some("Failed to load transactions")
        );
    }

    #[test]
    fn test_failed_payment_keeps_form() {
        let (mut state, _dir) = logged_in_state();
        state.payment_form.amount = "12.50".to_string();
        state.payment_form.currency = "USD".to_string();
        state.payment_form.merchant_id = "m-1".to_string();

        let cmd = state.submit().expect("payment command");
        let id = match cmd {
            NetworkCommand::SubmitPayment { id, payment, token } => {
                assert_eq!(payment.amount, 12.5);
                assert_eq!(token, "tok123");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::ApiError {
            id,
            message: "Duplicate payment detected".to_string(),
        });

        // Only success clears the form
        assert_eq!(state.payment_form.amount, "12.50");
        assert_eq!(state.payment_form.currency, "USD");
        assert_eq!(state.payment_form.merchant_id, "m-1");
    }

    #[test]
    fn test_successful_payment_clears_form() {
        let (mut state, _dir) = logged_in_state();
        state.payment_form.amount = "12.50".to_string();
        state.payment_form.currency = "USD".to_string();
        state.payment_form.merchant_id = "m-1".to_string();

        let cmd = state.submit().expect("payment command");
        let id = match cmd {
            NetworkCommand::SubmitPayment { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::PaymentAccepted { id });

        assert!(state.payment_form.amount.is_empty());
        assert!(state.payment_form.currency.is_empty());
        assert!(state.payment_form.merchant_id.is_empty());
        assert_eq!(
            state.notice.as_ref().map(|n| n.text.as_str()),
            Some("Payment successful!")
        );
    }

    #[test]
    fn test_consecutive_payments_get_distinct_keys() {
        let (mut state, _dir) = logged_in_state();
        state.payment_form.amount = "5".to_string();
        state.payment_form.currency = "EUR".to_string();
        state.payment_form.merchant_id = "m-2".to_string();

        let first = state.submit().expect("payment command");
        let (id, key1) = match first {
            NetworkCommand::SubmitPayment { id, payment, .. } => (id, payment.idempotency_key),
            other => panic!("unexpected command: {:?}", other),
        };
        state.handle_response(NetworkResponse::PaymentAccepted { id });

        state.payment_form.amount = "5".to_string();
        state.payment_form.currency = "EUR".to_string();
        state.payment_form.merchant_id = "m-2".to_string();
        let second = state.submit().expect("payment command");
        let key2 = match second {
            NetworkCommand::SubmitPayment { payment, .. } => payment.idempotency_key,
            other => panic!("unexpected command: {:?}", other),
        };

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_invalid_amount_rejected_client_side() {
        let (mut state, _dir) = logged_in_state();
        state.payment_form.amount = "twelve".to_string();

        assert!(state.submit().is_none());
        assert!(!state.is_loading);
        assert_eq!(
            state.notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::Error)
        );
    }

    #[test]
    fn test_submit_ignored_while_loading() {
        let (mut state, _dir) = logged_out_state();
        assert!(state.submit().is_some());
        // Second submit while the first is in flight does nothing
        assert!(state.submit().is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let (mut state, _dir) = logged_in_state();
        let cmd = state.show_section(Section::Transactions).unwrap();
        let id = match cmd {
            NetworkCommand::FetchTransactions { id, .. } => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::LoggedIn {
            id: id + 100,
            token: "other".to_string(),
        });

        // Still waiting on the real response
        assert!(state.is_loading);
        assert_eq!(state.token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_auth_gated_sections() {
        let (mut state, _dir) = logged_out_state();
        assert!(state.show_section(Section::Payment).is_none());
        assert!(state.show_section(Section::Transactions).is_none());
        assert_eq!(state.section, Section::Register);

        let (mut state, _dir) = logged_in_state();
        assert!(state.show_section(Section::Register).is_none());
        assert!(state.show_section(Section::Login).is_none());
        assert_eq!(state.section, Section::Payment);
    }

    #[test]
    fn test_notice_expires_on_tick() {
        let (mut state, _dir) = logged_out_state();
        state.notify_success("done");
        state.tick();
        assert!(state.notice.is_some());

        if let Some(notice) = state.notice.as_mut() {
            notice.shown_at = Instant::now() - NOTICE_TTL;
        }
        state.tick();
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_later_notice_overwrites_earlier() {
        let (mut state, _dir) = logged_out_state();
        state.notify_success("first");
        state.notify_error("second");
        let notice = state.notice.as_ref().expect("notice");
        assert_eq!(notice.text, "second");
        assert_eq!(notice.kind, NoticeKind::Error);
    }
}
