use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::constants::NOTICE_TTL;

/// Email/password pair submitted to /register and /login
#[derive(Clone, Debug, Default, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payment form as edited in the UI - raw string buffers, parsed on submit
#[derive(Clone, Debug, Default)]
pub struct PaymentForm {
    pub amount: String,
    pub currency: String,
    pub merchant_id: String,
}

impl PaymentForm {
    pub fn clear(&mut self) {
        self.amount.clear();
        self.currency.clear();
        self.merchant_id.clear();
    }
}

/// Wire body for POST /payment
#[derive(Clone, Debug, Serialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: String,
    pub merchant_id: String,
    pub idempotency_key: String,
}

/// A settled transaction as returned by the backend.
///
/// The client never constructs these - it only renders what the server
/// sends. `created_at` is a naive UTC timestamp (the backend serializes
/// datetimes without an offset).
#[derive(Clone, Debug, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub currency: String,
    pub merchant_id: String,
    pub created_at: NaiveDateTime,
}

/// Response body of GET /transactions
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
}

/// Success body of POST /login
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Severity of a notice
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient one-shot notification.
///
/// Overwritten by any later notice; dropped once `NOTICE_TTL` has
/// elapsed since it was shown.
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            text: text.into(),
            kind: NoticeKind::Success,
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            shown_at: Instant::now(),
        }
    }

    /// Whether this notice has outlived its display window
    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTICE_TTL
    }
}
