//! # Teller TUI
//!
//! A terminal client for the teller payments API.
//!
//! ## Features
//! - Account registration and login
//! - Bearer-token sessions persisted across restarts
//! - Payment submission with idempotency keys
//! - Transaction history browsing
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod models;
pub mod storage;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Credentials, Notice, PaymentForm, PaymentRequest, Transaction};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use messages::ui_events::Section;
pub use app::{AppActor, AppState};
pub use network::{ApiClient, NetworkActor};
pub use storage::Storage;
