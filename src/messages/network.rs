//! Network messages - communication between App and Network layers

use crate::models::{Credentials, PaymentRequest, Transaction};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Submit credentials to POST /register
    Register { id: u64, credentials: Credentials },
    /// Submit credentials to POST /login
    Login { id: u64, credentials: Credentials },
    /// Submit a payment to POST /payment with the bearer token
    SubmitPayment {
        id: u64,
        payment: PaymentRequest,
        token: String,
    },
    /// Fetch the transaction list with the bearer token
    FetchTransactions { id: u64, token: String },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Registration accepted by the server
    Registered { id: u64 },
    /// Login accepted; carries the session token
    LoggedIn { id: u64, token: String },
    /// Payment accepted by the server
    PaymentAccepted { id: u64 },
    /// Transaction list fetched
    Transactions {
        id: u64,
        transactions: Vec<Transaction>,
    },
    /// Request rejected by the server with a structured message,
    /// surfaced to the user verbatim
    ApiError { id: u64, message: String },
    /// Transport-level failure, surfaced as a generic error
    NetworkError { id: u64, message: String },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Registered { id } => *id,
            NetworkResponse::LoggedIn { id, .. } => *id,
            NetworkResponse::PaymentAccepted { id } => *id,
            NetworkResponse::Transactions { id, .. } => *id,
            NetworkResponse::ApiError { id, .. } => *id,
            NetworkResponse::NetworkError { id, .. } => *id,
        }
    }
}
