//! Network actor - runs backend requests in the Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Network actor that processes backend commands
pub struct NetworkActor {
    api: Arc<ApiClient>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(api: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api: Arc::new(api),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Register { id, credentials }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, email = %credentials.email, "Registering");
                                let result = api.register(id, &credentials).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Login { id, credentials }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, email = %credentials.email, "Logging in");
                                let result = api.login(id, &credentials).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::SubmitPayment { id, payment, token }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(
                                    id,
                                    merchant = %payment.merchant_id,
                                    key = %payment.idempotency_key,
                                    "Submitting payment"
                                );
                                let result = api.submit_payment(id, &payment, &token).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::FetchTransactions { id, token }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, "Fetching transactions");
                                let result = api.fetch_transactions(id, &token).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => break,

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    // Task completed - nothing to do
                }
            }
        }
    }
}
