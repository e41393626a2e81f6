use domain::CommandStream;
use domain::printer::{ConnectionState, PrinterError, PrinterTransport, RetryPolicy};
use tracing::{error, info, warn};

/// Step of the write recovery machine.
enum WritePhase {
    /// Issue the write on the current socket
    Send,
    /// Drop the stale socket and open a replacement
    Recover { cause: PrinterError },
}

/// One printer endpoint with a write-then-reconnect-then-retry policy.
pub struct PrinterConnection {
    address: String,
    transport: Box<dyn PrinterTransport>,
    state: ConnectionState,
    policy: RetryPolicy,
    reconnects: u64,
}

impl PrinterConnection {
    /// Connect `transport` and wrap it. Fails with `ConnectionFailed` if the
    /// first socket cannot be opened.
    pub async fn open(
        address: impl Into<String>,
        mut transport: Box<dyn PrinterTransport>,
        policy: RetryPolicy,
    ) -> Result<Self, PrinterError> {
        let address = address.into();
        info!(address = %address, "🔌 Opening printer connection");
        transport.connect().await?;

        Ok(Self {
            address,
            transport,
            state: ConnectionState::Connected,
            policy,
            reconnects: 0,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Successful mid-write reconnects over the lifetime of this connection.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects
    }

    /// Send `stream`, spending at most `policy.max_retries()` recovery cycles.
    ///
    /// Every failure that ends the call is reported as `WriteFailed`.
    pub async fn write(&mut self, stream: &CommandStream) -> Result<(), PrinterError> {
        let mut retries_left = self.policy.max_retries();
        let mut phase = WritePhase::Send;

        loop {
            phase = match phase {
                WritePhase::Send => match self.transport.send_commands(stream.as_bytes()).await {
                    Ok(()) => {
                        self.state = ConnectionState::Connected;
                        return Ok(());
                    }
                    Err(e) if retries_left == 0 => {
                        self.refresh_state().await;
                        error!(address = %self.address, error = %e, "❌ Write failed, giving up");
                        return Err(PrinterError::WriteFailed(format!(
                            "failed to send data to printer {}: {}",
                            self.address, e
                        )));
                    }
                    Err(e) => {
                        retries_left -= 1;
                        WritePhase::Recover { cause: e }
                    }
                },
                WritePhase::Recover { cause } => {
                    warn!(address = %self.address, error = %cause, "⚠️ Write failed. Reconnecting...");
                    self.state = self
                        .state
                        .to_reconnecting()
                        .unwrap_or(ConnectionState::Reconnecting);
                    let _ = self.transport.disconnect().await;

                    match self.transport.connect().await {
                        Ok(()) => {
                            self.reconnects += 1;
                            self.state = self
                                .state
                                .to_connected()
                                .unwrap_or(ConnectionState::Connected);
                            info!(address = %self.address, "✅ Printer reconnected, retrying write");
                            WritePhase::Send
                        }
                        Err(e) => {
                            self.state = ConnectionState::Disconnected;
                            error!(address = %self.address, error = %e, "❌ Reconnect failed");
                            return Err(PrinterError::WriteFailed(format!(
                                "write to {} failed ({}) and reconnect failed: {}",
                                self.address, cause, e
                            )));
                        }
                    }
                }
            };
        }
    }

    /// Release the socket. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Err(e) = self.transport.disconnect().await {
            warn!(address = %self.address, error = %e, "Error while closing printer socket");
        }
        if self.state != ConnectionState::Disconnected {
            info!(address = %self.address, "🔌 Printer connection closed");
        }
        self.state = self.state.to_disconnected();
    }

    async fn refresh_state(&mut self) {
        self.state = if self.transport.is_connected().await {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
    }
}

impl std::fmt::Debug for PrinterConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterConnection")
            .field("address", &self.address)
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("reconnects", &self.reconnects)
            .finish()
    }
}
