use async_trait::async_trait;

use super::error::PrinterError;

/// One socket-level link to a printer.
///
/// Implementations own at most one live socket. Reconnect policy lives above
/// this trait, in the application layer.
#[async_trait]
pub trait PrinterTransport: Send + Sync {
    /// Attempt to establish a connection to the printer
    async fn connect(&mut self) -> Result<(), PrinterError>;

    /// Close the connection. Calling it while disconnected is a no-op.
    async fn disconnect(&mut self) -> Result<(), PrinterError>;

    /// Check if the connection is currently active
    async fn is_connected(&self) -> bool;

    /// Send raw bytes (ZPL commands) to the printer
    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError>;
}

/// Builds an unconnected transport for a printer address.
pub trait PrinterConnector: Send + Sync {
    fn create(&self, address: &str) -> Box<dyn PrinterTransport>;
}
