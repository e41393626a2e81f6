mod connection_state;
mod error;
mod printer_tag;
mod retry_policy;
mod transport;

pub use connection_state::ConnectionState;
pub use error::PrinterError;
pub use printer_tag::PrinterTag;
pub use retry_policy::RetryPolicy;
pub use transport::{PrinterConnector, PrinterTransport};

/// Raw printing port (JetDirect).
pub const DEFAULT_PRINTER_PORT: u16 = 9100;
