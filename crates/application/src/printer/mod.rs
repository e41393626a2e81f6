pub mod connection;
pub mod registry;
pub mod service;

pub use connection::PrinterConnection;
pub use registry::PrinterRegistry;
pub use service::{PrintOutcome, PrintService, PrintStats};
