pub mod mock_printer;
pub mod network_printer;

pub use mock_printer::{MockPrinter, MockPrinterConnector};
pub use network_printer::{NetworkPrinter, NetworkPrinterConnector};
