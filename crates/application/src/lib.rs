//! Application layer - Badge rendering and printer dispatch

pub mod label;
pub mod messaging;
pub mod printer;

pub use label::BadgeLabelGenerator;
pub use messaging::PrintListener;
pub use printer::{PrintService, PrinterConnection, PrinterRegistry};
