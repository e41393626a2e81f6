//! Domain layer - Pure badge printing types with no I/O
//!
//! This crate contains:
//! - Value objects (BadgeRecord, PrintRequest, CommandStream, PrinterTag)
//! - Printer connection state and retry policy
//! - Error taxonomy
//! - Seams implemented by infrastructure (transports, request sources)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Rendering inputs and outputs are plain values
//! - Testable in isolation

pub mod badge;
pub mod command_stream;
pub mod error;
pub mod printer;
pub mod source;

// Re-export commonly used types
pub use badge::{BadgeRecord, PrintRequest};
pub use command_stream::CommandStream;
pub use error::DomainError;
pub use printer::{PrinterError, PrinterTag};
