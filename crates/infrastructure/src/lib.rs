//! Infrastructure layer - Printer sockets, MQTT and configuration

pub mod config;
pub mod messaging;
pub mod printer;

pub use messaging::{MqttClient, MqttMessage, MqttPrintRequestSource};
pub use printer::{MockPrinter, MockPrinterConnector, NetworkPrinter, NetworkPrinterConnector};
