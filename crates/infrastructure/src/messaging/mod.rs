pub mod mqtt_client;
pub mod mqtt_request_source;

pub use mqtt_client::{MqttClient, MqttMessage};
pub use mqtt_request_source::{MqttAcker, MqttPrintRequestSource, MqttReceipt};
