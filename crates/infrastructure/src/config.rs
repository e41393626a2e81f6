use config::{Config, ConfigError, Environment, File};
use domain::printer::{DEFAULT_PRINTER_PORT, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::printer::NetworkPrinterConnector;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    /// Defaults to `badges/print/{agent_id}`
    pub request_topic: Option<String>,
    /// Defaults to `badges/status/{agent_id}`
    pub status_topic: Option<String>,
    /// Failed deliveries left unacked at once. Keep below the broker's
    /// inflight limit.
    #[serde(default = "default_max_held")]
    pub max_held: usize,
}

fn default_max_held() -> usize {
    10
}

/// Socket settings shared by every printer.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrinterSettings {
    #[serde(default = "default_printer_port")]
    pub port: u16,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
    #[serde(default = "default_write_retries")]
    pub write_retries: u32,
}

fn default_printer_port() -> u16 {
    DEFAULT_PRINTER_PORT
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_write_timeout() -> u64 {
    30
}
fn default_write_retries() -> u32 {
    1
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            port: default_printer_port(),
            connect_timeout_secs: default_connect_timeout(),
            write_timeout_secs: default_write_timeout(),
            write_retries: default_write_retries(),
        }
    }
}

impl PrinterSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.write_retries)
    }

    pub fn connector(&self) -> NetworkPrinterConnector {
        NetworkPrinterConnector::new(
            self.port,
            Duration::from_secs(self.connect_timeout_secs),
            Duration::from_secs(self.write_timeout_secs),
        )
    }
}

/// One printer to register at startup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PrinterEntry {
    /// Registry tag. Any non-blank text up to 64 characters; ids loaded from
    /// a config file may contain spaces, `,` or `:`, ids from the
    /// `id:ip,...` command-line list cannot.
    pub id: String,
    /// Host name or IP address
    pub ip: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentConfig {
    pub agent_id: String,
    /// Prefix of the QR code payload
    #[serde(default)]
    pub base_url: Option<String>,
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub printer: PrinterSettings,
    #[serde(default)]
    pub printers: Vec<PrinterEntry>,
}

impl AgentConfig {
    /// Load defaults, then `config_file` (if given), then `BADGE__*` environment variables.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("agent_id", "badge-agent")?
            .set_default("mqtt.host", "localhost")?
            .set_default("mqtt.port", 1883)?;

        if let Some(path) = config_file {
            // An explicitly requested file must exist
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder
            // Environment variables (e.g. BADGE__MQTT__HOST=10.0.0.1)
            .add_source(Environment::with_prefix("BADGE").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn request_topic(&self) -> String {
        self.mqtt
            .request_topic
            .clone()
            .unwrap_or_else(|| format!("badges/print/{}", self.agent_id))
    }

    pub fn status_topic(&self) -> String {
        self.mqtt
            .status_topic
            .clone()
            .unwrap_or_else(|| format!("badges/status/{}", self.agent_id))
    }
}

/// Parse a `tag:ip,tag:ip` printer list as given on the command line.
pub fn parse_printer_list(list: &str) -> Result<Vec<PrinterEntry>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|def| !def.is_empty())
        .map(|def| match def.split(':').collect::<Vec<_>>().as_slice() {
            [id, ip] if !id.is_empty() && !ip.is_empty() => Ok(PrinterEntry {
                id: id.to_string(),
                ip: ip.to_string(),
            }),
            _ => Err(ConfigError::Message(format!(
                "Invalid printer definition: {}. Expected format: 'id:ip'",
                def
            ))),
        })
        .collect()
}
