use infrastructure::config::{AgentConfig, PrinterEntry};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

fn write_config(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("badge_agent_{}.yaml", Uuid::new_v4()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_yaml_file() {
    let path = write_config(
        r#"
agent_id: lobby
base_url: "https://badges.example.com/"
mqtt:
  host: broker.local
  port: 8883
  max_held: 5
printer:
  write_retries: 2
printers:
  - id: P1
    ip: 192.168.1.100
  - id: P2
    ip: 192.168.1.101
"#,
    );

    let config = AgentConfig::load(path.to_str()).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.agent_id, "lobby");
    assert_eq!(config.base_url.as_deref(), Some("https://badges.example.com/"));
    assert_eq!(config.mqtt.host, "broker.local");
    assert_eq!(config.mqtt.port, 8883);
    assert_eq!(config.mqtt.max_held, 5);
    assert_eq!(config.printer.write_retries, 2);
    assert_eq!(config.printer.port, 9100);
    assert_eq!(config.printer.connect_timeout_secs, 10);
    assert_eq!(
        config.printers,
        vec![
            PrinterEntry {
                id: "P1".into(),
                ip: "192.168.1.100".into()
            },
            PrinterEntry {
                id: "P2".into(),
                ip: "192.168.1.101".into()
            },
        ]
    );
    assert_eq!(config.request_topic(), "badges/print/lobby");
    assert_eq!(config.status_topic(), "badges/status/lobby");
}

#[test]
fn test_explicit_topics_win_over_defaults() {
    let path = write_config(
        r#"
base_url: "https://badges.example.com/"
mqtt:
  request_topic: custom/requests
  status_topic: custom/status
"#,
    );

    let config = AgentConfig::load(path.to_str()).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.request_topic(), "custom/requests");
    assert_eq!(config.status_topic(), "custom/status");
    assert_eq!(config.mqtt.host, "localhost");
    assert_eq!(config.mqtt.port, 1883);
}

#[test]
fn test_defaults_without_file() {
    let config = AgentConfig::load(None).unwrap();

    assert_eq!(config.mqtt.port, 1883);
    assert_eq!(config.mqtt.max_held, 10);
    assert_eq!(config.printer.write_timeout_secs, 30);
    assert_eq!(config.printer.retry_policy().max_retries(), 1);
}

#[test]
fn test_missing_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("badge_agent_missing_{}.yaml", Uuid::new_v4()));
    assert!(AgentConfig::load(path.to_str()).is_err());
}
