use anyhow::{Result, anyhow};
use async_trait::async_trait;
use domain::source::PrintRequestSource;
use infrastructure::MqttMessage;
use infrastructure::messaging::{MqttAcker, MqttPrintRequestSource, MqttReceipt};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::broadcast;

const TOPIC: &str = "badges/print/agent-1";

#[derive(Clone, Default)]
struct MockAcker {
    acked: Arc<Mutex<Vec<(String, u16)>>>,
    should_fail: Arc<AtomicBool>,
}

#[async_trait]
impl MqttAcker for MockAcker {
    async fn ack(&self, topic: &str, pkid: u16) -> Result<()> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(anyhow!("Simulated Ack Failure"));
        }
        self.acked.lock().unwrap().push((topic.to_string(), pkid));
        Ok(())
    }
}

fn message(topic: &str, payload: &str, pkid: u16) -> MqttMessage {
    MqttMessage {
        topic: topic.to_string(),
        payload: payload.as_bytes().to_vec(),
        pkid,
    }
}

#[tokio::test]
async fn test_receives_request_with_receipt() {
    let (tx, rx) = broadcast::channel(16);
    let acker = MockAcker::default();
    let mut source = MqttPrintRequestSource::new(acker.clone(), TOPIC, rx);

    tx.send(message(
        TOPIC,
        r#"{"name":"Ana","company":"Acme","role":"Ops","employee_id":"E1","printer_id":"P1"}"#,
        7,
    ))
    .unwrap();

    let (request, receipt) = source.receive().await.unwrap();
    assert_eq!(request.badge.name, "Ana");
    assert_eq!(request.printer_id, "P1");
    assert_eq!(
        receipt,
        MqttReceipt {
            topic: TOPIC.to_string(),
            pkid: 7
        }
    );
    // Nothing is acked until the caller says so
    assert!(acker.acked.lock().unwrap().is_empty());

    source.acknowledge(receipt).await.unwrap();
    assert_eq!(*acker.acked.lock().unwrap(), vec![(TOPIC.to_string(), 7)]);
}

#[tokio::test]
async fn test_other_topics_are_ignored() {
    let (tx, rx) = broadcast::channel(16);
    let mut source = MqttPrintRequestSource::new(MockAcker::default(), TOPIC, rx);

    tx.send(message("badges/print/other", r#"{"name":"Bob"}"#, 1))
        .unwrap();
    tx.send(message(TOPIC, r#"{"name":"Ana","printer_id":"P1"}"#, 2))
        .unwrap();

    let (request, receipt) = source.receive().await.unwrap();
    assert_eq!(request.badge.name, "Ana");
    assert_eq!(receipt.pkid, 2);
}

#[tokio::test]
async fn test_malformed_payload_is_acked_and_skipped() {
    let (tx, rx) = broadcast::channel(16);
    let acker = MockAcker::default();
    let mut source = MqttPrintRequestSource::new(acker.clone(), TOPIC, rx);

    tx.send(message(TOPIC, "not json", 3)).unwrap();
    tx.send(message(TOPIC, r#"{"name":"Ana","printer_id":"P1"}"#, 4))
        .unwrap();

    let (request, receipt) = source.receive().await.unwrap();
    assert_eq!(request.badge.name, "Ana");
    assert_eq!(receipt.pkid, 4);
    assert_eq!(*acker.acked.lock().unwrap(), vec![(TOPIC.to_string(), 3)]);
}

#[tokio::test]
async fn test_closed_channel_ends_source() {
    let (tx, rx) = broadcast::channel::<MqttMessage>(16);
    let mut source = MqttPrintRequestSource::new(MockAcker::default(), TOPIC, rx);
    drop(tx);

    assert!(source.receive().await.is_none());
}

#[tokio::test]
async fn test_ack_failure_is_reported() {
    let (_tx, rx) = broadcast::channel::<MqttMessage>(16);
    let acker = MockAcker::default();
    acker.should_fail.store(true, Ordering::Relaxed);
    let mut source = MqttPrintRequestSource::new(acker, TOPIC, rx);

    let result = source
        .acknowledge(MqttReceipt {
            topic: TOPIC.to_string(),
            pkid: 9,
        })
        .await;

    assert!(result.is_err());
}
