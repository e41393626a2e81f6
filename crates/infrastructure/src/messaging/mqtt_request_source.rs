use async_trait::async_trait;
use domain::error::DomainError;
use domain::source::PrintRequestSource;
use domain::PrintRequest;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::mqtt_client::{MqttClient, MqttMessage};

/// Acknowledges MQTT deliveries received with manual acks enabled.
#[async_trait]
pub trait MqttAcker: Send + Sync {
    async fn ack(&self, topic: &str, pkid: u16) -> anyhow::Result<()>;
}

#[async_trait]
impl MqttAcker for MqttClient {
    async fn ack(&self, topic: &str, pkid: u16) -> anyhow::Result<()> {
        MqttClient::ack(self, topic, pkid).await
    }
}

/// Identifies one MQTT delivery for acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttReceipt {
    pub topic: String,
    pub pkid: u16,
}

/// Print requests arriving as JSON on one MQTT topic.
pub struct MqttPrintRequestSource<A: MqttAcker = MqttClient> {
    acker: A,
    topic: String,
    rx: broadcast::Receiver<MqttMessage>,
}

impl MqttPrintRequestSource<MqttClient> {
    /// Subscribe `client` to `topic` and start collecting requests.
    pub async fn subscribe(client: MqttClient, topic: &str) -> anyhow::Result<Self> {
        // Take the internal receiver before subscribing so retained and
        // queued messages delivered right after SUBACK are not missed.
        let rx = client.subscribe_messages();
        client.subscribe(topic).await?;
        info!(topic = %topic, "📥 Listening for print requests");
        Ok(Self::new(client, topic, rx))
    }
}

impl<A: MqttAcker> MqttPrintRequestSource<A> {
    pub fn new(acker: A, topic: &str, rx: broadcast::Receiver<MqttMessage>) -> Self {
        Self {
            acker,
            topic: topic.to_string(),
            rx,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl<A: MqttAcker> PrintRequestSource for MqttPrintRequestSource<A> {
    type Receipt = MqttReceipt;

    async fn receive(&mut self) -> Option<(PrintRequest, MqttReceipt)> {
        loop {
            match self.rx.recv().await {
                Ok(msg) => {
                    if msg.topic != self.topic {
                        continue;
                    }
                    let receipt = MqttReceipt {
                        topic: msg.topic,
                        pkid: msg.pkid,
                    };
                    match PrintRequest::from_json(&msg.payload) {
                        Ok(request) => return Some((request, receipt)),
                        Err(e) => {
                            // A malformed body can never print; ack it so it is not redelivered.
                            error!(topic = %receipt.topic, error = %e, "Error parsing print request");
                            if let Err(e) = self.acker.ack(&receipt.topic, receipt.pkid).await {
                                warn!(error = %e, "Failed to ack malformed print request");
                            }
                        }
                    }
                }
                // Skipped deliveries cannot be acked. Every buffered publish is
                // still unacked, so the broker's inflight limit keeps the
                // buffer short of FANOUT_CAPACITY.
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    error!(topic = %self.topic, skipped = count, "Print request listener lagged, skipped requests stay inflight until reconnect");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!(topic = %self.topic, "MQTT message channel closed");
                    return None;
                }
            }
        }
    }

    async fn acknowledge(&mut self, receipt: MqttReceipt) -> Result<(), DomainError> {
        self.acker
            .ack(&receipt.topic, receipt.pkid)
            .await
            .map_err(|e| DomainError::SourceError(e.to_string()))
    }
}
