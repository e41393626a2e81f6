use anyhow::{Result, anyhow};
use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Outgoing, Packet, Publish, QoS};
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const KEEP_ALIVE: Duration = Duration::from_secs(20);
const REQUEST_CAPACITY: usize = 100;
// Above any broker inflight limit, so a slow consumer never lags.
const FANOUT_CAPACITY: usize = 250;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// One PUBLISH received from the broker. `pkid` is needed to ack it.
#[derive(Clone, Debug)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub pkid: u16,
}

/// Session state shared with the event loop task.
#[derive(Default)]
struct Session {
    connected: AtomicBool,
    topics: RwLock<Vec<String>>,
}

impl Session {
    fn topics(&self) -> Vec<String> {
        self.topics.read().map(|t| t.clone()).unwrap_or_default()
    }

    fn remember(&self, topic: &str) {
        if let Ok(mut topics) = self.topics.write() {
            if !topics.iter().any(|t| t == topic) {
                topics.push(topic.to_string());
            }
        }
    }
}

/// MQTT connection with manual acks and a persistent session.
///
/// Incoming publishes fan out over a broadcast channel; nothing is acked
/// until [`MqttClient::ack`] is called. The broker redelivers unacked
/// publishes only after a reconnect, never within the session.
#[derive(Clone)]
pub struct MqttClient {
    client: AsyncClient,
    tx: broadcast::Sender<MqttMessage>,
    session: Arc<Session>,
}

impl MqttClient {
    pub async fn new(
        host: &str,
        port: u16,
        client_id: &str,
        last_will: Option<LastWill>,
    ) -> Result<Self> {
        let mut options = MqttOptions::new(client_id, host, port);
        options
            .set_keep_alive(KEEP_ALIVE)
            .set_clean_session(false)
            .set_manual_acks(true);
        if let Some(will) = last_will {
            options.set_last_will(will);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (tx, _) = broadcast::channel(FANOUT_CAPACITY);
        let session = Arc::new(Session::default());

        tokio::spawn(drive(eventloop, client.clone(), tx.clone(), session.clone()));

        Ok(Self {
            client,
            tx,
            session,
        })
    }

    /// New receiver for every publish arriving after this call.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<MqttMessage> {
        self.tx.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.session.connected.load(Ordering::Relaxed)
    }

    pub async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload.as_bytes().to_vec())
            .await
            .map_err(|e| anyhow!("Failed to publish to {}: {}", topic, e))
    }

    /// Subscribe now and again after every reconnect.
    pub async fn subscribe(&self, topic: &str) -> Result<()> {
        self.session.remember(topic);
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| anyhow!("Failed to subscribe to topic {}: {}", topic, e))
    }

    /// Release the delivery `pkid` on `topic` so the broker drops it.
    pub async fn ack(&self, topic: &str, pkid: u16) -> Result<()> {
        let mut delivery = Publish::new(topic, QoS::AtLeastOnce, Vec::<u8>::new());
        delivery.pkid = pkid;
        self.client
            .ack(&delivery)
            .await
            .map_err(|e| anyhow!("Failed to ack packet {}: {}", pkid, e))
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| anyhow!("Failed to disconnect from MQTT broker: {}", e))
    }
}

async fn drive(
    mut eventloop: EventLoop,
    client: AsyncClient,
    tx: broadcast::Sender<MqttMessage>,
    session: Arc<Session>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let msg = MqttMessage {
                    topic: publish.topic,
                    payload: publish.payload.to_vec(),
                    pkid: publish.pkid,
                };
                if let Err(broadcast::error::SendError(dropped)) = tx.send(msg) {
                    warn!(topic = %dropped.topic, "⚠️ Dropped MQTT message, nobody is listening yet");
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("📡 MQTT Connected");
                session.connected.store(true, Ordering::Relaxed);
                resubscribe(&client, &session).await;
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                session.connected.store(false, Ordering::Relaxed);
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT Connection error: {:?}", e);
                session.connected.store(false, Ordering::Relaxed);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

async fn resubscribe(client: &AsyncClient, session: &Session) {
    let topics = session.topics();
    if topics.is_empty() {
        return;
    }
    debug!(count = topics.len(), "Restoring MQTT subscriptions");
    for topic in topics {
        if let Err(e) = client.subscribe(&topic, QoS::AtLeastOnce).await {
            error!(topic = %topic, error = %e, "Failed to re-subscribe");
        }
    }
}
