use domain::source::PrintRequestSource;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::printer::{PrintService, PrintStats};

/// Unacked deliveries held at once. Kept below mosquitto's default
/// `max_inflight_messages` (20) so the broker never stops sending.
pub const DEFAULT_MAX_HELD: usize = 10;

/// Pulls print requests one at a time and feeds them to a [`PrintService`].
pub struct PrintListener<S: PrintRequestSource> {
    source: S,
    service: PrintService,
    held: VecDeque<S::Receipt>,
    max_held: usize,
}

impl<S: PrintRequestSource> PrintListener<S> {
    pub fn new(source: S, service: PrintService) -> Self {
        Self {
            source,
            service,
            held: VecDeque::new(),
            max_held: DEFAULT_MAX_HELD,
        }
    }

    /// Cap on deliveries left unacked after a retryable failure.
    pub fn with_max_held(mut self, max_held: usize) -> Self {
        self.max_held = max_held;
        self
    }

    /// Process requests until `shutdown` fires or the source closes, then
    /// close every printer connection.
    ///
    /// Successful prints and requests that can never succeed (unknown or
    /// duplicate tag) are acknowledged. A retryable failure is held unacked;
    /// an MQTT broker only redelivers it after the session reconnects. Once
    /// more than `max_held` deliveries are held, the oldest one is acked and
    /// its request is lost.
    pub async fn run(mut self, shutdown: CancellationToken) -> PrintStats {
        info!("🖨️ Print listener started");

        loop {
            let delivery = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("🛑 Shutdown requested, no longer accepting print requests");
                    break;
                }
                delivery = self.source.receive() => delivery,
            };

            let Some((request, receipt)) = delivery else {
                warn!("Print request source closed");
                break;
            };

            let outcome = self.service.print(&request).await;
            match &outcome.result {
                Err(e) if e.is_retryable() => {
                    warn!(
                        job_id = %outcome.job_id,
                        printer = %outcome.printer_id,
                        held = self.held.len() + 1,
                        "Print request left unacknowledged until reconnect"
                    );
                    self.hold(receipt).await;
                }
                result => {
                    if let Err(e) = result {
                        warn!(job_id = %outcome.job_id, error = %e, "Dropping print request that cannot succeed");
                    }
                    if let Err(e) = self.source.acknowledge(receipt).await {
                        warn!(job_id = %outcome.job_id, error = %e, "Failed to ack print request");
                    }
                }
            }
        }

        if !self.held.is_empty() {
            info!(held = self.held.len(), "Leaving failed print requests for redelivery");
        }
        self.service.shutdown().await;
        let stats = self.service.stats();
        info!(printed = stats.printed, failed = stats.failed, "🖨️ Print listener stopped");
        stats
    }

    async fn hold(&mut self, receipt: S::Receipt) {
        self.held.push_back(receipt);
        while self.held.len() > self.max_held {
            let Some(oldest) = self.held.pop_front() else {
                break;
            };
            error!(max_held = self.max_held, "Too many failed prints held, acking the oldest");
            if let Err(e) = self.source.acknowledge(oldest).await {
                warn!(error = %e, "Failed to ack print request");
            }
        }
    }
}
