use domain::CommandStream;
use domain::printer::{PrinterConnector, PrinterError, PrinterTag, RetryPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::connection::PrinterConnection;

/// Live printer connections keyed by operator tag.
///
/// Not internally synchronized: callers sharing a registry must serialize
/// access (every mutating operation takes `&mut self`).
pub struct PrinterRegistry {
    connector: Arc<dyn PrinterConnector>,
    policy: RetryPolicy,
    printers: HashMap<PrinterTag, PrinterConnection>,
}

impl PrinterRegistry {
    pub fn new(connector: Arc<dyn PrinterConnector>, policy: RetryPolicy) -> Self {
        Self {
            connector,
            policy,
            printers: HashMap::new(),
        }
    }

    /// Open a connection to `address` and register it under `tag`.
    ///
    /// A tag that is already registered is rejected before any I/O and the
    /// existing entry is left alone.
    pub async fn add(&mut self, tag: PrinterTag, address: &str) -> Result<(), PrinterError> {
        if self.printers.contains_key(&tag) {
            return Err(PrinterError::DuplicateTag(tag.to_string()));
        }

        let transport = self.connector.create(address);
        let connection = PrinterConnection::open(address, transport, self.policy)
            .await
            .map_err(|e| match e {
                PrinterError::ConnectionFailed(msg) => PrinterError::ConnectionFailed(format!(
                    "failed to add printer {tag}: {msg}"
                )),
                other => other,
            })?;

        info!(tag = %tag, address = %address, "🖨️ Added printer");
        self.printers.insert(tag, connection);
        Ok(())
    }

    /// Close and forget the connection registered under `tag`.
    pub async fn remove(&mut self, tag: &PrinterTag) -> Result<(), PrinterError> {
        let mut connection = self
            .printers
            .remove(tag)
            .ok_or_else(|| PrinterError::UnknownTag(tag.to_string()))?;
        connection.close().await;
        info!(tag = %tag, "🗑️ Removed printer");
        Ok(())
    }

    /// Send `stream` to the printer registered under `tag`.
    pub async fn dispatch(
        &mut self,
        tag: &PrinterTag,
        stream: &CommandStream,
    ) -> Result<(), PrinterError> {
        let connection = self
            .printers
            .get_mut(tag)
            .ok_or_else(|| PrinterError::UnknownTag(tag.to_string()))?;
        connection.write(stream).await
    }

    /// Close and forget every connection.
    pub async fn close_all(&mut self) {
        if self.printers.is_empty() {
            return;
        }
        info!(count = self.printers.len(), "🔌 Closing all printer connections");
        for (tag, mut connection) in self.printers.drain() {
            connection.close().await;
            info!(tag = %tag, "Printer closed");
        }
    }

    pub fn contains(&self, tag: &PrinterTag) -> bool {
        self.printers.contains_key(tag)
    }

    pub fn get(&self, tag: &PrinterTag) -> Option<&PrinterConnection> {
        self.printers.get(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<PrinterTag> {
        let mut tags: Vec<_> = self.printers.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }
}

impl Drop for PrinterRegistry {
    fn drop(&mut self) {
        // Dropping the transports releases their sockets.
        if !self.printers.is_empty() {
            warn!(
                count = self.printers.len(),
                "PrinterRegistry dropped with open connections, releasing sockets"
            );
        }
    }
}
