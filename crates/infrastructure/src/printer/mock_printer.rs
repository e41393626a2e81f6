use async_trait::async_trait;
use domain::printer::{PrinterConnector, PrinterError, PrinterTransport};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// In-memory printer with counters and injectable failures.
///
/// Clones share state, so a test can keep one handle while the registry owns
/// another.
#[derive(Clone, Default)]
pub struct MockPrinter {
    connected: Arc<AtomicBool>,
    pub sent_data: Arc<Mutex<Vec<u8>>>,
    pub connect_attempts: Arc<AtomicUsize>,
    pub write_attempts: Arc<AtomicUsize>,
    pub disconnects: Arc<AtomicUsize>,
    fail_connects: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicUsize>,
}

impl MockPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` connect attempts fail.
    pub fn fail_next_connects(&self, n: usize) {
        self.fail_connects.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` writes fail. A failed write drops the socket.
    pub fn fail_next_writes(&self, n: usize) {
        self.fail_writes.store(n, Ordering::SeqCst);
    }

    pub fn connect_count(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Everything successfully written so far, lossily decoded.
    pub fn sent_text(&self) -> String {
        let data = self.sent_data.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&data).into_owned()
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl PrinterTransport for MockPrinter {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.fail_connects) {
            return Err(PrinterError::ConnectionFailed(
                "Simulated Connection Failure".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), PrinterError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected()
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if !self.connected() {
            return Err(PrinterError::NotConnected);
        }
        if take_failure(&self.fail_writes) {
            self.connected.store(false, Ordering::SeqCst);
            return Err(PrinterError::WriteFailed("Simulated Broken Pipe".to_string()));
        }
        let mut data = self.sent_data.lock().unwrap_or_else(|e| e.into_inner());
        data.extend_from_slice(commands);
        Ok(())
    }
}

/// Hands out [`MockPrinter`]s, one per address, and remembers them.
///
/// Addresses registered with [`MockPrinterConnector::unreachable`] produce
/// printers whose connects always fail.
#[derive(Clone, Default)]
pub struct MockPrinterConnector {
    printers: Arc<Mutex<HashMap<String, MockPrinter>>>,
    unreachable: Arc<Mutex<Vec<String>>>,
    pub created: Arc<AtomicUsize>,
}

impl MockPrinterConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable(&self, address: &str) {
        self.unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(address.to_string());
    }

    /// Printer handed out for `address`, if any.
    pub fn printer(&self, address: &str) -> Option<MockPrinter> {
        self.printers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(address)
            .cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl PrinterConnector for MockPrinterConnector {
    fn create(&self, address: &str) -> Box<dyn PrinterTransport> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let printer = MockPrinter::new();
        let is_unreachable = self
            .unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|a| a == address);
        if is_unreachable {
            printer.fail_next_connects(usize::MAX);
        }
        self.printers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address.to_string(), printer.clone());
        Box::new(printer)
    }
}
