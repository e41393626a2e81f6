use async_trait::async_trait;
use domain::printer::{DEFAULT_PRINTER_PORT, PrinterConnector, PrinterError, PrinterTransport};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, error, info};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw TCP link to a label printer.
pub struct NetworkPrinter {
    address: String,
    stream: Option<TcpStream>,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            stream: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, write_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.write_timeout = write_timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl PrinterTransport for NetworkPrinter {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        info!("Connecting to printer at {}", self.address);
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(stream)) => {
                info!(address = %self.address, "Connected to printer");
                self.stream = Some(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(PrinterError::ConnectionFailed(format!(
                "{}: {}",
                self.address, e
            ))),
            Err(_) => Err(PrinterError::ConnectionFailed(format!(
                "{}: connection timed out after {:?}",
                self.address, self.connect_timeout
            ))),
        }
    }

    async fn disconnect(&mut self) -> Result<(), PrinterError> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
            debug!(address = %self.address, "Printer socket closed");
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError> {
        let Some(stream) = &mut self.stream else {
            return Err(PrinterError::NotConnected);
        };

        let write = async {
            stream.write_all(commands).await?;
            stream.flush().await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("Failed to write to printer: {}", e);
                self.stream = None; // Invalidate connection
                Err(PrinterError::WriteFailed(e.to_string()))
            }
            Err(_) => {
                error!(address = %self.address, "Printer write timed out");
                self.stream = None;
                Err(PrinterError::WriteFailed(format!(
                    "write timed out after {:?}",
                    self.write_timeout
                )))
            }
        }
    }
}

/// Creates [`NetworkPrinter`] transports for printer hosts.
#[derive(Debug, Clone)]
pub struct NetworkPrinterConnector {
    port: u16,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl NetworkPrinterConnector {
    pub fn new(port: u16, connect_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            port,
            connect_timeout,
            write_timeout,
        }
    }
}

impl Default for NetworkPrinterConnector {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRINTER_PORT,
            DEFAULT_CONNECT_TIMEOUT,
            DEFAULT_WRITE_TIMEOUT,
        )
    }
}

impl PrinterConnector for NetworkPrinterConnector {
    fn create(&self, address: &str) -> Box<dyn PrinterTransport> {
        Box::new(
            NetworkPrinter::new(address, self.port)
                .with_timeouts(self.connect_timeout, self.write_timeout),
        )
    }
}
