use chrono::{DateTime, Utc};
use domain::printer::{PrinterError, PrinterTag};
use domain::{CommandStream, PrintRequest};
use tracing::{error, info};
use uuid::Uuid;

use super::registry::PrinterRegistry;
use crate::label::BadgeLabelGenerator;

/// Result of handling one print request.
#[derive(Debug)]
pub struct PrintOutcome {
    pub job_id: Uuid,
    pub printer_id: String,
    pub stream: CommandStream,
    pub result: Result<(), PrinterError>,
    pub completed_at: DateTime<Utc>,
}

impl PrintOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Running totals kept by a [`PrintService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintStats {
    pub printed: u64,
    pub failed: u64,
}

/// Renders badges and sends them to registered printers.
pub struct PrintService {
    generator: BadgeLabelGenerator,
    registry: PrinterRegistry,
    stats: PrintStats,
}

impl PrintService {
    pub fn new(generator: BadgeLabelGenerator, registry: PrinterRegistry) -> Self {
        Self {
            generator,
            registry,
            stats: PrintStats::default(),
        }
    }

    pub fn registry(&self) -> &PrinterRegistry {
        &self.registry
    }

    /// Runtime reconfiguration goes through here.
    pub fn registry_mut(&mut self) -> &mut PrinterRegistry {
        &mut self.registry
    }

    pub fn stats(&self) -> PrintStats {
        self.stats
    }

    /// Render `request` and dispatch it to its printer.
    pub async fn print(&mut self, request: &PrintRequest) -> PrintOutcome {
        let job_id = Uuid::new_v4();
        let stream = self.generator.generate(&request.badge);

        let result = match PrinterTag::new(request.printer_id.as_str()) {
            Ok(tag) => self.registry.dispatch(&tag, &stream).await,
            Err(_) => Err(PrinterError::UnknownTag(request.printer_id.clone())),
        };

        match &result {
            Ok(()) => {
                self.stats.printed += 1;
                info!(
                    job_id = %job_id,
                    printer = %request.printer_id,
                    bytes = stream.len(),
                    "✅ Printed label for {}",
                    request.badge.name
                );
            }
            Err(e) => {
                self.stats.failed += 1;
                error!(
                    job_id = %job_id,
                    printer = %request.printer_id,
                    error = %e,
                    "❌ Error printing label for {}",
                    request.badge.name
                );
            }
        }

        PrintOutcome {
            job_id,
            printer_id: request.printer_id.clone(),
            stream,
            result,
            completed_at: Utc::now(),
        }
    }

    /// Close every printer connection.
    pub async fn shutdown(&mut self) {
        self.registry.close_all().await;
    }
}
