use anyhow::{Context, Result, bail};
use application::{BadgeLabelGenerator, PrinterRegistry};
use domain::printer::PrinterTag;
use domain::{BadgeRecord, CommandStream};
use infrastructure::config::{PrinterEntry, parse_printer_list};
use std::io::Read;
use tracing::info;

/// Pick the printers to register at startup.
///
/// The configuration file wins when it lists any printer; otherwise the
/// command-line list is used. Having none at all is an error.
pub fn resolve_printers(
    configured: &[PrinterEntry],
    cli_list: Option<&str>,
) -> Result<Vec<PrinterEntry>> {
    if !configured.is_empty() {
        return Ok(configured.to_vec());
    }

    let printers = match cli_list {
        Some(list) => parse_printer_list(list)?,
        None => Vec::new(),
    };

    if printers.is_empty() {
        bail!("No printers configured. Use the config file or --printer-ips 'id:ip,id:ip'");
    }
    Ok(printers)
}

/// Register every printer, failing on the first one that cannot be reached.
pub async fn register_printers(
    registry: &mut PrinterRegistry,
    printers: &[PrinterEntry],
) -> Result<()> {
    for entry in printers {
        let tag = PrinterTag::new(entry.id.as_str())
            .with_context(|| format!("Invalid printer id {:?}", entry.id))?;
        registry
            .add(tag, &entry.ip)
            .await
            .with_context(|| format!("Failed to register printer {} at {}", entry.id, entry.ip))?;
    }
    info!(count = registry.len(), "✅ Printers registered");
    Ok(())
}

/// Render a badge read as JSON from `input` without touching any printer.
pub fn render_badge(mut input: impl Read, base_url: &str) -> Result<CommandStream> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .context("Failed to read badge JSON")?;
    let badge: BadgeRecord = serde_json::from_str(&raw).context("Invalid badge JSON")?;
    Ok(BadgeLabelGenerator::new(base_url).generate(&badge))
}
