use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{BadgeLabelGenerator, PrintListener, PrintService, PrinterRegistry};
use badge_agent::bootstrap::{register_printers, render_badge, resolve_printers};
use infrastructure::config::AgentConfig;
use infrastructure::{MqttClient, MqttPrintRequestSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (YAML, TOML or JSON)
    #[arg(long)]
    config: Option<String>,

    /// Printers as 'id:ip,id:ip', used when the config lists none
    #[arg(long)]
    printer_ips: Option<String>,

    /// Override the QR code base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override Agent ID
    #[arg(long)]
    agent_id: Option<String>,

    /// Override MQTT Host
    #[arg(long)]
    mqtt_host: Option<String>,

    /// Override MQTT Port
    #[arg(long)]
    mqtt_port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ZPL for one badge to stdout
    Render {
        /// Badge JSON file, stdin when omitted
        #[arg(long)]
        input: Option<String>,

        /// QR code base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn render(input: Option<String>, base_url: Option<String>) -> Result<()> {
    let base_url = base_url.unwrap_or_default();
    let stream = match input {
        Some(path) => {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open badge file {}", path))?;
            render_badge(file, &base_url)?
        }
        None => render_badge(std::io::stdin().lock(), &base_url)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(stream.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    info!("🪪 Badge Agent Starting...");
    info!("🆔 Process ID: {}", std::process::id());

    // 1. Load Configuration
    info!("Loading configuration...");
    let mut config = AgentConfig::load(args.config.as_deref())?;

    if let Some(id) = args.agent_id {
        config.agent_id = id;
    }
    if let Some(host) = args.mqtt_host {
        config.mqtt.host = host;
    }
    if let Some(port) = args.mqtt_port {
        config.mqtt.port = port;
    }
    if let Some(url) = args.base_url {
        config.base_url = Some(url);
    }

    let base_url = config.base_url.clone().ok_or_else(|| {
        anyhow!("base_url is not configured. Set it in the config file or pass --base-url")
    })?;

    let agent_id = config.agent_id.clone();
    info!("✅ Loaded configuration for Agent: {}", agent_id);

    // 2. Register Printers
    let printers = resolve_printers(&config.printers, args.printer_ips.as_deref())?;
    let mut registry = PrinterRegistry::new(
        Arc::new(config.printer.connector()),
        config.printer.retry_policy(),
    );
    register_printers(&mut registry, &printers).await?;

    let service = PrintService::new(BadgeLabelGenerator::new(base_url), registry);

    // 3. Initialize MQTT
    info!(host = %config.mqtt.host, port = %config.mqtt.port, "Connecting to MQTT Broker...");

    let status_topic = config.status_topic();
    let last_will_payload = serde_json::json!({ "status": "OFFLINE" }).to_string();
    let last_will = rumqttc::LastWill::new(
        &status_topic,
        last_will_payload,
        rumqttc::QoS::AtLeastOnce,
        true,
    );

    let mqtt_client = MqttClient::new(
        &config.mqtt.host,
        config.mqtt.port,
        &format!("badge-{}", agent_id),
        Some(last_will),
    )
    .await?;

    // Subscribe before coming ONLINE
    let source =
        MqttPrintRequestSource::subscribe(mqtt_client.clone(), &config.request_topic()).await?;

    // 4. Start Print Listener
    let shutdown = CancellationToken::new();
    let listener = PrintListener::new(source, service).with_max_held(config.mqtt.max_held);
    let listener_handle = tokio::spawn(listener.run(shutdown.clone()));

    info!("✅ Agent Initialized. Publishing ONLINE status...");
    let online_payload = serde_json::json!({
        "status": "ONLINE",
        "printers": printers.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
    })
    .to_string();
    if let Err(e) = mqtt_client.publish(&status_topic, &online_payload, true).await {
        warn!("Failed to publish ONLINE status: {}", e);
    }

    // 5. Shutdown Signal
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutting down..."),
        Err(err) => warn!(error = %err, "Unable to listen for shutdown signal"),
    }

    shutdown.cancel();
    match listener_handle.await {
        Ok(stats) => info!(printed = stats.printed, failed = stats.failed, "📊 Session totals"),
        Err(e) => warn!(error = %e, "Print listener task failed"),
    }

    // Publish OFFLINE before exit (Best effort)
    let offline_payload = serde_json::json!({ "status": "OFFLINE" }).to_string();
    let _ = mqtt_client
        .publish(&status_topic, &offline_payload, true)
        .await;
    let _ = mqtt_client.disconnect().await;

    info!("👋 Good bye!");
    Ok(())
}

fn main() {
    dotenv().ok();
    let mut args = Args::parse();

    let result = match args.command.take() {
        Some(Command::Render { input, base_url }) => render(input, base_url),
        None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG")
                        .unwrap_or_else(|_| "info,badge_agent=debug,application=debug".into()),
                ))
                .with(tracing_subscriber::fmt::layer())
                .init();

            tokio::runtime::Runtime::new()
                .map_err(anyhow::Error::from)
                .and_then(|rt| rt.block_on(run(args)))
        }
    };

    if let Err(e) = result {
        eprintln!("\n❌ CRITICAL ERROR: {:?}", e);
        std::process::exit(1);
    }
}
