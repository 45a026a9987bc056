//! Binary entrypoint for qrc-service.
//!
//! Delegates all logic to the library crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use qrc_service::{
    Config, EventBus, GenerateRequest, Generator, Security, Service, WifiPayload, encode, logging,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "qrc-service",
    version,
    about = "Generate WiFi credential QR codes as PNG images."
)]
struct Cli {
    /// Path to YAML config file; defaults apply when it does not exist.
    #[arg(short, long, global = true, value_name = "FILE", default_value = "qrcservice.yaml")]
    config: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a WiFi QR code into the output directory.
    Generate(GenerateArgs),
    /// Print the WiFi-QR payload, or decode one.
    Payload(PayloadArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long)]
    ssid: String,
    #[arg(long, default_value = "")]
    password: String,
    /// WPA, WEP or nopass; other values are passed through.
    #[arg(long, default_value = "WPA")]
    security: String,
    /// Image size in pixels.
    #[arg(long, default_value_t = qrc_service::service::DEFAULT_REQUEST_SIZE)]
    size: u32,
    #[arg(long, default_value = qrc_service::service::DEFAULT_FILENAME)]
    filename: String,
}

#[derive(Debug, Args)]
struct PayloadArgs {
    #[arg(long, required_unless_present = "decode", conflicts_with = "decode")]
    ssid: Option<String>,
    #[arg(long, default_value = "")]
    password: String,
    #[arg(long, default_value = "WPA")]
    security: String,
    /// Parse an existing payload and print its fields.
    #[arg(long, value_name = "TEXT")]
    decode: Option<String>,
}

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error!(error = ?err, "qrc-service exited with error");
            std::process::exit(1);
        }
    }
}

async fn try_main() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate(&cli.config, args).await,
        Commands::Payload(args) => payload(args),
    }
}

async fn generate(config_path: &Path, args: GenerateArgs) -> Result<bool> {
    let config = Config::load_or_default(config_path)?;
    config
        .validate()
        .with_context(|| format!("validating config {}", config_path.display()))?;
    info!(config = %config_path.display(), output_dir = %config.output_dir.display(), "starting qrc-service");

    let generator = Generator::new(&config);
    generator.ensure_output_dir()?;

    let bus = EventBus::new();
    let mut events = bus.subscribe();
    let service = Service::new(generator, Arc::new(bus));

    let request = GenerateRequest {
        ssid: args.ssid,
        password: args.password,
        security: Security::from(args.security.as_str()),
        size: args.size,
        filename: args.filename,
    };
    let ok = service.generate_wifi_qr(request).await;

    if let Ok(event) = events.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(ok)
}

fn payload(args: PayloadArgs) -> Result<bool> {
    if let Some(text) = args.decode {
        let cred = WifiPayload::parse(&text).context("decoding payload")?;
        println!("ssid: {}", cred.ssid);
        println!("password: {}", cred.password);
        println!("security: {}", cred.security);
        return Ok(true);
    }
    let ssid = args.ssid.context("--ssid is required")?;
    let security = Security::from(args.security.as_str());
    println!("{}", encode(&ssid, &args.password, &security));
    Ok(true)
}
