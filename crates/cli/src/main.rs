//! `uhome` command line client.
//!
//! Loads configuration (`.env`, environment, config file), runs the browser
//! login when no valid token is held and issues one action per invocation.
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uhome_core::{Device, DeviceFactory};
use uhome_domain::Config;
use uhome_infra::{config, ApiClient, ApiClientConfig, AuthenticationHandler};

const DEFAULT_LOG_FILTER: &str = "info,uhome=debug";

#[derive(Parser)]
#[command(name = "uhome")]
#[command(about = "Control U-Home smart locks, lights and switches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (JSON or TOML); defaults to environment, then probed files
    #[arg(short, long, global = true, env = "UHOME_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the browser login and print the token expiry
    Login,

    /// Print the authenticated user's profile
    User,

    /// List discovered devices
    Discover,

    /// Query and print the reported state of a device
    Status { device_id: String },

    /// Lock a smart lock
    Lock { device_id: String },

    /// Unlock a smart lock
    Unlock { device_id: String },

    /// Turn a light or switch on
    On { device_id: String },

    /// Turn a light or switch off
    Off { device_id: String },

    /// Set light brightness in percent
    Brightness {
        device_id: String,

        /// 0-100
        level: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `UHOME_CONFIG` may come from `.env`.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing(cli.json);
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let config = load_config(cli.config.clone())?;
    let auth = Arc::new(AuthenticationHandler::from_config(&config.auth)?);
    let client = Arc::new(ApiClient::new(ApiClientConfig::from(&config.api), auth.clone())?);

    let result = run(cli.command, &auth, &client).await;
    client.close();
    result
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let loaded = match path {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    };
    loaded.context("no usable configuration; set UHOME_CLIENT_ID or provide a config file")
}

async fn run(
    command: Commands,
    auth: &AuthenticationHandler,
    client: &Arc<ApiClient>,
) -> anyhow::Result<()> {
    match command {
        Commands::Login => {
            auth.authenticate().await?;
            let expires_at = auth.token_state().map(|tokens| tokens.expires_at.to_rfc3339());
            print_json(&json!({ "authenticated": true, "expires_at": expires_at }))
        }
        Commands::User => print_json(&client.get_user().await?),
        Commands::Discover => {
            let devices = discover(client).await?;
            let listing: Vec<Value> = devices.iter().map(describe).collect();
            print_json(&Value::Array(listing))
        }
        Commands::Status { device_id } => {
            let device = find_device(client, &device_id).await?;
            device.refresh_state().await?;
            print_json(&json!({ "id": device.id(), "state": device.latest_state() }))
        }
        Commands::Lock { device_id } => {
            let device = find_device(client, &device_id).await?;
            let Some(lock) = device.as_lock() else { bail!("{device_id} is not a lock") };
            lock.lock().await?;
            print_json(&json!({ "id": device_id, "lock_state": lock.lock_state().to_string() }))
        }
        Commands::Unlock { device_id } => {
            let device = find_device(client, &device_id).await?;
            let Some(lock) = device.as_lock() else { bail!("{device_id} is not a lock") };
            lock.unlock().await?;
            print_json(&json!({ "id": device_id, "lock_state": lock.lock_state().to_string() }))
        }
        Commands::On { device_id } => switch_power(client, &device_id, true).await,
        Commands::Off { device_id } => switch_power(client, &device_id, false).await,
        Commands::Brightness { device_id, level } => {
            let device = find_device(client, &device_id).await?;
            let Some(light) = device.as_light() else { bail!("{device_id} is not a light") };
            light.set_brightness(level).await?;
            print_json(&json!({ "id": device_id, "brightness": level }))
        }
    }
}

async fn discover(client: &Arc<ApiClient>) -> anyhow::Result<Vec<Device>> {
    let factory = DeviceFactory::for_gateway(client);
    let response = client.discover_devices().await?;
    let devices = factory.create_devices(&response)?;
    info!(count = devices.len(), "devices discovered");
    Ok(devices)
}

async fn find_device(client: &Arc<ApiClient>, device_id: &str) -> anyhow::Result<Device> {
    discover(client)
        .await?
        .into_iter()
        .find(|device| device.id() == device_id)
        .with_context(|| format!("no supported device with id {device_id}"))
}

async fn switch_power(client: &Arc<ApiClient>, device_id: &str, on: bool) -> anyhow::Result<()> {
    let device = find_device(client, device_id).await?;
    match (&device, on) {
        (Device::Light(light), true) => light.turn_on().await?,
        (Device::Light(light), false) => light.turn_off().await?,
        (Device::Switch(switch), true) => switch.turn_on().await?,
        (Device::Switch(switch), false) => switch.turn_off().await?,
        (Device::Lock(_), _) => bail!("{device_id} is a lock; use lock/unlock"),
    }
    print_json(&json!({ "id": device_id, "on": on }))
}

fn describe(device: &Device) -> Value {
    json!({
        "id": device.id(),
        "name": device.name(),
        "kind": device.kind(),
        "handle_type": device.handle_type().as_str(),
        "category": device.category(),
        "capabilities": device.capabilities(),
        "model": device.device_info().model,
    })
}

#[allow(clippy::print_stdout)]
fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
