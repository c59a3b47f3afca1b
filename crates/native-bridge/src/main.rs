//! Native shell bridge: entry point.
//!
//! Runs the inbound event endpoint the native shell calls back into, or sends
//! a single command to the shell and prints the answer as JSON.
//!
//! # Usage
//!
//! ```text
//! native-bridge [OPTIONS] [COMMAND]
//!
//! Commands:
//!   serve          Run the inbound event endpoint (default)
//!   printers       List the host's printers
//!   idle-state     Print the host's idle state
//!   thermal-state  Print the host's thermal state
//!   broadcast      Send an application event to every window
//!   init-config    Write the current settings to the settings file
//!
//! Options:
//!   --config        <PATH>  Settings file [default: platform config dir]
//!   --bind          <IP>    Event endpoint bind address [default: from settings]
//!   --port          <PORT>  Event endpoint port [default: from settings]
//!   --shell-url     <URL>   Shell control API base URL
//!   --secret        <TEXT>  Shared shell secret (required)
//!   --shell-timeout <SECS>  Timeout for one shell call
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Description                     |
//! |-------------------------|---------------------------------|
//! | `NATIVE_BRIDGE_CONFIG`  | Settings file path              |
//! | `NATIVE_BRIDGE_BIND`    | Event endpoint bind address     |
//! | `NATIVE_BRIDGE_PORT`    | Event endpoint port             |
//! | `NATIVE_SHELL_URL`      | Shell control API base URL      |
//! | `NATIVE_BRIDGE_SECRET`  | Shared shell secret             |
//! | `NATIVE_SHELL_TIMEOUT`  | Shell call timeout (secs)       |
//!
//! Command-line arguments win over environment variables, which win over the
//! settings file.
//!
//! `init-config` is the only command that runs without a secret.  It refuses
//! to replace an existing file unless `--force` is given.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use native_bridge::application::{EventDispatcher, LoggingListener, ShellClient};
use native_bridge::domain::{AppSettings, BridgeConfig};
use native_bridge::infrastructure::storage::config::{
    default_config_path, load_config, save_config,
};
use native_bridge::infrastructure::{run_server, HttpShellTransport};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Bridge between a web application and its native desktop shell.
#[derive(Debug, Parser)]
#[command(
    name = "native-bridge",
    about = "HTTP command/event bridge to a native desktop shell",
    version
)]
struct Cli {
    /// Settings file to load.  A missing file means "use defaults".
    #[arg(long, env = "NATIVE_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// IP address the event endpoint binds to.
    ///
    /// Keep this on loopback unless the shell runs on another machine.
    #[arg(long, env = "NATIVE_BRIDGE_BIND")]
    bind: Option<String>,

    /// TCP port of the event endpoint.
    #[arg(long, env = "NATIVE_BRIDGE_PORT")]
    port: Option<u16>,

    /// Base URL of the shell's control API.
    #[arg(long, env = "NATIVE_SHELL_URL")]
    shell_url: Option<String>,

    /// Shared secret known to both the shell and the bridge.
    #[arg(long, env = "NATIVE_BRIDGE_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Timeout for a single shell call, in seconds.
    #[arg(long, env = "NATIVE_SHELL_TIMEOUT")]
    shell_timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Run the inbound event endpoint until Ctrl+C.
    Serve,
    /// List the host's printers.
    Printers,
    /// Print the host's idle state.
    IdleState {
        /// Seconds without input after which the host counts as idle.
        #[arg(long, default_value_t = 60)]
        threshold: u64,
    },
    /// Print the host's thermal state.
    ThermalState,
    /// Send an application event to every open window.
    Broadcast {
        /// Event name the windows listen for.
        #[arg(long)]
        event: String,
        /// Event payload as JSON text.
        #[arg(long, default_value = "null")]
        payload: String,
    },
    /// Write the current settings to the settings file.
    InitConfig {
        /// Replace the file if it already exists.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Merges the arguments over `settings` into a [`BridgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if no secret is configured or the bind address is not
    /// a valid IP address.
    fn into_bridge_config(self, settings: &AppSettings) -> anyhow::Result<BridgeConfig> {
        let bind = self
            .bind
            .unwrap_or_else(|| settings.server.bind_address.clone());
        let ip: IpAddr = bind
            .parse()
            .with_context(|| format!("invalid bind address: '{bind}'"))?;
        let port = self.port.unwrap_or(settings.server.port);

        let secret = match self.secret.or_else(|| settings.shell.secret.clone()) {
            Some(secret) if !secret.is_empty() => secret,
            _ => bail!("a shell secret is required (--secret or NATIVE_BRIDGE_SECRET)"),
        };

        Ok(BridgeConfig {
            bind_addr: SocketAddr::new(ip, port),
            shell_url: self
                .shell_url
                .unwrap_or_else(|| settings.shell.api_url.clone()),
            secret,
            shell_timeout: self
                .shell_timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| settings.shell.timeout()),
            shell_facing: settings.shell_facing(),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Command::Serve);

    let config_path = match cli.config.clone() {
        Some(path) => Some(path),
        None => match default_config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("{e}; using default settings");
                None
            }
        },
    };

    let settings = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AppSettings::default(),
    };

    // Only the commands that reach the shell need a secret.
    let bridge_config = || cli.into_bridge_config(&settings);

    match command {
        Command::InitConfig { force } => {
            let path = config_path.context(
                "no settings file location; pass --config or set NATIVE_BRIDGE_CONFIG",
            )?;
            init_config(&path, &settings, force)
        }
        Command::Serve => serve(bridge_config()?).await,
        Command::Printers => {
            let shell = shell_client(&bridge_config()?)?;
            print_json(&shell.printers().await?)
        }
        Command::IdleState { threshold } => {
            let shell = shell_client(&bridge_config()?)?;
            let state = shell
                .system_idle_state(Duration::from_secs(threshold))
                .await?;
            print_json(&state)
        }
        Command::ThermalState => {
            let shell = shell_client(&bridge_config()?)?;
            print_json(&shell.thermal_state().await?)
        }
        Command::Broadcast { event, payload } => {
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("--payload is not valid JSON")?;
            let shell = shell_client(&bridge_config()?)?;
            shell.broadcast(&event, &payload).await?;
            info!("broadcast '{event}' sent");
            Ok(())
        }
    }
}

/// Writes `settings` to `path`, keeping any file already there unless `force`.
fn init_config(path: &Path, settings: &AppSettings, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    save_config(path, settings)
        .with_context(|| format!("failed to write settings to {}", path.display()))?;
    info!("settings written to {}", path.display());
    Ok(())
}

async fn serve(config: BridgeConfig) -> anyhow::Result<()> {
    info!(
        "native bridge starting: endpoint={}, shell={}",
        config.bind_addr, config.shell_url
    );

    let dispatcher = EventDispatcher::new().with_listener(LoggingListener);

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, dispatcher, running).await
}

fn shell_client(config: &BridgeConfig) -> anyhow::Result<ShellClient<HttpShellTransport>> {
    let transport = HttpShellTransport::new(
        &config.shell_url,
        config.secret.clone(),
        config.shell_timeout,
    )?;
    Ok(ShellClient::new(transport))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{text}");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("native-bridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_without_subcommand_has_no_command() {
        let parsed = cli(&["--secret", "s"]);
        assert_eq!(parsed.command, None);
    }

    #[test]
    fn test_cli_idle_state_default_threshold() {
        let parsed = cli(&["--secret", "s", "idle-state"]);
        assert_eq!(parsed.command, Some(Command::IdleState { threshold: 60 }));
    }

    #[test]
    fn test_cli_idle_state_threshold_override() {
        let parsed = cli(&["idle-state", "--threshold", "300"]);
        assert_eq!(parsed.command, Some(Command::IdleState { threshold: 300 }));
    }

    #[test]
    fn test_cli_parses_other_subcommands() {
        assert_eq!(cli(&["printers"]).command, Some(Command::Printers));
        assert_eq!(cli(&["thermal-state"]).command, Some(Command::ThermalState));
        assert_eq!(cli(&["serve"]).command, Some(Command::Serve));
    }

    #[test]
    fn test_cli_parses_broadcast_with_default_payload() {
        let parsed = cli(&["broadcast", "--event", "OrderShipped"]);
        assert_eq!(
            parsed.command,
            Some(Command::Broadcast {
                event: "OrderShipped".to_string(),
                payload: "null".to_string(),
            })
        );
    }

    #[test]
    fn test_cli_parses_init_config_force_flag() {
        assert_eq!(
            cli(&["init-config"]).command,
            Some(Command::InitConfig { force: false })
        );
        assert_eq!(
            cli(&["init-config", "--force"]).command,
            Some(Command::InitConfig { force: true })
        );
    }

    fn scratch_file(label: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("native-bridge-main-{label}-{}", uuid::Uuid::new_v4()))
            .join("native-bridge.toml")
    }

    #[test]
    fn test_init_config_writes_loadable_settings() {
        // Arrange
        let path = scratch_file("init");
        let mut settings = AppSettings::default();
        settings.server.port = 9200;

        // Act
        init_config(&path, &settings, false).unwrap();

        // Assert
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.server.port, 9200);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_init_config_keeps_existing_file_without_force() {
        // Arrange
        let path = scratch_file("keep");
        init_config(&path, &AppSettings::default(), false).unwrap();
        let mut changed = AppSettings::default();
        changed.server.port = 9300;

        // Act
        let refused = init_config(&path, &changed, false);
        let forced = init_config(&path, &changed, true);

        // Assert
        assert!(refused.is_err());
        assert!(forced.is_ok());
        assert_eq!(load_config(&path).unwrap().server.port, 9300);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_into_bridge_config_uses_settings_defaults() {
        // Arrange
        let settings = AppSettings::default();

        // Act
        let config = cli(&["--secret", "s3cret"])
            .into_bridge_config(&settings)
            .unwrap();

        // Assert
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8100");
        assert_eq!(config.shell_url, "http://127.0.0.1:4000/api/");
        assert_eq!(config.shell_timeout, Duration::from_secs(60));
        assert_eq!(config.secret, "s3cret");
    }

    #[test]
    fn test_arguments_override_settings() {
        let mut settings = AppSettings::default();
        settings.server.port = 9000;
        settings.shell.secret = Some("from-file".to_string());

        let config = cli(&[
            "--port",
            "9100",
            "--bind",
            "0.0.0.0",
            "--secret",
            "from-cli",
            "--shell-url",
            "http://10.0.0.2:4000/api/",
            "--shell-timeout",
            "5",
        ])
        .into_bridge_config(&settings)
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9100");
        assert_eq!(config.secret, "from-cli");
        assert_eq!(config.shell_url, "http://10.0.0.2:4000/api/");
        assert_eq!(config.shell_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_secret_from_settings_file_is_used() {
        let mut settings = AppSettings::default();
        settings.shell.secret = Some("from-file".to_string());

        let config = cli(&[]).into_bridge_config(&settings).unwrap();

        assert_eq!(config.secret, "from-file");
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = cli(&[]).into_bridge_config(&AppSettings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_secret_is_an_error() {
        let result = cli(&["--secret", ""]).into_bridge_config(&AppSettings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bind_address_is_an_error() {
        let result = cli(&["--secret", "s", "--bind", "not.an.ip"])
            .into_bridge_config(&AppSettings::default());
        assert!(result.is_err());
    }
}
