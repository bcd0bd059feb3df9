use crate::cli::ConfigCommands;
use crate::cli_config::{default_config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(),
        ConfigCommands::Set {
            interval,
            network_delay_ms,
            connected,
        } => run_config_set(interval, network_delay_ms, connected),
    }
}

pub fn run_config_show() -> Result<(), CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    let sync = config.sync_config();

    println!("Config file:     {}", default_config_path().display());
    println!("Sync interval:   {}s", sync.interval.as_secs());
    println!("Network delay:   {}ms", sync.network_delay.as_millis());
    println!(
        "Connection:      {}",
        if sync.connected { "online" } else { "offline" }
    );
    Ok(())
}

pub fn run_config_set(
    interval: Option<u64>,
    network_delay_ms: Option<u64>,
    connected: Option<bool>,
) -> Result<(), CliError> {
    if interval.is_none() && network_delay_ms.is_none() && connected.is_none() {
        return Err(CliError::Config(
            "Nothing to set: pass --interval, --network-delay-ms or --connected".to_string(),
        ));
    }
    if interval == Some(0) {
        return Err(CliError::Config(
            "Sync interval must be at least 1 second".to_string(),
        ));
    }

    let mut config = CliConfig::load().map_err(CliError::Config)?;
    apply_config_updates(&mut config, interval, network_delay_ms, connected);

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved CLI config to {}", path.display());
    Ok(())
}

pub fn apply_config_updates(
    config: &mut CliConfig,
    interval: Option<u64>,
    network_delay_ms: Option<u64>,
    connected: Option<bool>,
) {
    if interval.is_some() {
        config.sync_interval_secs = interval;
    }
    if network_delay_ms.is_some() {
        config.network_delay_ms = network_delay_ms;
    }
    if connected.is_some() {
        config.connected = connected;
    }
}
