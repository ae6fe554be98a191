use clap::Parser;
use indns_domain::{CliOverrides, Config};
use indns_infrastructure::config::DirectoryWatcher;
use indns_jobs::ZoneReloadJob;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

const ZONE_EVENT_BUFFER: usize = 64;

#[derive(Parser)]
#[command(name = "indnsd")]
#[command(version)]
#[command(about = "indns - DNS forwarder with local override records")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Install prefix (defaults to the parent of the binary's directory)
    #[arg(long, value_name = "DIR")]
    prefix: Option<PathBuf>,

    /// Listen address, ip:port
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream nameserver, repeatable; tried before configured ones
    #[arg(short = 'n', long = "name-server", value_name = "ADDR")]
    name_servers: Vec<String>,

    /// Directory of override record files
    #[arg(long = "config-dir", value_name = "DIR")]
    config_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let prefix = cli.prefix.unwrap_or_else(bootstrap::install_prefix);
    let config_path = cli.config.unwrap_or_else(|| Config::default_path(&prefix));

    let cli_overrides = CliOverrides {
        bind: cli.bind,
        name_servers: cli.name_servers,
        config_directory: cli.config_dir,
        log_level: cli.log_level,
    };

    let file_config = Config::load(Some(config_path.as_path()), &prefix)?;
    let config = file_config.clone().with_overrides(cli_overrides);
    config.validate()?;

    bootstrap::init_logging(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), prefix = %prefix.display(), "Starting indns");

    bootstrap::persist_config(&file_config, &config_path);

    let bind_addr = config.bind_addr()?;
    let shutdown = CancellationToken::new();
    let services = di::DnsServices::new(&config, bind_addr);

    // Overrides must be in place before the first query is served.
    let mut watcher = DirectoryWatcher::new(
        &config.server.config_directory,
        config.watcher.poll_interval(),
    );
    let existing = watcher.prime();
    let reload_job = ZoneReloadJob::new(services.reload.clone()).with_cancellation(shutdown.clone());
    reload_job.load_existing(&existing);
    info!(records = services.store.len(), "Local records loaded");

    let (events_tx, events_rx) = mpsc::channel(ZONE_EVENT_BUFFER);
    let watcher_task = watcher.start(events_tx, shutdown.clone());
    let reload_task = reload_job.start(events_rx);

    let mut server_task = tokio::spawn(server::start_dns_server(
        bind_addr,
        services.handler.clone(),
        config.resolver.query_timeout(),
        shutdown.clone(),
    ));

    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received Ctrl-C, shutting down"),
                Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
            }
            Ok(())
        }
        result = &mut server_task => match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!(error = %e, "DNS server error");
                Err(e)
            }
            Err(e) => Err(anyhow::anyhow!("DNS server task failed: {}", e)),
        }
    };

    shutdown.cancel();
    let _ = tokio::join!(watcher_task, reload_task);
    if !server_task.is_finished() {
        let _ = server_task.await;
    }

    info!(cached_names = services.cache.len(), "Server shutdown complete");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_name_server_flag_repeats_in_order() {
        let cli = Cli::parse_from([
            "indnsd",
            "-n",
            "10.0.0.1",
            "--name-server",
            "10.0.0.2:5353",
            "--config-dir",
            "/tmp/conf.d",
        ]);

        assert_eq!(cli.name_servers, vec!["10.0.0.1", "10.0.0.2:5353"]);
        assert_eq!(cli.config_dir.as_deref(), Some("/tmp/conf.d"));
        assert!(cli.config.is_none());
    }
}
