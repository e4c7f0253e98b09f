//! EmberKV server binary.

use anyhow::Result;
use emberkv::{ConnectionHandler, Scheduler, DEFAULT_DATABASES, DEFAULT_HOST, DEFAULT_PORT, VERSION};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

struct Config {
    host: String,
    port: u16,
    databases: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            databases: DEFAULT_DATABASES,
        }
    }
}

impl Config {
    fn from_args() -> Result<Self> {
        let mut config = Self::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" => {
                    config.host = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--host requires a value"))?;
                }
                "--port" => {
                    config.port = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--port requires a value"))?
                        .parse()?;
                }
                "--databases" => {
                    config.databases = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--databases requires a value"))?
                        .parse()?;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }
        if config.databases == 0 {
            anyhow::bail!("--databases must be at least 1");
        }
        Ok(config)
    }
}

fn print_help() {
    println!("emberkv {VERSION} - in-memory multi-type key-value server");
    println!();
    println!("USAGE:");
    println!("    emberkv [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --host <HOST>         Listen address [default: {DEFAULT_HOST}]");
    println!("    --port <PORT>         Listen port [default: {DEFAULT_PORT}]");
    println!("    --databases <N>       Number of databases [default: {DEFAULT_DATABASES}]");
    println!("    -h, --help            Print help");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_args()?;

    let (scheduler, handle) = Scheduler::new(config.databases);
    tokio::spawn(scheduler.run());

    let bind = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind).await?;
    info!(version = VERSION, addr = %bind, databases = config.databases, "emberkv listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let handler = ConnectionHandler::new(stream, addr, handle.clone());
                tokio::spawn(async move {
                    if let Err(e) = handler.run().await {
                        error!(addr = %addr, error = %e, "connection error");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
