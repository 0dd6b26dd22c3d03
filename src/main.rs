use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use haustier_server::config::AppConfig;
use haustier_server::logging::{init_tracing, log_banner};
use haustier_server::password::PasswordManager;
use haustier_server::startup::build_app_from_config;

#[derive(Parser, Debug)]
#[command(name = "haustier-server")]
#[command(about = "REST and GraphQL service for pet records")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Print an Argon2id hash of the given password and exit
    #[arg(long, value_name = "PASSWORD")]
    hash_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(password) = args.hash_password {
        println!("{}", PasswordManager::new().hash_password(&password)?);
        return Ok(());
    }

    init_tracing();

    let mut app_config = if args.config == "config.yaml"
        && !std::path::Path::new("config.yaml").exists()
    {
        tracing::warn!("No config.yaml found, using the development configuration (in-memory SQLite)");
        AppConfig::default_config()
    } else {
        AppConfig::load_from_file(&args.config)
            .map_err(|e| format!("Failed to load configuration: {}", e))?
    };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid host address: {}, using 127.0.0.1", app_config.server.host);
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));

    log_banner(&app_config);
    let app = build_app_from_config(app_config).await?;

    tracing::info!("haustier-server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
