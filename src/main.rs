use shoal_manager::{Manager, ManagerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Shoal Manager - trading bot fleet manager

USAGE:
    shoal-manager [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 8080)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults
    shoal-manager

    # Run with config file
    shoal-manager --config config.json

    # Run with custom port
    PORT=3003 shoal-manager
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shoal_manager=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path);
        ManagerConfig::from_file(&path)?
    } else {
        tracing::info!("Using default configuration");
        ManagerConfig::default()
    };

    // Environment overrides win over file and defaults
    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port.parse().unwrap_or(config.server.port);
    }

    let manager = Manager::new(config);

    tracing::info!("Starting bot manager");
    tracing::info!(
        "REST API: http://{}:{}/bot_manager/",
        manager.config.server.host,
        manager.config.server.port
    );
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /bot_manager/healthcheck");
    tracing::info!("  POST /bot_manager/management/upload");
    tracing::info!("  POST /bot_manager/management/initiliaze");
    tracing::info!("  GET  /bot_manager/margin");
    tracing::info!("  GET  /bot_manager/orders/get");
    tracing::info!("  GET  /bot_manager/positions?type=paperTrade");

    manager.run().await
}
