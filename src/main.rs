//! optibank service entry point
//!
//! Bootstrap order: CLI env selection, YAML config, logging, storage
//! backend (PostgreSQL when configured, in-memory otherwise), gateway.

use std::sync::Arc;

use optibank::storage::TransactionalStorage;
use optibank::{MemoryStorage, PgStorage};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn main() {
    let env = get_env();
    let app_config = optibank::config::AppConfig::load(&env);
    let _log_guard = optibank::logging::init_logging(&app_config);

    tracing::info!("Starting optibank ledger in {} mode", env);

    let gateway_config = app_config.gateway.clone();
    let port = get_port_override().unwrap_or(gateway_config.port);
    let number_of_retries = app_config.number_of_retries;

    println!("Gateway will listen on {}:{}", gateway_config.host, port);
    println!("Retry budget per operation: {}", number_of_retries);

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let storage: Arc<dyn TransactionalStorage> = match &app_config.postgres_url {
            Some(url) => {
                println!("\n[Storage] Connecting to PostgreSQL...");
                let pg = match PgStorage::connect(url).await {
                    Ok(pg) => pg,
                    Err(e) => {
                        eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
                        std::process::exit(1);
                    }
                };
                if let Err(e) = pg.ensure_schema().await {
                    eprintln!("❌ FATAL: Failed to initialize schema: {}", e);
                    std::process::exit(1);
                }
                println!("✅ PostgreSQL storage ready");
                Arc::new(pg)
            }
            None => {
                println!("\n[Storage] No postgres_url configured, using in-memory storage");
                println!("⚠️  Accounts will not survive a restart");
                Arc::new(MemoryStorage::new())
            }
        };

        optibank::gateway::run_server(&gateway_config.host, port, storage, number_of_retries)
            .await;
    });
}
