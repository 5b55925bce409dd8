//! Lanka Meals gateway entry point
//!
//! Flags:
//! - `--env <name>` / `-e <name>`: config environment (default `dev`,
//!   loads `config/<name>.yaml`)
//! - `--port <port>`: override the configured gateway port

use lanka_meals::config::AppConfig;
use lanka_meals::{gateway, logging};

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
    let app_config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&app_config);

    let port = get_port_override().unwrap_or(app_config.gateway.port);
    tracing::info!("Starting Lanka Meals gateway in {} mode on port {}", env, port);

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(gateway::run_server(app_config, port));
}
