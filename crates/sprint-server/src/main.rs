//! Thesis Sprint server binary
//!
//! Starts the JSON API over an in-memory store.

use anyhow::Context;
use sprint_server::{config::AppConfig, init_tracing, start_server};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        AppConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using defaults with the mock LLM provider");
        eprintln!("Usage: thesis-sprint --config <path-to-config.toml>");
        eprintln!();
        AppConfig::default_config()
    };

    init_tracing(&config.log_level);
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Thesis Sprint - VC sourcing backend");
    println!();
    println!("USAGE:");
    println!("    thesis-sprint --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    thesis-sprint --config config/thesis-sprint.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port: where to listen (default 127.0.0.1:8080)");
    println!("    - log_level: default log filter when RUST_LOG is unset");
    println!("    - seed_demo: load the demo sprints at startup");
    println!("    - [llm]: provider (anthropic|mock), model, api_key_env, timeout_secs, max_retries");
    println!("    - [research]: call_timeout_secs, target_count, top_cap");
    println!("    - [rules]: trust ranks, freshness and fit thresholds");
    println!();
}
