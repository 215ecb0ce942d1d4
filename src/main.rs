//! Aurora Monitoring Service - Main Daemon
//!
//! Polls NOAA SWPC every minute and sends a Pushover notification the first
//! time the local aurora intensity or the planetary K-index crosses one of
//! its levels. Crossed levels are forgotten every hour at night and every
//! four hours during the day so a still-active storm is reported again.
//!
//! Usage:
//!   cargo run --release
//!
//! Environment:
//!   API_KEY        - Pushover application token
//!   USER_KEY       - Pushover user key
//!   AUROMON_CONFIG - configuration file (default: auromon.toml)
//!   RUST_LOG       - log filter (default: auromon_service=info)

use std::path::Path;
use std::sync::atomic::AtomicBool;

use auromon_service::config::{Credentials, MonitorConfig};
use auromon_service::ingest::swpc::SwpcClient;
use auromon_service::monitor::Monitor;
use auromon_service::notify::PushoverNotifier;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    println!("🌌 Aurora Monitoring Service");
    println!("============================\n");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "auromon_service=info".into()),
        )
        .init();

    let config_path = MonitorConfig::default_path();
    let config = match MonitorConfig::load_or_default(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            eprintln!("Set API_KEY and USER_KEY (Pushover) in the environment or in .env\n");
            std::process::exit(1);
        }
    };

    let notifier = PushoverNotifier::new(&credentials.api_key, &credentials.user_key);
    let mut monitor = Monitor::new(config, SwpcClient::new(), notifier);

    let config = monitor.config();
    println!("   Observer: lat {} / lon {}", config.latitude, config.longitude);
    println!("   Language: {}", config.language);
    println!("   Check interval: {} s", config.check_interval_secs);
    println!(
        "   Reset interval: {} s (night) / {} s (day)",
        config.reset_delay_night_secs, config.reset_delay_day_secs
    );
    println!("   Press Ctrl+C to stop\n");

    // Never raised here: Ctrl+C ends the process, and all state is in memory.
    let stop = AtomicBool::new(false);
    if let Err(e) = monitor.run(&stop) {
        error!(error = %e, "monitor stopped");
        eprintln!("\n❌ Monitor error: {}", e);
        std::process::exit(1);
    }
}
