use std::process;

use signout_core::{cli::run_cli, config::ConfigManager, init};

fn main() {
    let log_filter = ConfigManager::new()
        .and_then(|manager| manager.load())
        .ok()
        .and_then(|config| config.log_filter);
    init(log_filter.as_deref());

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
