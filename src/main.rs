mod cli;
mod clock;
mod config;
mod highlight;
mod incidents;
mod model;
mod playback;
mod script;
mod storage;
mod timeline;
mod view;

use std::process;

use config::Config;
use storage::SessionStore;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let path = SessionStore::default_path().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let mut store = match SessionStore::open(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open session: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config, &mut store) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
