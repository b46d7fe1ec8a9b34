//! hark console entry point.
//!
//! Registers the demo command set and dispatches lines read from stdin as
//! the configured user. Pass a TOML config path as the first argument or in
//! `HARK_CONFIG`.

mod commands;
mod console;
mod session;
mod users;

use std::path::Path;

use anyhow::Result;

use hark_types::ConsoleConfig;

use console::WriterOutput;
use session::Session;
use users::UserDatabase;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HARK_CONFIG").ok());
    let (config, load_error) = match &config_path {
        Some(path) => match ConsoleConfig::load(Path::new(path)) {
            Ok(config) => (config, None),
            Err(e) => (ConsoleConfig::default(), Some(e)),
        },
        None => (ConsoleConfig::default(), None),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();
    if let Some(e) = load_error {
        log::warn!("Using default config: {e}");
    }

    let users = if config.users.is_empty() {
        UserDatabase::default()
    } else {
        UserDatabase::from_seeds(&config.users)?
    };
    log::info!("Loaded {} users", users.count());
    let mut session = Session::new(users, &config.user)?;

    let tree = commands::build_tree(config.case_insensitive)?;
    log::info!(
        "Registered {} commands, acting as {}",
        tree.commands().len(),
        config.user
    );

    let stdin = std::io::stdin();
    let mut out = WriterOutput::new(std::io::stdout().lock());
    let count = console::run(&tree, &mut session, &config, stdin.lock(), &mut out)?;
    log::info!("Processed {count} lines");
    Ok(())
}
