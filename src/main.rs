mod base;
mod config;
mod difficulty;
mod error;
mod game;
mod records;
mod session;
mod stopwatch;
mod ui;
mod utils;

use config::GlobalConfig;
use log::{debug, error, warn};
use records::ScoreStore;
use session::Session;
use ui::console::Console;

fn main() -> crate::error::Result<()> {
    env_logger::init();

    let config = GlobalConfig::load().unwrap_or_else(|err| {
        warn!("Failed to load config ({err}), using default config.");
        GlobalConfig::default()
    });
    let store = ScoreStore::new(config.records_dir());
    debug!("Records directory: {}", store.dir().to_string_lossy());

    let mut session = Session::new(config, store)?;
    Console::new(std::io::stdin().lock(), std::io::stdout().lock()).run(&mut session)?;

    debug!("Saving config on exit: {:?}", session.config());
    if let Err(e) = session.config().save() {
        error!("Failed to save config: {e}");
    }
    Ok(())
}
