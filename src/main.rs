use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use movie_title_renamer::config::types::Config;
use movie_title_renamer::init;
use movie_title_renamer::menu::show_main_menu;
use movie_title_renamer::signal::setup_shutdown_signal;
use rust_i18n::t;

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();

    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
