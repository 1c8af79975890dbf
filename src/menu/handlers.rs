use crate::component::MovieRenamer;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn run_movie_renamer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    // 前一次執行的中斷不影響本次
    shutdown_signal.store(false, Ordering::SeqCst);

    let mut renamer = MovieRenamer::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = renamer.run() {
        eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
