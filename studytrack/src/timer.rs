//! Interactive study timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Run the timer until Ctrl-C, showing elapsed time. Returns whole elapsed
/// minutes (seconds floor away, matching manual entry granularity).
pub fn run_timer() -> Result<u32> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    let started = Instant::now();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} studying for {msg}  (Ctrl-C to finish)")
            .context("invalid spinner template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    while running.load(Ordering::SeqCst) {
        let secs = started.elapsed().as_secs();
        spinner.set_message(format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ));
        std::thread::sleep(Duration::from_millis(200));
    }

    spinner.finish_and_clear();
    Ok((started.elapsed().as_secs() / 60) as u32)
}
