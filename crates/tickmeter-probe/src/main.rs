mod cli;
mod overlay;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tickmeter_engine::logging::{init_logging, LoggingConfig};
use tickmeter_engine::time::{FrameControl, TimerClock};
use tickmeter_engine::{FpsCounter, FpsReport};

use crate::cli::Cli;
use crate::overlay::{ConsoleOverlay, Summary};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    let run_for = cli.run_duration()?;
    let work = cli.work_per_frame()?;

    let clock = Rc::new(TimerClock::new(cli.hz).context("failed to create frame clock")?);
    let counter = FpsCounter::new();

    // The overlay is owned here; the counter only holds it weakly.
    let overlay = Rc::new(RefCell::new(ConsoleOverlay::default()));
    counter.subscribe_weak(&overlay);

    let summary = Rc::new(RefCell::new(Summary::default()));
    {
        let summary = summary.clone();
        counter.subscribe(move |report: FpsReport| summary.borrow_mut().record(report));
    }

    counter
        .start_secs(clock.clone(), cli.interval)
        .context("failed to start fps counter")?;

    println!();
    println!(
        "  tickmeter-probe: {:.1} Hz target, {:?} of work per frame, reporting every {:.2}s",
        cli.hz, work, cli.interval
    );
    println!();

    clock.run_for(run_for, |_| {
        if !work.is_zero() {
            std::thread::sleep(work);
        }
        FrameControl::Continue
    });

    counter.stop();

    let summary = summary.borrow();
    println!();
    match (summary.min, summary.max, summary.mean()) {
        (Some(min), Some(max), Some(mean)) => println!(
            "  {} report(s): min {min} / max {max} / mean {mean:.1} FPS",
            summary.reports
        ),
        _ => println!("  no reports: run shorter than one reporting interval"),
    }
    if let Some(last) = counter.last_report() {
        log::info!("final report: {last}");
    }

    Ok(())
}
