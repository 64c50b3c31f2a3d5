use crate::contender::{self, Contender};
use crate::errors::{FrameError, FrameResult};
use crate::observability::{BenchReport, InputFileStats, Measurement};
use crate::plan::BenchPlan;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

pub const READ_STEP: &str = "read_csv";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Hide the progress spinner.
    pub quiet: bool,
}

/// Times a single call.
pub fn time_call<T>(f: impl FnOnce() -> T) -> (Duration, T) {
    let start = Instant::now();
    let value = f();
    (start.elapsed(), value)
}

/// Runs `f` `repeat` times (at least once) and keeps the last value.
fn measure<T>(repeat: usize, mut f: impl FnMut() -> FrameResult<T>) -> FrameResult<(Vec<Duration>, T)> {
    let (elapsed, result) = time_call(&mut f);
    let mut value = result?;
    let mut durations = vec![elapsed];
    for _ in 1..repeat {
        let (elapsed, result) = time_call(&mut f);
        value = result?;
        durations.push(elapsed);
    }
    Ok((durations, value))
}

fn progress(steps: usize, options: &RunOptions) -> FrameResult<ProgressBar> {
    if options.quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(steps as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
            .map_err(|e| FrameError::Unknown(e.into()))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Writes the two timing lines for one step and records it.
fn emit(
    pb: &ProgressBar,
    out: &mut impl Write,
    report: &mut BenchReport,
    name: &str,
    label: &str,
    step: &str,
    durations: &[Duration],
) -> FrameResult<()> {
    let m = Measurement::from_durations(name, step, durations);
    pb.suspend(|| -> std::io::Result<()> {
        writeln!(out, "{}: {}", name, label)?;
        if m.runs > 1 {
            writeln!(
                out,
                "{}: took {:.6} second (best {:.6} of {} runs)",
                name, m.mean_secs, m.min_secs, m.runs
            )
        } else {
            writeln!(out, "{}: took {:.6} second", name, m.mean_secs)
        }
    })?;
    debug!(contender = name, step, mean_secs = m.mean_secs, "step timed");
    report.record(m);
    pb.inc(1);
    Ok(())
}

/// Loads the input once per contender, then runs every routine on every
/// contender, printing a label and a timing line for each call.
pub fn run_bench(
    plan: &BenchPlan,
    run_id: Uuid,
    options: &RunOptions,
    out: &mut impl Write,
) -> FrameResult<BenchReport> {
    info!("Benchmarking {:?}", plan.input);
    let input = InputFileStats::collect(&plan.input)?;
    info!(size_bytes = input.size_bytes, hash = %input.hash, "Input file");
    let mut report = BenchReport::new(run_id, input);

    let steps = plan.contenders.len() * (1 + plan.routines.len());
    let pb = progress(steps, options)?;

    let mut loaded: Vec<Box<dyn Contender>> = Vec::with_capacity(plan.contenders.len());
    for &kind in &plan.contenders {
        pb.set_message(format!("{}: reading CSV", kind.label()));
        let (durations, contender) = measure(plan.repeat, || contender::load(kind, &plan.input))?;
        emit(&pb, out, &mut report, kind.label(), "Reading CSV", READ_STEP, &durations)?;
        loaded.push(contender);
    }

    for &routine in &plan.routines {
        for contender in &loaded {
            pb.set_message(format!("{}: {}", contender.name(), routine));
            let (durations, cells) = measure(plan.repeat, || contender.run(routine))?;
            debug!(contender = contender.name(), %routine, cells, "routine finished");
            emit(
                &pb,
                out,
                &mut report,
                contender.name(),
                routine.label(),
                &routine.to_string(),
                &durations,
            )?;
        }
    }

    pb.finish_and_clear();
    info!("Benchmark completed: {} measurements", report.measurements.len());
    Ok(report)
}
