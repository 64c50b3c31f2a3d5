use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use rusty_pandas::plan::{BenchPlan, ContenderKind, PlanOverrides, Routine};
use rusty_pandas::runner::{self, RunOptions};
use rusty_pandas::{io, Axis, FrameError, Reduction};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ValueEnum, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "rusty-pandas")]
#[command(version)]
#[command(about = "Parallel numeric dataframes, timed against polars", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (Info -> Debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Silence all logs and the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format (text or json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Time paired operations on both engines
    Bench {
        /// YAML bench plan
        #[arg(long, value_name = "PLAN_FILE")]
        plan: Option<PathBuf>,

        /// CSV file to load (overrides the plan)
        #[arg(long, value_name = "CSV")]
        input: Option<PathBuf>,

        /// Routine to run; repeat for several
        #[arg(long = "routine", value_enum)]
        routines: Vec<Routine>,

        /// Run every routine
        #[arg(long, conflicts_with = "routines")]
        all: bool,

        /// Timed calls per step
        #[arg(long)]
        repeat: Option<usize>,

        /// Engine to time; repeat for several
        #[arg(long = "contender", value_enum)]
        contenders: Vec<ContenderKind>,

        /// Write a JSON report here
        #[arg(long, value_name = "REPORT_FILE")]
        report: Option<PathBuf>,
    },
    /// Load a CSV file and print it
    Show {
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Only print the first N rows
        #[arg(long)]
        head: Option<usize>,
    },
    /// Reduce a CSV file along an axis and print the result
    Reduce {
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        #[arg(long, value_enum)]
        op: Reduction,

        /// 0 reduces each column, 1 reduces each row
        #[arg(long, default_value_t = 0)]
        axis: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // RUSTY_PANDAS_LOG > CLI args
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUSTY_PANDAS_LOG")
        .from_env_lossy();

    let run_id = Uuid::new_v4();

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .with_span_list(false)
                .with_current_span(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let _span = tracing::info_span!("root", run_id = %run_id).entered();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Bench {
            plan,
            input,
            routines,
            all,
            repeat,
            contenders,
            report,
        } => {
            let base = match plan {
                Some(path) => BenchPlan::from_path(path)?,
                None => BenchPlan::default(),
            };
            let plan = base.with_overrides(PlanOverrides {
                input,
                routines,
                all_routines: all,
                repeat,
                contenders,
            })?;
            let options = RunOptions { quiet: cli.quiet };
            let bench = runner::run_bench(&plan, run_id, &options, &mut out)?;
            if let Some(path) = report {
                bench.write_report(&path)?;
                info!("Report written to {:?}", path);
            }
        }
        Commands::Show { csv, head } => {
            let df = io::read_csv(&csv)?;
            let df = match head {
                Some(n) => df.head(n),
                None => df,
            };
            writeln!(out, "{}", df).map_err(FrameError::from)?;
        }
        Commands::Reduce { csv, op, axis } => {
            let axis = Axis::try_from(axis)?;
            let df = io::read_csv(&csv)?;
            writeln!(out, "{}", op.apply(&df, axis)).map_err(FrameError::from)?;
        }
    }

    Ok(())
}
