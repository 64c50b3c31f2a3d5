use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gen_csv")]
#[command(about = "Write a deterministic numeric CSV file for benchmarking", long_about = None)]
struct Args {
    /// Output CSV path
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Number of data rows
    #[arg(value_name = "ROWS")]
    rows: usize,

    /// Number of columns
    #[arg(value_name = "COLS")]
    cols: usize,
}

// Header is `c0..cN`. Every 97th cell is left empty so missing-value paths
// get exercised.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file =
        File::create(&args.path).with_context(|| format!("creating {}", args.path.display()))?;
    let mut out = BufWriter::new(file);

    let header: Vec<String> = (0..args.cols).map(|c| format!("c{}", c)).collect();
    writeln!(out, "{}", header.join(","))?;

    for r in 0..args.rows {
        let line: Vec<String> = (0..args.cols)
            .map(|c| {
                if (r * args.cols + c) % 97 == 96 {
                    String::new()
                } else {
                    let v = ((r * 31 + c * 17) % 2001) as f64 / 10.0 - 100.0;
                    v.to_string()
                }
            })
            .collect();
        writeln!(out, "{}", line.join(","))?;
    }
    out.flush()?;

    println!(
        "wrote {} rows x {} columns to {}",
        args.rows,
        args.cols,
        args.path.display()
    );
    Ok(())
}
