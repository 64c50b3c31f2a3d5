use crate::errors::FrameResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// One timed step of one contender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub contender: String,
    pub step: String,
    pub runs: usize,
    pub mean_secs: f64,
    pub min_secs: f64,
}

impl Measurement {
    pub fn from_durations(contender: &str, step: &str, durations: &[Duration]) -> Self {
        let secs: Vec<f64> = durations.iter().map(Duration::as_secs_f64).collect();
        let runs = secs.len();
        let mean_secs = if runs == 0 {
            0.0
        } else {
            secs.iter().sum::<f64>() / runs as f64
        };
        let min_secs = secs.iter().copied().reduce(f64::min).unwrap_or(0.0);
        Self {
            contender: contender.to_string(),
            step: step.to_string(),
            runs,
            mean_secs,
            min_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputFileStats {
    pub path: String,
    pub hash: String, // SHA256 hex
    pub size_bytes: u64,
}

impl InputFileStats {
    pub fn collect<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            path: path.display().to_string(),
            hash: compute_file_hash(path)?,
            size_bytes: std::fs::metadata(path)?.len(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub input: InputFileStats,
    pub measurements: Vec<Measurement>,
}

impl BenchReport {
    pub fn new(run_id: Uuid, input: InputFileStats) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            input,
            measurements: Vec::new(),
        }
    }

    pub fn record(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn find(&self, contender: &str, step: &str) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| m.contender == contender && m.step == step)
    }

    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> FrameResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

pub fn compute_file_hash<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FrameError;
    use tempfile::tempdir;

    #[test]
    fn test_measurement_stats() {
        let m = Measurement::from_durations(
            "RP",
            "copy",
            &[Duration::from_millis(30), Duration::from_millis(10)],
        );
        assert_eq!(m.runs, 2);
        assert!((m.mean_secs - 0.02).abs() < 1e-9);
        assert!((m.min_secs - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_file_hash_known_value() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, "abc")?;
        assert_eq!(
            compute_file_hash(&path)?,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let stats = InputFileStats::collect(&path)?;
        assert_eq!(stats.size_bytes, 3);
        Ok(())
    }

    #[test]
    fn test_report_written_as_json() -> FrameResult<()> {
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "a\n1\n")?;

        let mut report = BenchReport::new(Uuid::new_v4(), InputFileStats::collect(&input)?);
        report.record(Measurement::from_durations("RP", "read_csv", &[Duration::from_millis(5)]));
        assert!(report.find("RP", "read_csv").is_some());
        assert!(report.find("POLARS", "read_csv").is_none());

        let out = dir.path().join("report.json");
        report.write_report(&out)?;
        let back: BenchReport = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.measurements, report.measurements);
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_report_write_failure_is_reported() -> FrameResult<()> {
        if !Path::new("/dev/full").exists() {
            return Ok(());
        }
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "a\n1\n")?;

        // Every write to /dev/full fails with ENOSPC; the report fits in the
        // buffer, so only the flush can surface it.
        let report = BenchReport::new(Uuid::new_v4(), InputFileStats::collect(&input)?);
        assert!(matches!(
            report.write_report("/dev/full"),
            Err(FrameError::IoError(_))
        ));
        Ok(())
    }
}
