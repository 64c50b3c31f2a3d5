use crate::errors::{FrameError, FrameResult};
use crate::frame::DataFrame;
use crate::scan::{self, LOWER_PAR_BOUND};
use crate::series::Series;
use polars::prelude::{self as pl, col, Column, DataType, LazyCsvReader, LazyFileListReader};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a CSV file with the engine. Fields that are not numbers become NaN.
pub fn read_csv<P: AsRef<Path>>(path: P) -> FrameResult<DataFrame> {
    let path = path.as_ref();
    let file = fs::read_to_string(path)?;
    let df = parse_csv(&file, &path.display().to_string())?;
    debug!(path = %path.display(), rows = df.height(), cols = df.width(), "read csv");
    Ok(df)
}

/// Parses CSV text. `source` only names the input in errors.
pub fn parse_csv(text: &str, source: &str) -> FrameResult<DataFrame> {
    let lines: Vec<&str> = text.par_lines().collect();
    let mut numbered = lines
        .iter()
        .enumerate()
        .skip_while(|(_, l)| l.trim().is_empty());

    let (_, header_line) = numbered
        .next()
        .ok_or_else(|| FrameError::EmptyInput(source.to_string()))?;
    let header_row: Vec<String> = split_line(header_line)
        .into_iter()
        .map(|h| h.trim().trim_matches('"').to_string())
        .collect();
    let width = header_row.len();

    let data_lines: Vec<(usize, &str)> = numbered
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, *l))
        .collect();

    let rows: Vec<Series> = data_lines
        .par_iter()
        .map(|&(line_no, line)| parse_row(line_no, line, width))
        .collect::<FrameResult<Vec<Series>>>()?;

    if rows.is_empty() {
        return DataFrame::new(vec![Series::default(); width], Some(header_row));
    }
    DataFrame::from_rows(rows, Some(header_row))
}

fn split_line(line: &str) -> Vec<&str> {
    if line.len() >= LOWER_PAR_BOUND {
        scan::par_split(line, ',')
    } else {
        line.split(',').collect()
    }
}

fn parse_row(line_no: usize, line: &str, width: usize) -> FrameResult<Series> {
    let fields = split_line(line);
    if fields.len() > width {
        return Err(FrameError::RaggedRow {
            line: line_no,
            expected: width,
            found: fields.len(),
        });
    }
    let mut values: Vec<f64> = fields
        .iter()
        .map(|elt| elt.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    values.resize(width, f64::NAN);
    Ok(Series::new(values))
}

fn is_csv(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "csv")
}

fn read_all(paths: &[PathBuf]) -> FrameResult<Vec<DataFrame>> {
    paths.par_iter().map(read_csv).collect()
}

/// Reads every `.csv` file directly inside `folder`, in path order.
pub fn read_csv_from_folder<P: AsRef<Path>>(folder: P) -> FrameResult<Vec<DataFrame>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| is_csv(p));
    paths.sort();
    read_all(&paths)
}

/// Reads every `.csv` file matching `folder` followed directly by `pattern`,
/// in path order. No separator is inserted, so `folder` may end in a file
/// name prefix such as `data/run_`.
pub fn read_csv_by_glob<P: AsRef<Path>>(folder: P, pattern: &str) -> FrameResult<Vec<DataFrame>> {
    let full = format!("{}{}", folder.as_ref().display(), pattern);
    let mut paths: Vec<PathBuf> = glob::glob(&full)?.collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| is_csv(p));
    paths.sort();
    read_all(&paths)
}

/// Writes the header and every row. Missing values are written as `NaN`.
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> FrameResult<()> {
    let header = df.header().join(",");
    let body: Vec<String> = df.rows().par_iter().map(|r| r.join(",")).collect();
    let mut out = String::with_capacity(header.len() + body.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
    out.push_str(&header);
    out.push('\n');
    for line in body {
        out.push_str(&line);
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Reads a CSV file with polars and casts every column to `Float64`.
/// Every column is read as text first, so a stray `NA` anywhere in the file
/// becomes null instead of failing type inference.
pub fn read_reference_csv<P: AsRef<Path>>(path: P) -> FrameResult<pl::DataFrame> {
    let df = LazyCsvReader::new(path.as_ref())
        .with_infer_schema_length(Some(0))
        .finish()?
        .select([col("*").cast(DataType::Float64)])
        .collect()?;
    Ok(df)
}

/// Converts an engine frame into a polars frame with one `Float64` column
/// per engine column. NaN stays NaN.
pub fn to_polars(df: &DataFrame) -> FrameResult<pl::DataFrame> {
    let columns: Vec<Column> = df
        .header()
        .iter()
        .zip(df.columns())
        .map(|(name, values)| Column::new(name.as_str().into(), values.to_vec()))
        .collect();
    Ok(pl::DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_csv_io() -> FrameResult<()> {
        let dir = tempdir()?;
        let csv_path = dir.path().join("test.csv");
        fs::write(&csv_path, "a,b,c\n1,2,3\n4,5,6")?;

        let df = read_csv(&csv_path)?;
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.header(), &["a", "b", "c"]);
        assert_eq!(df[1], Series::from(vec![4, 5, 6]));
        Ok(())
    }

    #[test]
    fn test_parse_non_numeric_and_short_rows() -> FrameResult<()> {
        let df = parse_csv("\"x\", y ,z\r\n1,NA,3\r\n\r\n4,5\r\n", "inline")?;
        assert_eq!(df.header(), &["x", "y", "z"]);
        assert_eq!(df.shape(), (2, 3));
        assert!(df[0].values()[1].is_nan());
        assert!(df[1].values()[2].is_nan());
        assert_eq!(df.loc_col("x")?, &Series::from(vec![1, 4]));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_long_rows() {
        let err = parse_csv("a,b\n1,2\n\n1,2,3\n", "inline").unwrap_err();
        assert!(matches!(
            err,
            FrameError::RaggedRow { line: 4, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_csv("\n\n", "inline"), Err(FrameError::EmptyInput(_))));
        let header_only = parse_csv("a,b\n", "inline").unwrap();
        assert_eq!(header_only.shape(), (0, 2));
    }

    #[test]
    fn test_parse_wide_line() -> FrameResult<()> {
        let width = 3000;
        let header: Vec<String> = (0..width).map(|i| format!("c{}", i)).collect();
        let row: Vec<String> = (0..width).map(|i| i.to_string()).collect();
        let text = format!("{}\n{}\n", header.join(","), row.join(","));
        let df = parse_csv(&text, "inline")?;
        assert_eq!(df.shape(), (1, width));
        assert_eq!(df.loc_col("c2999")?.iloc(0), Some(2999.0));
        Ok(())
    }

    #[test]
    fn test_to_csv_round_trip() -> FrameResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        let df = DataFrame::from(vec![vec![1.5, f64::NAN], vec![3.0, 4.0]]);
        df.to_csv(&path)?;

        assert_eq!(fs::read_to_string(&path)?, "0,1\n1.5,NaN\n3,4\n");
        let back = read_csv(&path)?;
        assert_eq!(back.shape(), (2, 2));
        assert!(back[0].values()[1].is_nan());
        Ok(())
    }

    #[test]
    fn test_folder_and_glob() -> FrameResult<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b_SetA.csv"), "v\n2")?;
        fs::write(dir.path().join("a_SetA.csv"), "v\n1")?;
        fs::write(dir.path().join("c_SetB.csv"), "v\n3")?;
        fs::write(dir.path().join("notes.txt"), "v\n9")?;

        let all = read_csv_from_folder(dir.path())?;
        let firsts: Vec<f64> = all.iter().map(|d| d[0].values()[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);

        let set_a = read_csv_by_glob(dir.path(), "/*SetA*")?;
        assert_eq!(set_a.len(), 2);
        assert_eq!(set_a[1][0], Series::from(vec![2]));
        Ok(())
    }

    #[test]
    fn test_glob_folder_is_a_prefix() -> FrameResult<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("data_a.csv"), "v\n1")?;
        fs::write(dir.path().join("data_b.csv"), "v\n2")?;
        fs::write(dir.path().join("other.csv"), "v\n3")?;

        let prefix = dir.path().join("data_");
        let frames = read_csv_by_glob(&prefix, "*.csv")?;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1][0], Series::from(vec![2]));
        Ok(())
    }

    #[test]
    fn test_bad_glob_pattern() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_csv_by_glob(dir.path(), "[unclosed"),
            Err(FrameError::PatternError(_))
        ));
    }

    #[test]
    fn test_to_polars_keeps_names_and_values() -> FrameResult<()> {
        let df = parse_csv("a,b\n1,2\n3,\n", "inline")?;
        let pdf = to_polars(&df)?;
        assert_eq!(pdf.shape(), (2, 2));
        let b: Vec<Option<f64>> = pdf.column("b")?.f64()?.into_iter().collect();
        assert_eq!(b[0], Some(2.0));
        assert!(b[1].is_some_and(f64::is_nan));
        Ok(())
    }

    #[test]
    fn test_reference_reader_casts_to_float() -> FrameResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ref.csv");
        fs::write(&path, "a,name\n1,x\n2,y\n")?;

        let df = read_reference_csv(&path)?;
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a")?.dtype(), &DataType::Float64);
        assert_eq!(df.column("name")?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_reference_reader_late_na() -> FrameResult<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flights.csv");
        let mut text = String::from("DepTime,ArrDelay\n");
        for i in 0..300 {
            if i == 250 {
                text.push_str("NA,NA\n");
            } else {
                text.push_str(&format!("{},{}\n", 1200 + i, i % 17));
            }
        }
        fs::write(&path, text)?;

        let engine = read_csv(&path)?;
        let reference = read_reference_csv(&path)?;
        assert_eq!(engine.shape(), (300, 2));
        assert_eq!(reference.shape(), (300, 2));
        assert_eq!(reference.column("DepTime")?.dtype(), &DataType::Float64);
        assert_eq!(reference.column("DepTime")?.null_count(), 1);
        assert_eq!(reference.column("ArrDelay")?.f64()?.get(0), Some(0.0));
        Ok(())
    }
}
