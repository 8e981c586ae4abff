//! Loading observed samples from text files.
//!
//! Each non-blank line holds one or more numbers separated by commas,
//! semicolons or whitespace. Lines starting with `#` are comments. A first
//! line with no numbers on it is treated as a header and skipped.
//!
//! ```ignore
//! use bayes_ttest::data::load_sample;
//! use std::path::Path;
//!
//! let treated = load_sample(Path::new("treated.csv"))?;
//! let control = load_sample(Path::new("control.csv"))?;
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use bayes_ttest_core::Sample;

/// Errors that can occur while loading a sample.
#[derive(Debug)]
pub enum DataError {
    /// IO error reading the file.
    Io(std::io::Error),

    /// A token is not a finite number.
    InvalidValue {
        /// Line number where the invalid value was found (1-indexed).
        line: usize,
        /// The offending token.
        value: String,
    },

    /// The input contained no numbers.
    Empty,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::InvalidValue { line, value } => {
                write!(f, "Invalid value at line {}: '{}'", line, value)
            }
            DataError::Empty => write!(f, "No observations found"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e)
    }
}

/// Load a sample from a file.
pub fn load_sample(path: &Path) -> Result<Sample, DataError> {
    read_sample(File::open(path)?)
}

/// Parse a sample from in-memory text.
pub fn parse_sample(text: &str) -> Result<Sample, DataError> {
    read_sample(text.as_bytes())
}

/// Read a sample from any reader.
pub fn read_sample(reader: impl Read) -> Result<Sample, DataError> {
    let reader = BufReader::new(reader);
    let mut values = Vec::new();
    let mut seen_content = false;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let is_first = !seen_content;
        seen_content = true;

        let parsed: Vec<(&str, Option<f64>)> = line
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|token| {
                let value = token.parse::<f64>().ok().filter(|v| v.is_finite());
                (token, value)
            })
            .collect();

        // Header row: nothing on it is a number
        if is_first && parsed.iter().all(|(_, value)| value.is_none()) {
            continue;
        }

        for (token, value) in parsed {
            match value {
                Some(v) => values.push(v),
                None => {
                    return Err(DataError::InvalidValue {
                        line: line_num + 1,
                        value: token.to_string(),
                    })
                }
            }
        }
    }

    if values.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(Sample::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_mixed_separators() {
        let sample = parse_sample("1.5, 2\n\n# comment\n3;4 5\n").unwrap();
        assert_eq!(sample.values(), &[1.5, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_header_is_skipped() {
        let sample = parse_sample("value\n0.1\n0.2\n").unwrap();
        assert_eq!(sample.values(), &[0.1, 0.2]);
    }

    #[test]
    fn test_partially_numeric_first_line_is_an_error() {
        let err = parse_sample("1.5, 2.0, 3.x\n4.0\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { line: 1, ref value } if value == "3.x"));

        let err = parse_sample("# units: ms\ngroup 2.5\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { line: 2, ref value } if value == "group"));
    }

    #[test]
    fn test_invalid_value_reports_line() {
        let err = parse_sample("1.0\n2.0\nabc\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { line: 3, ref value } if value == "abc"));

        let err = parse_sample("1.0\nNaN\n").unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_sample("# nothing\n\n"), Err(DataError::Empty)));
        assert!(matches!(parse_sample("header\n"), Err(DataError::Empty)));
    }

    #[test]
    fn test_load_sample_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x").unwrap();
        writeln!(file, "1").unwrap();
        writeln!(file, "2.5").unwrap();
        let sample = load_sample(file.path()).unwrap();
        assert_eq!(sample.values(), &[1.0, 2.5]);

        assert!(matches!(
            load_sample(Path::new("/nonexistent/bayes-ttest.csv")),
            Err(DataError::Io(_))
        ));
    }
}
