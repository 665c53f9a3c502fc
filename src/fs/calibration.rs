//! Encoder calibration constants.
//!
//! The calibration routine writes a small text file whose first data line
//! holds the distance-per-pulse constants of the left and right drive
//! encoders, optionally preceded by `//` annotation lines:
//!
//! ```text
//! //Encoder A (Left), Distance Travelled: 5ft, Number of encoder ticks: 1200, Calibration constant: 0.004166
//! //Encoder B (Right), Distance Travelled: 5ft, Number of encoder ticks: 1180, Calibration constant: 0.004237
//! 0.004166, 0.004237
//! ```
//!
//! Only reading is handled here. Failing to read the file is never fatal
//! for the robot: [`Calibration::load_or_default`] falls back to `1.0` for
//! both constants.

use std::{fs, path::Path};

use log::{info, warn};

use crate::{
    error::{PlaybookError, Result},
    fs::is_skipped_line,
};

/// Distance-per-pulse constants for the two drive encoders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub left:  f64,
    pub right: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            left:  1.0,
            right: 1.0,
        }
    }
}

impl Calibration {
    /// Reads the constants from `path`.
    pub fn load(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PlaybookError::file_access(path, e))?;
        Self::parse(&text, delimiter)
    }

    /// Parses the first non-comment line of `text`.
    pub fn parse(text: &str, delimiter: char) -> Result<Self> {
        let (index, line) = text
            .lines()
            .enumerate()
            .find(|(_, line)| !is_skipped_line(line))
            .ok_or_else(|| PlaybookError::parse(0, "no calibration line"))?;
        let line_no = index + 1;

        let mut fields = line.split(delimiter).map(str::trim);
        let mut next = |side: &str| -> Result<f64> {
            let field = fields
                .next()
                .ok_or_else(|| PlaybookError::parse(line_no, format!("missing {side} constant")))?;
            field.parse().map_err(|_| {
                PlaybookError::parse(line_no, format!("bad {side} constant {field:?}"))
            })
        };
        let left = next("left")?;
        let right = next("right")?;
        Ok(Calibration { left, right })
    }

    /// Reads the constants, logging and substituting `1.0` on any failure.
    pub fn load_or_default(path: impl AsRef<Path>, delimiter: char) -> Self {
        let path = path.as_ref();
        match Self::load(path, delimiter) {
            Ok(calibration) => {
                info!(
                    "Loaded encoder calibration {} / {} from {}",
                    calibration.left,
                    calibration.right,
                    path.display()
                );
                calibration
            }
            Err(e) => {
                warn!("Encoder calibration unavailable ({}), using 1.0", e);
                Calibration::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_after_annotations() {
        let text = "//Encoder A (Left), ticks: 1200\n//Encoder B (Right)\n0.25, 0.5\n9, 9\n";
        let cal = Calibration::parse(text, ',').unwrap();
        assert_eq!(
            cal,
            Calibration {
                left:  0.25,
                right: 0.5,
            }
        );
    }

    #[test]
    fn rejects_single_value() {
        let err = Calibration::parse("0.25\n", ',').unwrap_err();
        assert!(err.to_string().contains("right"));
    }

    #[test]
    fn rejects_empty_file() {
        assert!(Calibration::parse("// nothing\n\n", ',').is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.1;0.2").unwrap();
        let cal = Calibration::load(file.path(), ';').unwrap();
        assert_eq!(cal.left, 0.1);
        assert_eq!(cal.right, 0.2);
    }

    #[test]
    fn missing_or_bad_file_defaults_to_one() {
        assert_eq!(
            Calibration::load_or_default("/no/such/calibration.txt", ','),
            Calibration::default()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "abc, 0.2").unwrap();
        assert_eq!(
            Calibration::load_or_default(file.path(), ','),
            Calibration::default()
        );
    }
}
