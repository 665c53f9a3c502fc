//! Robot configuration.
//!
//! The configuration surface is a flat set of camelCase keys. It can be
//! loaded from a TOML file:
//!
//! ```toml
//! gyroPID = [0.08, 0.01, 0.3, 0.1]
//! driveSpeed = 0.3
//! turnSpeed = 0.25
//! playDir = "/home/lvuser/plays"
//! playToUse = "Left side two cubes"
//! doRobotLogging = false
//! ```
//!
//! or built from an already resolved key/value map with
//! [`Config::from_map`]. Missing keys take the defaults documented on each
//! field.

use std::{collections::HashMap, fs, path::{Path, PathBuf}, str::FromStr};

use log::debug;
use serde::Deserialize;

use crate::{
    error::{PlaybookError, Result},
    motion::{
        manager::MotionMode,
        pid::{PidGains, pid::DEFAULT_MIN_DONE_CYCLES},
    },
};

/// Typed view of the robot configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Heading PID gains `[P, I, D, epsilon]` (default `[0.08, 0.01, 0.3, 0.1]`).
    #[serde(rename = "gyroPID")]
    pub gyro_pid:         PidGains,
    /// Distance PID gains. Falls back to `gyroPID` when absent.
    #[serde(rename = "encoderPID")]
    pub encoder_pid:      Option<PidGains>,
    /// Output limit for drive maneuvers, also the dead-reckoning drive speed (default 0.25).
    pub drive_speed:      f64,
    /// Output limit for turn maneuvers, also the dead-reckoning turn speed (default 0.25).
    pub turn_speed:       f64,
    /// Left-side bias added to drive-straight PID output (default 0.0038).
    pub drive_trim:       f64,
    /// PID done range. Defaults to the epsilon of the gains in use.
    pub done_range:       Option<f64>,
    /// Consecutive in-range evaluations before a PID maneuver is done (default 10).
    pub min_done_cycles:  u32,
    /// Use PID maneuvers (`true`) or dead reckoning (`false`) during replay (default `true`).
    #[serde(rename = "usePID")]
    pub use_pid:          bool,
    /// Directory scanned for plays (default `plays`).
    pub play_dir:         PathBuf,
    /// File extension of play files, without the dot (default `auto`).
    pub play_extension:   String,
    /// Name of the play to run in autonomous.
    pub play_to_use:      Option<String>,
    /// Field delimiter of play and calibration files (default `,`).
    pub delimiter:        char,
    /// Record operator input to a play file during driver control (default `false`).
    pub do_robot_logging: bool,
    /// Where recorded plays are written (default `recorded.auto`).
    pub output_play_file: PathBuf,
    /// Encoder calibration constants file (default `calibration.txt`).
    pub calibration_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gyro_pid:         PidGains::new(0.08, 0.01, 0.3, 0.1),
            encoder_pid:      None,
            drive_speed:      0.25,
            turn_speed:       0.25,
            drive_trim:       0.0038,
            done_range:       None,
            min_done_cycles:  DEFAULT_MIN_DONE_CYCLES,
            use_pid:          true,
            play_dir:         PathBuf::from("plays"),
            play_extension:   String::from("auto"),
            play_to_use:      None,
            delimiter:        ',',
            do_robot_logging: false,
            output_play_file: PathBuf::from("recorded.auto"),
            calibration_file: PathBuf::from("calibration.txt"),
        }
    }
}

impl Config {
    /// Loads a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| PlaybookError::file_access(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> { Ok(toml::from_str(text)?) }

    /// Builds a configuration from string values keyed by their
    /// configuration names.
    ///
    /// Gain lists are comma separated (`"0.08, 0.01, 0.3, 0.1"`). Unknown
    /// keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        let mut config = Config::default();
        for (key, value) in map {
            let key = key.as_str();
            let value = value.trim();
            match key {
                "gyroPID" => config.gyro_pid = parse_gains(key, value)?,
                "encoderPID" => config.encoder_pid = Some(parse_gains(key, value)?),
                "driveSpeed" => config.drive_speed = parse_value(key, value)?,
                "turnSpeed" => config.turn_speed = parse_value(key, value)?,
                "driveTrim" => config.drive_trim = parse_value(key, value)?,
                "doneRange" => config.done_range = Some(parse_value(key, value)?),
                "minDoneCycles" => config.min_done_cycles = parse_value(key, value)?,
                "usePID" => config.use_pid = parse_value(key, value)?,
                "playDir" => config.play_dir = PathBuf::from(value),
                "playExtension" => {
                    config.play_extension = value.trim_start_matches('.').to_string()
                }
                "playToUse" => config.play_to_use = Some(value.to_string()),
                "delimiter" => config.delimiter = parse_value(key, value)?,
                "doRobotLogging" => config.do_robot_logging = parse_value(key, value)?,
                "outputPlayFile" => config.output_play_file = PathBuf::from(value),
                "calibrationFile" => config.calibration_file = PathBuf::from(value),
                _ => debug!("Ignoring unknown configuration key {}", key),
            }
        }
        Ok(config)
    }

    /// Gains of the distance axis.
    pub fn encoder_gains(&self) -> PidGains { self.encoder_pid.unwrap_or(self.gyro_pid) }

    /// Motion mode used when replaying plays.
    pub fn motion_mode(&self) -> MotionMode {
        if self.use_pid {
            MotionMode::Pid
        } else {
            MotionMode::DeadReckoning
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PlaybookError::Config(format!("{key}: cannot parse {value:?}")))
}

fn parse_gains(key: &str, value: &str) -> Result<PidGains> {
    let mut gains: heapless::Vec<f64, 4> = heapless::Vec::new();
    for part in value.split(',') {
        let number = parse_value(key, part.trim())?;
        gains
            .push(number)
            .map_err(|_| PlaybookError::Config(format!("{key}: expected 4 values")))?;
    }
    match gains.as_slice() {
        &[kp, ki, kd, epsilon] => Ok(PidGains::new(kp, ki, kd, epsilon)),
        _ => Err(PlaybookError::Config(format!("{key}: expected 4 values"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.drive_speed, 0.25);
        assert_eq!(config.turn_speed, 0.25);
        assert_eq!(config.encoder_gains(), config.gyro_pid);
        assert_eq!(config.motion_mode(), MotionMode::Pid);
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn toml_uses_camel_case_keys() {
        let config = Config::from_toml_str(
            r#"
            gyroPID = [1.0, 0.0, 0.5, 2.0]
            driveSpeed = 0.4
            usePID = false
            playDir = "/home/lvuser/plays"
            playToUse = "Center"
            doRobotLogging = true
            "#,
        )
        .unwrap();
        assert_eq!(config.gyro_pid, PidGains::new(1.0, 0.0, 0.5, 2.0));
        assert_eq!(config.drive_speed, 0.4);
        assert_eq!(config.turn_speed, 0.25);
        assert_eq!(config.motion_mode(), MotionMode::DeadReckoning);
        assert_eq!(config.play_dir, PathBuf::from("/home/lvuser/plays"));
        assert_eq!(config.play_to_use.as_deref(), Some("Center"));
        assert!(config.do_robot_logging);
    }

    #[test]
    fn toml_rejects_short_gain_list() {
        assert!(Config::from_toml_str("gyroPID = [1.0, 2.0]").is_err());
    }

    #[test]
    fn map_values_are_parsed() {
        let config = Config::from_map(&map(&[
            ("gyroPID", "0.1, 0.2, 0.3, 0.4"),
            ("encoderPID", "1,2,3,4"),
            ("turnSpeed", " 0.5 "),
            ("playExtension", ".play"),
            ("delimiter", ";"),
            ("somethingElse", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.gyro_pid, PidGains::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(config.encoder_gains(), PidGains::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(config.turn_speed, 0.5);
        assert_eq!(config.play_extension, "play");
        assert_eq!(config.delimiter, ';');
    }

    #[test]
    fn map_rejects_bad_values() {
        assert!(matches!(
            Config::from_map(&map(&[("driveSpeed", "fast")])),
            Err(PlaybookError::Config(_))
        ));
        assert!(Config::from_map(&map(&[("gyroPID", "1,2,3")])).is_err());
        assert!(Config::from_map(&map(&[("gyroPID", "1,2,3,4,5")])).is_err());
        assert!(Config::from_map(&map(&[("doRobotLogging", "yes")])).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, PlaybookError::FileAccess { .. }));
    }
}
