mod key_value;

use crate::error::{ConfigError, ConfigResult};
use itertools::Itertools;
use particle_gun_common::Pid;
use serde::Deserialize;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::info;

pub(crate) const DEFAULT_OUTPUT_FILE: &str = "events.hepmc";

/// Keys recognised in a configuration file.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum ConfigKey {
    Nevents,
    NpartRange,
    ThetaRange,
    MomRange,
    Drmax,
    PidList,
    Seed,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Interval<T> {
    pub(crate) min: T,
    pub(crate) max: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub(crate) fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub(crate) fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Configuration as read from file, before any validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct RawGunConfig {
    pub(crate) nevents: Option<f64>,
    pub(crate) npart_range: Option<Interval<i64>>,
    pub(crate) theta_range: Option<Interval<f64>>,
    pub(crate) mom_range: Option<Interval<f64>>,
    pub(crate) drmax: Option<f64>,
    pub(crate) pid_list: Option<Vec<Pid>>,
    pub(crate) seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GunConfig {
    pub(crate) nevents: u64,
    pub(crate) npart_range: Interval<u32>,
    /// Polar angle of the seed direction, in degrees.
    pub(crate) theta_range: Interval<f64>,
    /// Momentum magnitude, in GeV.
    pub(crate) mom_range: Interval<f64>,
    pub(crate) drmax: f64,
    pub(crate) pid_list: Vec<Pid>,
    pub(crate) seed: Option<u64>,
}

fn out_of_range(key: ConfigKey, reason: impl Into<String>) -> ConfigError {
    ConfigError::OutOfRange {
        key,
        reason: reason.into(),
    }
}

fn require<T>(value: Option<T>, key: ConfigKey) -> ConfigResult<T> {
    value.ok_or(ConfigError::MissingKey(key))
}

fn validate_ordered<T: PartialOrd + Copy + std::fmt::Display>(
    interval: &Interval<T>,
    key: ConfigKey,
) -> ConfigResult<()> {
    if interval.is_ordered() {
        Ok(())
    } else {
        Err(out_of_range(
            key,
            format!("lower bound {} exceeds upper bound {}", interval.min, interval.max),
        ))
    }
}

impl RawGunConfig {
    /// Checks every required key is present and every value lies in the
    /// domain where the sampling is well defined.
    pub(crate) fn validate(self) -> ConfigResult<GunConfig> {
        let nevents = require(self.nevents, ConfigKey::Nevents)?;
        if !nevents.is_finite() || nevents < 0.0 {
            return Err(out_of_range(
                ConfigKey::Nevents,
                format!("{nevents} is not a non-negative number"),
            ));
        }

        let npart_range = require(self.npart_range, ConfigKey::NpartRange)?;
        validate_ordered(&npart_range, ConfigKey::NpartRange)?;
        let to_count = |bound: i64| {
            u32::try_from(bound).map_err(|_| {
                out_of_range(
                    ConfigKey::NpartRange,
                    format!("{bound} is not a valid particle count"),
                )
            })
        };
        let npart_range = Interval::new(to_count(npart_range.min)?, to_count(npart_range.max)?);

        let theta_range = require(self.theta_range, ConfigKey::ThetaRange)?;
        if !(theta_range.min > 0.0 && theta_range.max < 180.0) {
            return Err(out_of_range(
                ConfigKey::ThetaRange,
                "bounds must lie strictly between 0 and 180 degrees",
            ));
        }
        validate_ordered(&theta_range, ConfigKey::ThetaRange)?;

        let mom_range = require(self.mom_range, ConfigKey::MomRange)?;
        if !(mom_range.min > 0.0 && mom_range.max.is_finite()) {
            return Err(out_of_range(
                ConfigKey::MomRange,
                "bounds must be strictly positive and finite",
            ));
        }
        validate_ordered(&mom_range, ConfigKey::MomRange)?;

        let drmax = require(self.drmax, ConfigKey::Drmax)?;
        if !(drmax > 0.0 && drmax.is_finite()) {
            return Err(out_of_range(
                ConfigKey::Drmax,
                format!("{drmax} is not a strictly positive number"),
            ));
        }

        let pid_list = require(self.pid_list, ConfigKey::PidList)?;
        if pid_list.is_empty() {
            return Err(out_of_range(ConfigKey::PidList, "list is empty"));
        }

        Ok(GunConfig {
            nevents: nevents.trunc() as u64,
            npart_range,
            theta_range,
            mom_range,
            drmax,
            pid_list,
            seed: self.seed,
        })
    }
}

impl GunConfig {
    /// Reads and validates a configuration file. Files ending in `.json` are
    /// read as JSON, anything else as `key value` lines.
    pub(crate) fn load(path: &Path) -> ConfigResult<Self> {
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: PathBuf::from(path),
            source,
        })?;
        let reader = BufReader::new(file);

        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let raw: RawGunConfig = if is_json {
            serde_json::from_reader(reader)?
        } else {
            key_value::parse(reader)?
        };
        raw.validate()
    }

    pub(crate) fn log_summary(&self) {
        info!("nevents: {}", self.nevents);
        info!(
            "npart_range: {} {}",
            self.npart_range.min, self.npart_range.max
        );
        info!(
            "theta_range: {} {}",
            self.theta_range.min, self.theta_range.max
        );
        info!("mom_range: {} {}", self.mom_range.min, self.mom_range.max);
        info!("drmax: {}", self.drmax);
        info!("pid_list: {}", self.pid_list.iter().join(" "));
        if let Some(seed) = self.seed {
            info!("seed: {seed}");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    pub(crate) fn single_pion_config() -> GunConfig {
        GunConfig {
            nevents: 1,
            npart_range: Interval::new(1, 1),
            theta_range: Interval::new(90.0, 90.0),
            mom_range: Interval::new(1.0, 1.0),
            drmax: 0.001,
            pid_list: vec![211],
            seed: None,
        }
    }

    fn complete_raw() -> RawGunConfig {
        RawGunConfig {
            nevents: Some(10.0),
            npart_range: Some(Interval::new(1, 5)),
            theta_range: Some(Interval::new(30.0, 150.0)),
            mom_range: Some(Interval::new(0.5, 50.0)),
            drmax: Some(0.4),
            pid_list: Some(vec![211, -211, 22]),
            seed: None,
        }
    }

    const JSON_INPUT: &str = r#"
        {
            "nevents": 100,
            "npart-range": { "min": 1, "max": 4 },
            "theta-range": { "min": 30, "max": 150 },
            "mom-range": { "min": 0.5, "max": 50 },
            "drmax": 0.4,
            "pid-list": [211, -211, 22],
            "seed": 42
        }
    "#;

    #[test]
    fn key_names() {
        let names = ConfigKey::iter().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "nevents",
                "npart_range",
                "theta_range",
                "mom_range",
                "drmax",
                "pid_list",
                "seed"
            ]
        );
        assert_eq!("pid_list".parse::<ConfigKey>().unwrap(), ConfigKey::PidList);
        assert!("pid-list".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn json() {
        let raw: RawGunConfig = serde_json::from_str(JSON_INPUT).unwrap();
        let config = raw.validate().unwrap();
        assert_eq!(config.nevents, 100);
        assert_eq!(config.npart_range, Interval::new(1, 4));
        assert_eq!(config.theta_range, Interval::new(30.0, 150.0));
        assert_eq!(config.mom_range, Interval::new(0.5, 50.0));
        assert_eq!(config.drmax, 0.4);
        assert_eq!(config.pid_list, vec![211, -211, 22]);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn json_unknown_field() {
        let result = serde_json::from_str::<RawGunConfig>(r#"{ "nevent": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn every_required_key_is_checked() {
        for key in ConfigKey::iter().filter(|key| *key != ConfigKey::Seed) {
            let mut raw = complete_raw();
            match key {
                ConfigKey::Nevents => raw.nevents = None,
                ConfigKey::NpartRange => raw.npart_range = None,
                ConfigKey::ThetaRange => raw.theta_range = None,
                ConfigKey::MomRange => raw.mom_range = None,
                ConfigKey::Drmax => raw.drmax = None,
                ConfigKey::PidList => raw.pid_list = None,
                ConfigKey::Seed => {}
            }
            let error = raw.validate().unwrap_err();
            assert!(matches!(error, ConfigError::MissingKey(missing) if missing == key));
            assert!(error.to_string().contains(&key.to_string()));
        }
    }

    #[test]
    fn nevents_is_truncated() {
        let mut raw = complete_raw();
        raw.nevents = Some(2.9);
        assert_eq!(raw.validate().unwrap().nevents, 2);
    }

    #[test]
    fn negative_nevents() {
        let mut raw = complete_raw();
        raw.nevents = Some(-1.0);
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                key: ConfigKey::Nevents,
                ..
            })
        ));
    }

    #[test]
    fn theta_at_poles() {
        for bounds in [(0.0, 90.0), (90.0, 180.0), (-10.0, 10.0)] {
            let mut raw = complete_raw();
            raw.theta_range = Some(Interval::new(bounds.0, bounds.1));
            assert!(matches!(
                raw.validate(),
                Err(ConfigError::OutOfRange {
                    key: ConfigKey::ThetaRange,
                    ..
                })
            ));
        }
    }

    #[test]
    fn non_positive_momentum() {
        for bounds in [(0.0, 1.0), (-1.0, 1.0), (1.0, f64::INFINITY)] {
            let mut raw = complete_raw();
            raw.mom_range = Some(Interval::new(bounds.0, bounds.1));
            assert!(matches!(
                raw.validate(),
                Err(ConfigError::OutOfRange {
                    key: ConfigKey::MomRange,
                    ..
                })
            ));
        }
    }

    #[test]
    fn non_positive_drmax() {
        for drmax in [0.0, -0.1, f64::NAN] {
            let mut raw = complete_raw();
            raw.drmax = Some(drmax);
            assert!(matches!(
                raw.validate(),
                Err(ConfigError::OutOfRange {
                    key: ConfigKey::Drmax,
                    ..
                })
            ));
        }
    }

    #[test]
    fn reversed_ranges() {
        let mut raw = complete_raw();
        raw.npart_range = Some(Interval::new(5, 1));
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                key: ConfigKey::NpartRange,
                ..
            })
        ));

        let mut raw = complete_raw();
        raw.mom_range = Some(Interval::new(10.0, 1.0));
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                key: ConfigKey::MomRange,
                ..
            })
        ));
    }

    #[test]
    fn negative_particle_count() {
        let mut raw = complete_raw();
        raw.npart_range = Some(Interval::new(-1, 2));
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                key: ConfigKey::NpartRange,
                ..
            })
        ));
    }

    #[test]
    fn empty_pid_list() {
        let mut raw = complete_raw();
        raw.pid_list = Some(Vec::new());
        assert!(matches!(
            raw.validate(),
            Err(ConfigError::OutOfRange {
                key: ConfigKey::PidList,
                ..
            })
        ));
    }

    #[test]
    fn interval() {
        assert!(Interval::new(1, 3).is_ordered());
        assert!(Interval::new(3, 3).is_ordered());
        assert!(!Interval::new(2.0, 1.0).is_ordered());
    }

    #[test]
    fn load_missing_file() {
        let error = GunConfig::load(Path::new("/nonexistent/particle-gun.cfg")).unwrap_err();
        assert!(matches!(error, ConfigError::Open { .. }));
        assert!(error.to_string().contains("/nonexistent/particle-gun.cfg"));
    }

    #[test]
    fn load_demo_files() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let text = GunConfig::load(&demos.join("pions.cfg")).unwrap();
        let json = GunConfig::load(&demos.join("pions.json")).unwrap();
        assert_eq!(text, json);

        let single = GunConfig::load(&demos.join("single_pion.cfg")).unwrap();
        assert_eq!(single, single_pion_config());
    }
}
