use super::{ConfigKey, Interval, RawGunConfig};
use crate::error::{ConfigError, ConfigResult};
use std::{fmt::Display, io::BufRead, str::FromStr};
use tracing::warn;

/// Parses the line-oriented `key value` format. Blank lines and lines
/// starting with `#` are skipped, as is anything after a `#` following the
/// value.
pub(super) fn parse<R: BufRead>(reader: R) -> ConfigResult<RawGunConfig> {
    let mut raw = RawGunConfig::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
            return Err(ConfigError::MalformedLine { line_number, line });
        };
        if tokens.next().is_some_and(|extra| !extra.starts_with('#')) {
            return Err(ConfigError::MalformedLine { line_number, line });
        }

        match key.parse::<ConfigKey>() {
            Ok(key) => raw.set(key, value)?,
            Err(_) => warn!(line_number, key, "Ignoring unrecognised configuration key"),
        }
    }
    Ok(raw)
}

fn parse_value<T>(key: ConfigKey, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

fn parse_list<T>(key: ConfigKey, value: &str) -> ConfigResult<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    value.split(',').map(|item| parse_value(key, item)).collect()
}

fn parse_interval<T>(key: ConfigKey, value: &str) -> ConfigResult<Interval<T>>
where
    T: FromStr + PartialOrd + Copy,
    T::Err: Display,
{
    match parse_list(key, value)?.as_slice() {
        [min, max] => Ok(Interval::new(*min, *max)),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_owned(),
            reason: "expected two comma-separated bounds".to_owned(),
        }),
    }
}

impl RawGunConfig {
    fn is_set(&self, key: ConfigKey) -> bool {
        match key {
            ConfigKey::Nevents => self.nevents.is_some(),
            ConfigKey::NpartRange => self.npart_range.is_some(),
            ConfigKey::ThetaRange => self.theta_range.is_some(),
            ConfigKey::MomRange => self.mom_range.is_some(),
            ConfigKey::Drmax => self.drmax.is_some(),
            ConfigKey::PidList => self.pid_list.is_some(),
            ConfigKey::Seed => self.seed.is_some(),
        }
    }

    fn set(&mut self, key: ConfigKey, value: &str) -> ConfigResult<()> {
        if self.is_set(key) {
            warn!(%key, value, "Repeated configuration key overrides earlier value");
        }
        match key {
            ConfigKey::Nevents => self.nevents = Some(parse_value(key, value)?),
            ConfigKey::NpartRange => self.npart_range = Some(parse_interval(key, value)?),
            ConfigKey::ThetaRange => self.theta_range = Some(parse_interval(key, value)?),
            ConfigKey::MomRange => self.mom_range = Some(parse_interval(key, value)?),
            ConfigKey::Drmax => self.drmax = Some(parse_value(key, value)?),
            ConfigKey::PidList => self.pid_list = Some(parse_list(key, value)?),
            ConfigKey::Seed => self.seed = Some(parse_value(key, value)?),
        }
        Ok(())
    }
}
