//! Time-of-day values for blocking windows
//!
//! Targets carry their windows as wall-clock `HH:MM` values and all
//! comparisons happen in minutes-since-midnight, which keeps the
//! midnight-crossing logic a plain integer check.

use chrono::{DateTime, Local, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Get the current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Wall-clock time of day, serialized as an `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Minutes since local midnight, in `[0, 1439]`.
    pub fn minutes_from_midnight(&self) -> u32 {
        (self.hour as u32) * 60 + self.minute as u32
    }

    /// The wall-clock minute a local datetime falls in.
    pub fn from_datetime(dt: &DateTime<Local>) -> Self {
        Self {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
        }
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for WallClock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = parse_time(s)?;
        Ok(Self { hour, minute })
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.minutes_from_midnight()
            .cmp(&other.minutes_from_midnight())
    }
}

impl Serialize for WallClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WallClock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Parse `HH:MM` time format
pub fn parse_time(s: &str) -> Result<(u8, u8), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Expected HH:MM format".into());
    }

    let hour: u8 = parts[0].parse().map_err(|_| "Invalid hour".to_string())?;
    let minute: u8 = parts[1]
        .parse()
        .map_err(|_| "Invalid minute".to_string())?;

    if hour >= 24 {
        return Err("Hour must be 0-23".into());
    }
    if minute >= 60 {
        return Err("Minute must be 0-59".into());
    }

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:00").unwrap(), (9, 0));
        assert_eq!(parse_time("00:00").unwrap(), (0, 0));
        assert_eq!(parse_time("23:59").unwrap(), (23, 59));

        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("1200").is_err());
        assert!(parse_time("invalid").is_err());
    }

    #[test]
    fn test_wall_clock_ordering() {
        let morning = WallClock::new(8, 0).unwrap();
        let noon = WallClock::new(12, 0).unwrap();
        let evening = WallClock::new(18, 30).unwrap();

        assert!(morning < noon);
        assert!(noon < evening);
    }

    #[test]
    fn test_minutes_from_midnight() {
        assert_eq!(WallClock::new(0, 0).unwrap().minutes_from_midnight(), 0);
        assert_eq!(WallClock::new(9, 0).unwrap().minutes_from_midnight(), 540);
        assert_eq!(
            WallClock::new(23, 59).unwrap().minutes_from_midnight(),
            1439
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let clock = WallClock::new(9, 5).unwrap();
        let json = serde_json::to_string(&clock).unwrap();
        assert_eq!(json, "\"09:05\"");

        let parsed: WallClock = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, clock);
    }

    #[test]
    fn test_deserialize_rejects_bad_time() {
        assert!(serde_json::from_str::<WallClock>("\"25:00\"").is_err());
        assert!(serde_json::from_str::<WallClock>("\"nine\"").is_err());
    }
}
