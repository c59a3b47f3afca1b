//! Host machine states reported by the shell's power monitor.
//!
//! Both enums are closed sets of lowercase strings on the wire:
//!
//! | Type                | Wire values                                        |
//! |---------------------|----------------------------------------------------|
//! | [`SystemIdleState`] | `active`, `idle`, `locked`, `unknown`              |
//! | [`ThermalState`]    | `unknown`, `nominal`, `fair`, `serious`, `critical`|
//! | [`PowerState`]      | `ac`, `battery`, `unknown`                         |
//!
//! Parsing with [`str::parse`] is strict and reports [`ParseStateError`].
//! Deserialising from a shell response is lenient: a value this crate does not
//! know (say, a newer shell adds `"suspended"`) becomes the `Unknown` variant
//! instead of failing the whole response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error returned when a state string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseStateError {
    /// Which enum was being parsed (`"idle state"` or `"thermal state"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ── SystemIdleState ───────────────────────────────────────────────────────────

/// Whether the user is currently at the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemIdleState {
    Active,
    Idle,
    Locked,
    Unknown,
}

impl SystemIdleState {
    /// Wire representation of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Locked => "locked",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for SystemIdleState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "idle" => Ok(Self::Idle),
            "locked" => Ok(Self::Locked),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseStateError {
                kind: "idle state",
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for SystemIdleState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

impl fmt::Display for SystemIdleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ThermalState ──────────────────────────────────────────────────────────────

/// Thermal pressure on the host, as classified by the operating system.
///
/// Only macOS reports anything other than `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalState {
    Unknown,
    Nominal,
    Fair,
    Serious,
    Critical,
}

impl ThermalState {
    /// Wire representation of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Nominal => "nominal",
            Self::Fair => "fair",
            Self::Serious => "serious",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for ThermalState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "nominal" => Ok(Self::Nominal),
            "fair" => Ok(Self::Fair),
            "serious" => Ok(Self::Serious),
            "critical" => Ok(Self::Critical),
            other => Err(ParseStateError {
                kind: "thermal state",
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for ThermalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

impl fmt::Display for ThermalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PowerState ────────────────────────────────────────────────────────────────

/// Where the host currently draws its power from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Ac,
    Battery,
    Unknown,
}

impl PowerState {
    /// Wire representation of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ac => "ac",
            Self::Battery => "battery",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for PowerState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ac" => Ok(Self::Ac),
            "battery" => Ok(Self::Battery),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseStateError {
                kind: "power state",
                value: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for PowerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state_parses_every_wire_value() {
        for state in [
            SystemIdleState::Active,
            SystemIdleState::Idle,
            SystemIdleState::Locked,
            SystemIdleState::Unknown,
        ] {
            assert_eq!(state.as_str().parse::<SystemIdleState>(), Ok(state));
        }
    }

    #[test]
    fn test_thermal_state_parses_every_wire_value() {
        for state in [
            ThermalState::Unknown,
            ThermalState::Nominal,
            ThermalState::Fair,
            ThermalState::Serious,
            ThermalState::Critical,
        ] {
            assert_eq!(state.as_str().parse::<ThermalState>(), Ok(state));
        }
    }

    #[test]
    fn test_strict_parse_rejects_unknown_value() {
        // Arrange / Act
        let err = "suspended".parse::<SystemIdleState>().unwrap_err();

        // Assert
        assert_eq!(err.kind, "idle state");
        assert_eq!(err.value, "suspended");
    }

    #[test]
    fn test_strict_parse_is_case_sensitive() {
        assert!("Critical".parse::<ThermalState>().is_err());
    }

    #[test]
    fn test_lenient_deserialize_maps_unknown_value_to_unknown() {
        let state: ThermalState = serde_json::from_str(r#""overheating""#).unwrap();
        assert_eq!(state, ThermalState::Unknown);
    }

    #[test]
    fn test_deserialize_known_value() {
        let state: SystemIdleState = serde_json::from_str(r#""locked""#).unwrap();
        assert_eq!(state, SystemIdleState::Locked);
    }

    #[test]
    fn test_deserialize_non_string_is_an_error() {
        let result: Result<SystemIdleState, _> = serde_json::from_str("3");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_lowercase_wire_value() {
        assert_eq!(
            serde_json::to_string(&ThermalState::Serious).unwrap(),
            r#""serious""#
        );
    }

    #[test]
    fn test_power_state_parses_every_wire_value() {
        for state in [PowerState::Ac, PowerState::Battery, PowerState::Unknown] {
            assert_eq!(state.as_str().parse::<PowerState>(), Ok(state));
        }
    }

    #[test]
    fn test_power_state_deserialize_is_lenient() {
        let state: PowerState = serde_json::from_str(r#""ups""#).unwrap();
        assert_eq!(state, PowerState::Unknown);
        let state: PowerState = serde_json::from_str(r#""ac""#).unwrap();
        assert_eq!(state, PowerState::Ac);
    }

    #[test]
    fn test_display_matches_wire_value() {
        assert_eq!(SystemIdleState::Idle.to_string(), "idle");
    }
}
