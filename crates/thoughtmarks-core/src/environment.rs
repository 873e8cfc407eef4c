use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of the two parallel UI trees is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Legacy,
    Nextgen,
}

impl EnvironmentMode {
    pub const ALL: [EnvironmentMode; 2] = [EnvironmentMode::Legacy, EnvironmentMode::Nextgen];

    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentMode::Legacy => "legacy",
            EnvironmentMode::Nextgen => "nextgen",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            EnvironmentMode::Legacy => EnvironmentMode::Nextgen,
            EnvironmentMode::Nextgen => EnvironmentMode::Legacy,
        }
    }

    /// Parses a stored record. Only the exact lowercase spellings are accepted;
    /// anything else counts as "no record".
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "legacy" => Some(EnvironmentMode::Legacy),
            "nextgen" => Some(EnvironmentMode::Nextgen),
            _ => None,
        }
    }

    /// Interprets a `USE_NEXTGEN`-style boolean flag.
    pub fn from_nextgen_flag(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(EnvironmentMode::Nextgen),
            "0" | "false" | "no" | "off" => Some(EnvironmentMode::Legacy),
            _ => None,
        }
    }
}

impl fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnvironmentModeError {
    pub value: String,
}

impl fmt::Display for ParseEnvironmentModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment mode '{}' (expected 'legacy' or 'nextgen')",
            self.value
        )
    }
}

impl std::error::Error for ParseEnvironmentModeError {}

impl FromStr for EnvironmentMode {
    type Err = ParseEnvironmentModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EnvironmentMode::from_stored(value.trim()).ok_or_else(|| ParseEnvironmentModeError {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_is_an_involution() {
        for mode in EnvironmentMode::ALL {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }

    #[test]
    fn stored_values_are_exact() {
        assert_eq!(EnvironmentMode::from_stored("nextgen"), Some(EnvironmentMode::Nextgen));
        assert_eq!(EnvironmentMode::from_stored("Nextgen"), None);
        assert_eq!(EnvironmentMode::from_stored(" legacy"), None);
        assert_eq!(EnvironmentMode::from_stored(""), None);
    }

    #[test]
    fn from_str_rejects_unknown_modes() {
        assert_eq!("legacy".parse::<EnvironmentMode>(), Ok(EnvironmentMode::Legacy));
        let err = "beta".parse::<EnvironmentMode>().unwrap_err();
        assert_eq!(err.value, "beta");
    }

    #[test]
    fn nextgen_flag_accepts_common_booleans() {
        assert_eq!(EnvironmentMode::from_nextgen_flag("TRUE"), Some(EnvironmentMode::Nextgen));
        assert_eq!(EnvironmentMode::from_nextgen_flag("0"), Some(EnvironmentMode::Legacy));
        assert_eq!(EnvironmentMode::from_nextgen_flag("maybe"), None);
    }

    #[test]
    fn serializes_as_lowercase_text() {
        let json = serde_json::to_string(&EnvironmentMode::Nextgen).unwrap();
        assert_eq!(json, "\"nextgen\"");
    }
}
