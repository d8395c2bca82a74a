use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game variant. The two variants share every rule and differ only in camera
/// control and enemy speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed-offset camera trailing the player; world-axis movement.
    #[default]
    Follow,
    /// Mouse-drag orbit camera; movement relative to camera yaw.
    Orbit,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Follow => "follow",
            Variant::Orbit => "orbit",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{0}` (expected `follow` or `orbit`)")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "follow" => Ok(Variant::Follow),
            "orbit" => Ok(Variant::Orbit),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Orbit".parse::<Variant>().unwrap(), Variant::Orbit);
        assert_eq!("FOLLOW".parse::<Variant>().unwrap(), Variant::Follow);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = "flying".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("flying"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for v in [Variant::Follow, Variant::Orbit] {
            assert_eq!(v.to_string().parse::<Variant>().unwrap(), v);
        }
    }
}
