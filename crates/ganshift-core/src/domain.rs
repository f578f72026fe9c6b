//! Core domain types for image translation.

use std::fmt;
use std::str::FromStr;

/// Edge length of the square frame every image is normalized to.
pub const IMAGE_SIZE: usize = 256;

/// Color channels per frame (RGB).
pub const CHANNELS: usize = 3;

/// Translation direction between the two image domains.
///
/// The demo route is [`Direction::Forward`]: the first submitted image is
/// pushed through the forward generator. The reverse generator is loaded and
/// selectable, but nothing picks it unless asked to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Domain A to domain B, via the `ab` generator.
    #[default]
    Forward,
    /// Domain B to domain A, via the `ba` generator.
    Reverse,
}

impl Direction {
    /// Short name used in config files and artifact naming.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            other => Err(format!(
                "'{other}' is not a direction (expected 'forward' or 'reverse')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_direction_is_forward() {
        assert_eq!(Direction::default(), Direction::Forward);
    }

    #[test]
    fn test_direction_round_trip() {
        for d in [Direction::Forward, Direction::Reverse] {
            assert_eq!(d.as_str().parse::<Direction>(), Ok(d));
        }
    }

    #[test]
    fn test_direction_rejects_unknown() {
        assert!("sideways".parse::<Direction>().is_err());
    }
}
