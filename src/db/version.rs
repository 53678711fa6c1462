use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Semantic version of the on-disk schema, as stored in `settings.app_version`.
///
/// Only the numeric `major.minor.patch` core is significant for ordering.
/// Missing trailing components count as zero (`"0.4"` == `"0.4.0"`), and a
/// leading `v` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl AppVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for AppVersion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let core = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if core.is_empty() {
            return Err(AppError::InvalidVersion(s.to_string()));
        }

        let mut parts = [0u64; 3];
        let mut count = 0;
        for piece in core.split('.') {
            if count == parts.len() {
                return Err(AppError::InvalidVersion(s.to_string()));
            }
            parts[count] = piece
                .parse::<u64>()
                .map_err(|_| AppError::InvalidVersion(s.to_string()))?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> AppVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(v("0.0.8") < v("0.1.0"));
        assert!(v("0.4.0") > v("0.3.9"));
        assert!(v("0.10.0") > v("0.9.0"));
        assert_eq!(v("0.4"), v("0.4.0"));
        assert_eq!(v("v1.2.3"), AppVersion::new(1, 2, 3));
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(v("0.2").to_string(), "0.2.0");
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "abc", "1..2", "1.2.3.4", "1.-2.0", "v"] {
            assert!(bad.parse::<AppVersion>().is_err(), "accepted {bad:?}");
        }
    }
}
