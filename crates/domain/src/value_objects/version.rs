//! Game version value object and parsing
//!
//! Supports release versions like "1.20.1", "1.19" or "1.20.1-rc1" and
//! snapshot versions like "23w31a".

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when parsing a version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version format: {0}")]
pub struct VersionParseError(pub String);

/// A parsed game version, either a release or a snapshot.
///
/// Snapshots reuse the release fields: the two-digit year is stored in
/// `minor`, the week number in `patch`, and the build letter in `snapshot`.
/// This matches the wire format the hosting protocol has always used.
///
/// Ordering policy: a snapshot compares less than *any* release, regardless
/// of its numeric fields. A release with no pre-release tag compares greater
/// than the same numeric triple with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    major: u32,
    minor: u32,
    patch: u32,
    pre_release: Option<String>,
    snapshot: Option<char>,
}

impl GameVersion {
    /// Parse a version string.
    ///
    /// Accepted grammars:
    /// - Release: `major.minor[.patch][-tag]` where `tag` is `[A-Za-z0-9-]+`
    /// - Snapshot: `YYwWWl` with two-digit year and week and a build letter
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        if let Some(snapshot) = Self::parse_snapshot(input) {
            return Ok(snapshot);
        }
        Self::parse_release(input).ok_or_else(|| VersionParseError(input.to_string()))
    }

    fn parse_snapshot(input: &str) -> Option<Self> {
        // Exactly: two digits, 'w', two digits, one lowercase letter.
        let bytes = input.as_bytes();
        if !input.is_ascii() || bytes.len() != 6 || bytes[2] != b'w' {
            return None;
        }
        let year: u32 = input[..2].parse().ok()?;
        let week: u32 = input[3..5].parse().ok()?;
        let letter = bytes[5] as char;
        if !letter.is_ascii_lowercase() {
            return None;
        }
        Some(Self {
            major: 0,
            minor: year,
            patch: week,
            pre_release: None,
            snapshot: Some(letter),
        })
    }

    fn parse_release(input: &str) -> Option<Self> {
        let (numbers, pre_release) = match input.split_once('-') {
            Some((numbers, tag)) => {
                if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                    return None;
                }
                (numbers, Some(tag.to_string()))
            }
            None => (input, None),
        };

        let mut parts = numbers.split('.');
        let major = parse_number(parts.next()?)?;
        let minor = parse_number(parts.next()?)?;
        let patch = match parts.next() {
            Some(part) => parse_number(part)?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            pre_release,
            snapshot: None,
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    /// Release minor version; for snapshots this is the two-digit year.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Release patch version; for snapshots this is the week number.
    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    /// Snapshot build letter, `None` for releases.
    pub fn snapshot(&self) -> Option<char> {
        self.snapshot
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for GameVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snapshot {
            Some(letter) => write!(f, "{:02}w{:02}{}", self.minor, self.patch, letter),
            None => {
                write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
                if let Some(tag) = &self.pre_release {
                    write!(f, "-{tag}")?;
                }
                Ok(())
            }
        }
    }
}

impl Ord for GameVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.snapshot, other.snapshot) {
            // Both snapshots: year, then week, then build letter.
            (Some(a), Some(b)) => self
                .minor
                .cmp(&other.minor)
                .then(self.patch.cmp(&other.patch))
                .then(a.cmp(&b)),
            // A snapshot is strictly older than any release.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .major
                .cmp(&other.major)
                .then(self.minor.cmp(&other.minor))
                .then(self.patch.cmp(&other.patch))
                .then_with(|| match (&self.pre_release, &other.pre_release) {
                    (None, None) => Ordering::Equal,
                    // A tagged build is a pre-release of the untagged one.
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(b),
                }),
        }
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> GameVersion {
        GameVersion::parse(s).unwrap()
    }

    #[test]
    fn parses_release_versions() {
        let version = v("1.20.1");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 20);
        assert_eq!(version.patch(), 1);
        assert_eq!(version.pre_release(), None);
        assert!(!version.is_snapshot());
    }

    #[test]
    fn patch_defaults_to_zero() {
        let version = v("1.19");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 19);
        assert_eq!(version.patch(), 0);
    }

    #[test]
    fn parses_pre_release_tag() {
        let version = v("1.20.1-rc1");
        assert_eq!(version.pre_release(), Some("rc1"));
    }

    #[test]
    fn parses_snapshot_versions() {
        let snap = v("23w31a");
        assert_eq!(snap.major(), 0);
        assert_eq!(snap.minor(), 23);
        assert_eq!(snap.patch(), 31);
        assert_eq!(snap.snapshot(), Some('a'));
        assert!(snap.is_snapshot());
    }

    #[test]
    fn rejects_malformed_versions() {
        for input in [
            "invalid", "", "1", "1.", "1.2.3.4", "1.2-", "23w31", "23w31A", "w3131", "1.x.3",
            "1.2.3-rc_1",
        ] {
            assert!(GameVersion::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn orders_releases_numerically() {
        assert!(v("1.20.1") > v("1.19.4"));
        assert!(v("1.19.4") < v("1.20.1"));
        assert_eq!(v("1.20.1").cmp(&v("1.20.1")), Ordering::Equal);
        assert!(v("2.0.0") > v("1.99.99"));
        assert!(v("1.19") < v("1.19.1"));
    }

    #[test]
    fn snapshot_is_older_than_any_release() {
        assert!(v("23w31a") < v("1.0"));
        assert!(v("99w52z") < v("0.0.1"));
        assert!(v("1.0") > v("23w31a"));
    }

    #[test]
    fn orders_snapshots_by_year_week_letter() {
        assert!(v("22w45b") < v("23w01a"));
        assert!(v("23w30a") < v("23w31a"));
        assert!(v("23w31a") < v("23w31b"));
        assert_eq!(v("23w31a").cmp(&v("23w31a")), Ordering::Equal);
    }

    #[test]
    fn untagged_release_is_newer_than_pre_release() {
        assert!(v("1.20.1") > v("1.20.1-rc1"));
        assert!(v("1.20.1-pre1") < v("1.20.1"));
        assert!(v("1.20.1-pre1") < v("1.20.1-rc1"));
    }

    #[test]
    fn ordering_is_a_strict_total_order() {
        // Fixture list in strictly ascending order; every pair must agree
        // with its position, symmetrically, and equality must be reflexive.
        let ordered = [
            "22w45b", "23w31a", "23w31b", "0.1.0", "1.0", "1.19", "1.19.4", "1.20.1-pre1",
            "1.20.1-rc1", "1.20.1", "2.0.0",
        ];
        for (i, a) in ordered.iter().enumerate() {
            assert_eq!(v(a).cmp(&v(a)), Ordering::Equal);
            for b in &ordered[i + 1..] {
                assert_eq!(v(a).cmp(&v(b)), Ordering::Less, "{a} < {b}");
                assert_eq!(v(b).cmp(&v(a)), Ordering::Greater, "{b} > {a}");
            }
        }
    }

    #[test]
    fn displays_round_trip() {
        assert_eq!(v("1.20.1").to_string(), "1.20.1");
        assert_eq!(v("1.19").to_string(), "1.19.0");
        assert_eq!(v("1.20.1-rc1").to_string(), "1.20.1-rc1");
        assert_eq!(v("23w31a").to_string(), "23w31a");
    }
}
