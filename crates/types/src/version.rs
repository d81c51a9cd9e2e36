//! Application version strings and their ordering
//!
//! Versions published by the update server look like `1.2.3` for release
//! builds and `1.2.3-test-02031200` for test builds:
//!
//! - the main version is split on `.` and compared numerically, part by
//!   part, with missing parts counting as zero
//! - with equal main versions a test build is newer than a release build,
//!   but a release build is never newer than a test build
//! - two test builds with equal main versions are ordered by their stamp
//!   (the text after `-test-`), compared as plain strings
//!
//! Nothing in this module fails: malformed input parses to zero-valued
//! parts and therefore never compares as newer.

use regex::Regex;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Marker separating the main version from a test-build stamp
pub const TEST_MARKER: &str = "-test-";

static VERSION_FORMAT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+.*$").ok());

/// Check that `text` starts with a numeric `MAJOR.MINOR` prefix
#[must_use]
pub fn is_valid_version_format(text: &str) -> bool {
    !text.is_empty()
        && VERSION_FORMAT
            .as_ref()
            .is_some_and(|format| format.is_match(text))
}

/// Strip a `-test-...` suffix, or failing that any `-suffix`
///
/// A delimiter at the very start of the text is not treated as one.
#[must_use]
pub fn extract_main_version(text: &str) -> &str {
    match delimiter_index(text, TEST_MARKER).or_else(|| delimiter_index(text, "-")) {
        Some(index) => &text[..index],
        None => text,
    }
}

/// Numeric value of the leading ASCII digits of `token`
///
/// Returns 0 when the token has no leading digits, or when the digit run
/// does not fit in a `u64`.
#[must_use]
pub fn parse_version_part(token: &str) -> u64 {
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    token[..digits].parse().unwrap_or(0)
}

/// Whether `new` is a newer build than `current`
#[must_use]
pub fn is_newer_version(new: &str, current: &str) -> bool {
    AppVersion::parse(new).is_newer_than(&AppVersion::parse(current))
}

fn delimiter_index(text: &str, delimiter: &str) -> Option<usize> {
    text.find(delimiter).filter(|&index| index > 0)
}

/// A version string broken down into the parts that decide its ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVersion {
    raw: String,
    main_len: usize,
    parts: Vec<u64>,
    test: bool,
    test_stamp: String,
}

impl AppVersion {
    /// Scan a version string. Never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let main = extract_main_version(text);
        let parts = main.split('.').map(parse_version_part).collect();

        // A marker at index 0 still flags a test build but carries no stamp
        let test = text.contains(TEST_MARKER);
        let test_stamp = delimiter_index(text, TEST_MARKER)
            .map(|index| &text[index + TEST_MARKER.len()..])
            .unwrap_or_default()
            .to_string();

        Self {
            raw: text.to_string(),
            main_len: main.len(),
            parts,
            test,
            test_stamp,
        }
    }

    /// The text as given
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The text with any `-suffix` removed
    #[must_use]
    pub fn main_version(&self) -> &str {
        &self.raw[..self.main_len]
    }

    /// Numeric values of the main version parts
    #[must_use]
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Whether this is a test build (contains `-test-`)
    #[must_use]
    pub fn is_test_build(&self) -> bool {
        self.test
    }

    /// The stamp following `-test-`, if this is a test build
    #[must_use]
    pub fn test_stamp(&self) -> Option<&str> {
        self.test.then_some(self.test_stamp.as_str())
    }

    /// Update precedence of `self` relative to `other`
    ///
    /// `Greater` means `self` should replace `other`. Main versions that
    /// differ only by trailing zero parts compare equal.
    #[must_use]
    pub fn precedence(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let ours = self.parts.get(i).copied().unwrap_or(0);
            let theirs = other.parts.get(i).copied().unwrap_or(0);
            match ours.cmp(&theirs) {
                Ordering::Equal => {}
                decided => return decided,
            }
        }

        match (self.test, other.test) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => Ordering::Equal,
            (true, true) => self.test_stamp.cmp(&other.test_stamp),
        }
    }

    /// Whether `self` is a newer build than `other`
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Greater
    }
}

impl FromStr for AppVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
