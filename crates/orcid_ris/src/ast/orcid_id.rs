use std::{fmt, str::FromStr};

use crate::{Error, ErrorKind};

const URL_PREFIXES: [&str; 3] = ["https://orcid.org/", "http://orcid.org/", "orcid.org/"];

/// A validated ORCID iD in its canonical `dddd-dddd-dddd-dddX` form.
///
/// Parsing accepts the bare identifier or the `https://orcid.org/` URL form and verifies the
/// ISO 7064 MOD 11-2 check character.
///
/// # Examples
///
/// ```
/// use orcid_ris::ast::OrcidId;
///
/// let id: OrcidId = "https://orcid.org/0000-0002-1825-0097".parse().unwrap();
/// assert_eq!("0000-0002-1825-0097", id.as_str());
///
/// assert!("0000-0002-1825-0098".parse::<OrcidId>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrcidId(String);

impl OrcidId {
    /// The identifier as used in registry URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrcidId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = URL_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);

        let invalid = |reason: &str| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("'{s}' is not a valid ORCID iD: {reason}"),
            )
        };

        let blocks = id.split('-').collect::<Vec<_>>();
        if !id.is_ascii() || blocks.len() != 4 || blocks.iter().any(|b| b.len() != 4) {
            return Err(invalid("expected four blocks of four characters"));
        }

        let chars = blocks.concat().chars().collect::<Vec<_>>();
        let (body, check) = chars.split_at(15);
        if !body.iter().all(char::is_ascii_digit) {
            return Err(invalid("only the last character may be a non-digit"));
        }

        let check = check[0].to_ascii_uppercase();
        if check != check_character(body) {
            return Err(invalid("check character does not match"));
        }

        let mut canonical = id.to_owned();
        canonical.make_ascii_uppercase();
        Ok(Self(canonical))
    }
}

/// ISO 7064 MOD 11-2 check character over the first fifteen digits.
fn check_character(digits: &[char]) -> char {
    let total = digits
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |total, d| (total + d) * 2);
    match (12 - total % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}
