//! Defines the Scope type and parsing/formatting according to the rfc.
//!
//! The engine itself never interprets scope values; it hands them to the
//! back-end's verifiers and stores whatever comes back. This type is a
//! convenience for back-ends and tests that want the standard textual
//! representation.
use std::{cmp, fmt, str};

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

/// Scope of a grant or request, a set of scope-tokens separated by spaces.
///
/// Scopes are interpreted as a conjunction of scope tokens. This induces a
/// partial ordering where scope `A` is less or equal than scope `B` if all
/// scope tokens of `A` are also found in `B`; a back-end granting `B` may
/// therefore narrow a request to any `A <= B`.
///
/// Example
/// ------
///
/// ```
/// # use oauth2_engine::primitives::scope::Scope;
/// let granted   = "account:read account:write".parse::<Scope>().unwrap();
/// let requested = "account:read".parse::<Scope>().unwrap();
/// let foreign   = "account:read payment".parse::<Scope>().unwrap();
///
/// assert!(requested <= granted);
/// assert!(!(foreign <= granted));
/// ```
///
/// Tokens are separated by single spaces and may use '!' plus the
/// printable ascii ranges '\x23'..='\x5b' and '\x5d'..='\x7e'; that is
/// everything printable except '"' and '\'.
#[derive(Clone, PartialEq, Eq)]
pub struct Scope {
    tokens: BTreeSet<String>,
}

impl Scope {
    /// The rfc6749 scope-token alphabet: '!', then two printable ascii
    /// ranges that leave out '"' and '\'.
    fn invalid_scope_char(ch: char) -> bool {
        !matches!(ch, '\x21' | '\x23'..='\x5b' | '\x5d'..='\x7e')
    }

    /// Whether this scope contains no tokens at all.
    ///
    /// Empty scopes commonly stand in for "whatever the registration
    /// allows"; the in-memory back-end substitutes the registered scope.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Create an iterator over the individual scope tokens, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

/// Error returned from parsing a scope as encoded in a request.
#[derive(Debug)]
pub enum ParseScopeErr {
    /// The string holds a character outside the scope-token alphabet.
    InvalidCharacter(char),
}

impl str::FromStr for Scope {
    type Err = ParseScopeErr;

    fn from_str(string: &str) -> Result<Scope, ParseScopeErr> {
        let mut tokens = BTreeSet::new();
        for token in string.split(' ') {
            if let Some(bad) = token.chars().find(|&ch| Scope::invalid_scope_char(ch)) {
                return Err(ParseScopeErr::InvalidCharacter(bad));
            }
            // Consecutive separators produce empty fragments; repeated
            // tokens collapse into the set.
            if !token.is_empty() {
                tokens.insert(token.to_string());
            }
        }
        Ok(Scope { tokens })
    }
}

impl fmt::Display for ParseScopeErr {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ParseScopeErr::InvalidCharacter(chr) => {
                write!(fmt, "scope contains the forbidden character {:?}", chr)
            }
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Scope({:?})", self.tokens)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut tokens = self.tokens.iter();
        if let Some(first) = tokens.next() {
            fmt.write_str(first)?;
            for token in tokens {
                write!(fmt, " {}", token)?;
            }
        }
        Ok(())
    }
}

impl PartialOrd for Scope {
    /// Subset inclusion: `A <= B` when every token of `A` is in `B`.
    fn partial_cmp(&self, rhs: &Self) -> Option<cmp::Ordering> {
        match (
            self.tokens.is_subset(&rhs.tokens),
            rhs.tokens.is_subset(&self.tokens),
        ) {
            (true, true) => Some(cmp::Ordering::Equal),
            (true, false) => Some(cmp::Ordering::Less),
            (false, true) => Some(cmp::Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        str::FromStr::from_str(&string).map_err(serde::de::Error::custom)
    }
}
