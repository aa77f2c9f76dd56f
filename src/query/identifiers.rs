//! Parsing of pasted material identifiers.

use crate::error::{Result, StocklensError};
use serde::Serialize;

/// Material identifiers entered for one query.
///
/// Identifiers are kept as `f64` because the source sheets store materials as
/// numbers. Membership is exact floating-point equality with no tolerance;
/// an identifier matches a row only if both parse to the same `f64`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IdentifierSet {
    ids: Vec<f64>,
}

impl IdentifierSet {
    /// Builds a set, dropping repeats and keeping first-seen order.
    pub fn new(ids: impl IntoIterator<Item = f64>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }

    pub fn contains(&self, value: f64) -> bool {
        self.ids.iter().any(|&id| id == value)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.ids
    }
}

/// Parses comma- and/or newline-separated identifiers.
///
/// Empty tokens are ignored, so blank input gives an empty set. A token that
/// is not a finite number rejects the whole input.
///
/// # Errors
///
/// Returns [`StocklensError::InvalidIdentifier`] for the first bad token; its
/// position counts non-empty tokens from 1.
pub fn parse_identifiers(input: &str) -> Result<IdentifierSet> {
    let mut ids = Vec::new();
    let tokens = input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty());

    for (idx, token) in tokens.enumerate() {
        match token.parse::<f64>() {
            Ok(id) if id.is_finite() => ids.push(id),
            _ => {
                return Err(StocklensError::InvalidIdentifier {
                    token: token.to_owned(),
                    position: idx + 1,
                });
            }
        }
    }

    Ok(IdentifierSet::new(ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commas_and_newlines() -> Result<()> {
        let set = parse_identifiers("10, 20\n30\r\n,40")?;
        assert_eq!(set.as_slice(), &[10.0, 20.0, 30.0, 40.0]);
        Ok(())
    }

    #[test]
    fn test_blank_input_is_empty() -> Result<()> {
        assert!(parse_identifiers("")?.is_empty());
        assert!(parse_identifiers(" ,\n , ")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicates_collapse() -> Result<()> {
        let set = parse_identifiers("7,7.0,3,7")?;
        assert_eq!(set.as_slice(), &[7.0, 3.0]);
        assert_eq!(set.len(), 2);
        Ok(())
    }

    #[test]
    fn test_bad_token_rejects_batch() {
        let err = parse_identifiers("10,abc,30").err();
        assert!(
            matches!(
                err,
                Some(StocklensError::InvalidIdentifier { ref token, position: 2 }) if token == "abc"
            ),
            "{err:?}"
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(parse_identifiers("nan").is_err());
        assert!(parse_identifiers("10\ninf").is_err());
    }

    #[test]
    fn test_exact_membership() {
        let set = IdentifierSet::new([100_000_123.0, 0.0]);
        assert!(set.contains(100_000_123.0));
        assert!(!set.contains(100_000_123.000_01));
        assert!(set.contains(-0.0));
    }
}
