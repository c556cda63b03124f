//! Validated per-call price type.

use super::LedgerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated per-call price, kept as a plain decimal string.
///
/// Prices cross the wire and the ledger boundary as strings (e.g.
/// `"0.001"`), and no arithmetic is ever performed on them inside the
/// core, so the validated textual form is the canonical representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricePerCall(String);

impl PricePerCall {
    /// Creates a validated price.
    ///
    /// The input is trimmed. Only digits with at most one decimal point
    /// are accepted, and the amount must be greater than zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyPricePerCall`] when the value is
    /// empty after trimming, [`LedgerDomainError::InvalidPricePerCall`]
    /// when it is not a plain decimal number, or
    /// [`LedgerDomainError::ZeroPricePerCall`] when every digit is zero.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(LedgerDomainError::EmptyPricePerCall);
        }

        let mut seen_digit = false;
        let mut seen_point = false;
        for ch in normalized.chars() {
            match ch {
                '0'..='9' => seen_digit = true,
                '.' if !seen_point => seen_point = true,
                _ => return Err(LedgerDomainError::InvalidPricePerCall(raw)),
            }
        }
        if !seen_digit {
            return Err(LedgerDomainError::InvalidPricePerCall(raw));
        }

        let has_value = normalized
            .chars()
            .any(|ch| ch.is_ascii_digit() && ch != '0');
        if !has_value {
            return Err(LedgerDomainError::ZeroPricePerCall(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the price as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PricePerCall {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PricePerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
