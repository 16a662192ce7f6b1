//! Currency validation
//!
//! [`CurrencyCode`] is a validated 3-letter code; [`CurrencySet`] is the
//! whitelist built once from configuration and handed to the gateway.
//! Fields are private to force validation through the public API.

use std::collections::BTreeSet;
use std::fmt;

use super::error::ValidationError;

/// Currencies accepted when no configuration overrides them
pub const DEFAULT_CURRENCIES: [&str; 3] = ["USD", "EUR", "CAD"];

// ============================================================================
// CurrencyCode - Validated Currency Code (Private Fields)
// ============================================================================

/// Validated currency code (guaranteed 3 ASCII uppercase letters)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new validated CurrencyCode
    ///
    /// # Validation Rules
    /// - Exactly 3 characters after trimming
    /// - Only A-Z
    ///
    /// # Examples
    /// ```
    /// use bank_ledger::ledger::CurrencyCode;
    ///
    /// let usd = CurrencyCode::new("USD").unwrap();
    /// assert_eq!(usd.as_str(), "USD");
    ///
    /// assert!(CurrencyCode::new("usd").is_err()); // lowercase rejected
    /// ```
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// CurrencySet - Immutable Whitelist
// ============================================================================

/// Supported currencies. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySet {
    codes: BTreeSet<CurrencyCode>,
}

impl CurrencySet {
    /// Build from raw codes, rejecting any malformed entry
    pub fn new<I, S>(codes: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|c| CurrencyCode::new(c.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { codes })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.as_str() == code)
    }

    /// Check that `code` is whitelisted and return its validated form
    pub fn validate(&self, code: &str) -> Result<CurrencyCode, ValidationError> {
        let code = CurrencyCode::new(code)?;
        if !self.codes.contains(&code) {
            return Err(ValidationError::UnsupportedCurrency(code.into_string()));
        }
        Ok(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for CurrencySet {
    fn default() -> Self {
        Self {
            codes: DEFAULT_CURRENCIES
                .iter()
                .map(|c| CurrencyCode(c.to_string()))
                .collect(),
        }
    }
}
