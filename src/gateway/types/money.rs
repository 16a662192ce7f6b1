//! Money types for API boundary enforcement

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::Deserialize;

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// Accepts a JSON string or a JSON integer:
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects empty strings
/// - Rejects scientific notation and a `+` prefix
/// - Rejects JSON floats (precision is lost before we see them)
///
/// Sign is NOT checked here; the ledger rejects non-positive amounts with a
/// typed validation error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Decimal> for StrictDecimal {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

fn parse_strict<E: de::Error>(s: &str) -> Result<Decimal, E> {
    if s.is_empty() {
        return Err(E::custom("Amount cannot be empty"));
    }
    if s.starts_with('.') || s.starts_with("-.") {
        return Err(E::custom("Invalid format: use 0.5 not .5"));
    }
    if s.ends_with('.') {
        return Err(E::custom("Invalid format: use 5.0 not 5."));
    }
    if s.contains('e') || s.contains('E') {
        return Err(E::custom("Invalid format: scientific notation not allowed"));
    }
    if s.starts_with('+') {
        return Err(E::custom("Invalid format: + prefix not allowed"));
    }
    Decimal::from_str(s).map_err(|e| E::custom(format!("Invalid decimal: {}", e)))
}

struct StrictDecimalVisitor;

impl Visitor<'_> for StrictDecimalVisitor {
    type Value = StrictDecimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string or an integer")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        parse_strict(s).map(StrictDecimal)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(StrictDecimal(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(StrictDecimal(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Err(E::custom(
            "Invalid format: send fractional amounts as strings",
        ))
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(StrictDecimalVisitor)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
