//! Price point model
//!
//! A price point is an arbitrary JSON object from a fixture file. Only a few
//! fields carry meaning here:
//! - `currencyCode`, `pricingRule`, `pricingTier`, `validFrom` form the identity
//! - `minQuantity` / `maxQuantity` form the optional quantity range
//!
//! Everything else is payload and is carried through verbatim, in its original
//! field order.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ModelError;

pub const CURRENCY_CODE: &str = "currencyCode";
pub const PRICING_RULE: &str = "pricingRule";
pub const PRICING_TIER: &str = "pricingTier";
pub const VALID_FROM: &str = "validFrom";
pub const MIN_QUANTITY: &str = "minQuantity";
pub const MAX_QUANTITY: &str = "maxQuantity";

/// Composite grouping key of a price point
///
/// Absent components are `None`. They are never folded into placeholder
/// strings, so a literal tier named `"default"` and a missing tier are
/// different keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey {
    pub currency_code: Option<String>,
    pub pricing_rule: Option<String>,
    pub pricing_tier: Option<String>,
    pub valid_from: Option<String>,
}

impl IdentityKey {
    /// Read the identity fields of a price point object
    ///
    /// `null` counts as absent; any other non-string value is rejected.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, ModelError> {
        Ok(Self {
            currency_code: identity_field(object, CURRENCY_CODE)?,
            pricing_rule: identity_field(object, PRICING_RULE)?,
            pricing_tier: identity_field(object, PRICING_TIER)?,
            valid_from: identity_field(object, VALID_FROM)?,
        })
    }
}

fn identity_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ModelError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ModelError::InvalidIdentityField {
            field,
            value: other.to_string(),
        }),
    }
}

/// Renders `currency|rule|tier|validFrom` for log output.
///
/// Missing parts show as `no-currency`, `NONE`, `default` and `no-date`. A
/// present value that happens to spell one of those is quoted.
impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (&self.currency_code, "no-currency"),
            (&self.pricing_rule, "NONE"),
            (&self.pricing_tier, "default"),
            (&self.valid_from, "no-date"),
        ];

        for (i, (value, placeholder)) in parts.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            match value {
                None => f.write_str(placeholder)?,
                Some(v) if v.as_str() == *placeholder => write!(f, "\"{}\"", v)?,
                Some(v) => f.write_str(v)?,
            }
        }
        Ok(())
    }
}

/// Quantity bounds as read from a price point
///
/// At least one bound is present; a point with neither is flat and has no
/// `QuantityRange` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl QuantityRange {
    /// Lower bound used for ordering: an absent minimum counts as 1
    pub fn effective_min(&self) -> u64 {
        self.min.unwrap_or(1)
    }

    /// True when the maximum lies below the effective minimum
    pub fn is_inverted(&self) -> bool {
        self.max.is_some_and(|max| max < self.effective_min())
    }
}

/// Upper bound assigned by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    /// No upper limit; `maxQuantity` is removed from the point
    Open,
    /// Inclusive limit written to `maxQuantity`
    Inclusive(u64),
}

impl UpperBound {
    pub fn as_option(self) -> Option<u64> {
        match self {
            UpperBound::Open => None,
            UpperBound::Inclusive(n) => Some(n),
        }
    }
}

/// One entry of a container's `pricePoints` array
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    position: usize,
    identity: IdentityKey,
    range: Option<QuantityRange>,
    fields: Map<String, Value>,
}

impl PricePoint {
    /// Validate a JSON value taken from position `position` of its array
    pub fn from_value(position: usize, value: Value) -> Result<Self, ModelError> {
        let Value::Object(fields) = value else {
            return Err(ModelError::NotAnObject);
        };

        let identity = IdentityKey::from_object(&fields)?;
        let min = quantity_field(&fields, MIN_QUANTITY)?;
        let max = quantity_field(&fields, MAX_QUANTITY)?;

        // An inverted range is still a range; the normalizer decides whether
        // its maximum survives
        let range = match (min, max) {
            (None, None) => None,
            (min, max) => Some(QuantityRange { min, max }),
        };

        Ok(Self {
            position,
            identity,
            range,
            fields,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn identity(&self) -> &IdentityKey {
        &self.identity
    }

    pub fn range(&self) -> Option<QuantityRange> {
        self.range
    }

    /// True when the point has a minimum or a maximum quantity
    pub fn is_ranged(&self) -> bool {
        self.range.is_some()
    }

    /// `(minQuantity, maxQuantity)` as currently set
    pub fn bounds(&self) -> (Option<u64>, Option<u64>) {
        match self.range {
            Some(range) => (range.min, range.max),
            None => (None, None),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Copy of this point with `maxQuantity` replaced
    ///
    /// An existing `maxQuantity` keeps its place among the fields; a new one is
    /// appended. `Open` removes the field without reordering the others.
    pub fn with_upper_bound(&self, bound: UpperBound) -> Self {
        let mut fields = self.fields.clone();
        match bound {
            UpperBound::Inclusive(n) => {
                fields.insert(MAX_QUANTITY.to_string(), Value::from(n));
            }
            UpperBound::Open => {
                fields.shift_remove(MAX_QUANTITY);
            }
        }

        let min = self.range.and_then(|r| r.min);
        Self {
            position: self.position,
            identity: self.identity.clone(),
            range: Some(QuantityRange {
                min,
                max: bound.as_option(),
            }),
            fields,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

fn quantity_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<u64>, ModelError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) if n >= 1 => Ok(Some(n)),
            _ => Err(ModelError::InvalidQuantity {
                field,
                value: value.to_string(),
            }),
        },
    }
}
