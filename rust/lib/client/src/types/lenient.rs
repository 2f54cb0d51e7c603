//! Deserializers for PHP-flavoured JSON.
//!
//! `mysqli` hands every column back as a string, so the same field may
//! arrive as `12`, `"12"`, `true`, `"1"` or `null` depending on endpoint.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Scalar {
    fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) => Some(*f as i64),
            Scalar::Bool(b) => Some(i64::from(*b)),
            Scalar::Str(s) => s.trim().parse().ok(),
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int(n) => Some(*n != 0),
            Scalar::Float(f) => Some(*f != 0.0),
            Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" | "" => Some(false),
                _ => None,
            },
        }
    }
}

/// Integer from a number or numeric string. Null or missing is an error.
pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = Scalar::deserialize(d)?;
    raw.as_int()
        .ok_or_else(|| serde::de::Error::custom("expected an integer"))
}

/// Integer where null, missing or garbage reads as 0 (counters).
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = Option::<Scalar>::deserialize(d)?;
    Ok(raw.and_then(|s| s.as_int()).unwrap_or(0))
}

/// Optional integer (nullable foreign keys).
pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<Scalar>::deserialize(d)?;
    Ok(raw.and_then(|s| s.as_int()))
}

/// Boolean from bool, 0/1, or their string forms. Null reads as false.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = Option::<Scalar>::deserialize(d)?;
    Ok(raw.and_then(|s| s.as_bool()).unwrap_or(false))
}

/// String where numbers are stringified and null stays `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Scalar>::deserialize(d)?;
    Ok(raw.map(|s| match s {
        Scalar::Str(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
