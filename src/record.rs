//! Generic records and weakly typed field decoding
//!
//! A [`Record`] is the untyped key/value mapping a config loader hands over
//! (a Clash-style `proxies` entry, for instance). Option types pull their
//! fields out of it through `Fields`, which tolerates compatible type
//! mismatches:
//!
//! | Target | Accepted |
//! |--------|----------|
//! | string | string, integer (base 10) |
//! | integer | integer, integral float, string (`0x`/`0o`/`0b`/leading `0` prefixes, optional sign) |
//! | boolean | boolean, integer (non-zero is `true`), string (`1 t T TRUE true True 0 f F FALSE false False`) |
//! | string map | object whose values decode as strings |
//! | string list | array whose items decode as strings |
//!
//! `null` is treated as an absent key.

use crate::error::{LinkError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped proxy record: string keys mapped to arbitrary JSON-like values
pub type Record = serde_json::Map<String, Value>;

/// Read-only view over a record (or a nested object of one) that decodes typed fields.
///
/// Field names in errors are the record keys, dotted for nested objects
/// (`http-opts.method`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Record,
    parent: Option<&'a str>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(map: &'a Record) -> Self {
        Fields { map, parent: None }
    }

    fn path(&self, key: &str) -> String {
        match self.parent {
            Some(parent) => format!("{}.{}", parent, key),
            None => key.to_string(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str) -> LinkError {
        LinkError::decode(&self.path(key), format!("key '{}' missing", key))
    }

    pub(crate) fn string(&self, key: &str) -> Result<Option<String>> {
        self.get(key)
            .map(|v| coerce_string(v).ok_or_else(|| self.mismatch(key, "string", v)))
            .transpose()
    }

    pub(crate) fn string_or_default(&self, key: &str) -> Result<String> {
        Ok(self.string(key)?.unwrap_or_default())
    }

    pub(crate) fn required_string(&self, key: &str) -> Result<String> {
        self.string(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn int(&self, key: &str) -> Result<Option<i64>> {
        self.get(key)
            .map(|v| coerce_int(v).ok_or_else(|| self.mismatch(key, "int", v)))
            .transpose()
    }

    /// Integer that must fit in `u16` (ports, alter ids).
    pub(crate) fn u16(&self, key: &str) -> Result<Option<u16>> {
        match self.int(key)? {
            Some(n) => u16::try_from(n).map(Some).map_err(|_| {
                LinkError::decode(&self.path(key), format!("{} out of range 0-65535", n))
            }),
            None => Ok(None),
        }
    }

    pub(crate) fn required_port(&self, key: &str) -> Result<u16> {
        self.u16(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn bool(&self, key: &str) -> Result<bool> {
        self.get(key)
            .map(|v| coerce_bool(v).ok_or_else(|| self.mismatch(key, "bool", v)))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub(crate) fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.mismatch(key, "slice", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                coerce_string(item)
                    .ok_or_else(|| self.mismatch(&format!("{}[{}]", key, i), "string", item))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub(crate) fn string_map(&self, key: &'a str) -> Result<BTreeMap<String, String>> {
        let Some(nested) = self.object(key)? else {
            return Ok(BTreeMap::new());
        };
        nested
            .map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                coerce_string(v)
                    .map(|s| (k.clone(), s))
                    .ok_or_else(|| nested.mismatch(k, "string", v))
            })
            .collect()
    }

    /// Object under `key` with its values left untyped.
    pub(crate) fn value_map(&self, key: &'a str) -> Result<BTreeMap<String, Value>> {
        let Some(nested) = self.object(key)? else {
            return Ok(BTreeMap::new());
        };
        Ok(nested
            .map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    pub(crate) fn string_list_map(
        &self,
        key: &'a str,
    ) -> Result<Option<BTreeMap<String, Vec<String>>>> {
        let Some(nested) = self.object(key)? else {
            return Ok(None);
        };
        let mut out = BTreeMap::new();
        for k in nested.map.keys() {
            if let Some(list) = nested.string_list(k)? {
                out.insert(k.clone(), list);
            }
        }
        Ok(Some(out))
    }

    /// Nested object under `key`; its errors are reported as `key.child`.
    pub(crate) fn object(&self, key: &'a str) -> Result<Option<Fields<'a>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            Value::Object(map) => Ok(Some(Fields {
                map,
                parent: Some(key),
            })),
            other => Err(self.mismatch(key, "map", other)),
        }
    }

    fn mismatch(&self, key: &str, expected: &str, got: &Value) -> LinkError {
        LinkError::decode(
            &self.path(key),
            format!(
                "expected type '{}', got unconvertible type '{}'",
                expected,
                kind(got)
            ),
        )
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "slice",
        Value::Object(_) => "map",
    }
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        return None;
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if !n.is_f64() => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => integral(n),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => integral(n).map(|i| i != 0),
        Value::String(s) => match s.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses an integer literal the way config authors write them: optional
/// sign, then `0x`, `0o`, `0b` or a leading `0` (octal) selecting the radix.
fn parse_int(s: &str) -> Option<i64> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    if negative {
        magnitude.checked_neg()
    } else {
        Some(magnitude)
    }
}
