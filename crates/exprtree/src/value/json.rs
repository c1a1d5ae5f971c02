//! JSON encoding of values
//!
//! Plain JSON scalars map to themselves. Every other kind is written as an
//! object tagged with a `"kind"` field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value as Json};

use super::display::format_number;
use super::*;
use crate::error::{ExprError, Result};

const TAG: &str = "kind";

fn number_to_json(n: f64) -> Json {
    match serde_json::Number::from_f64(n) {
        Some(num) => Json::Number(num),
        None => Json::String(format_number(n)),
    }
}

fn json_to_number(json: &Json) -> Option<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}

fn field<'a>(map: &'a Map<String, Json>, kind: &str, name: &str) -> Result<&'a Json> {
    map.get(name)
        .ok_or_else(|| ExprError::malformed(kind, format!("missing field `{}`", name)))
}

fn number_field(map: &Map<String, Json>, kind: &str, name: &str) -> Result<f64> {
    json_to_number(field(map, kind, name)?)
        .ok_or_else(|| ExprError::malformed(kind, format!("field `{}` is not a number", name)))
}

fn list_field(map: &Map<String, Json>, kind: &str, name: &str) -> Result<Vec<Value>> {
    match field(map, kind, name)? {
        Json::Array(items) => items.iter().map(Value::from_json).collect(),
        _ => Err(ExprError::malformed(kind, format!("field `{}` is not an array", name))),
    }
}

impl Value {
    /// Encode this value as JSON.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) if n.is_finite() => number_to_json(*n),
            Value::Number(n) => json!({ TAG: "Number", "value": format_number(*n) }),
            Value::String(s) => Json::String(s.to_string()),

            Value::BigNumber(n) => json!({ TAG: "BigNumber", "value": n.to_string() }),
            Value::Complex(c) => json!({
                TAG: "Complex",
                "re": number_to_json(c.re),
                "im": number_to_json(c.im),
            }),
            Value::Unit(u) => json!({
                TAG: "Unit",
                "value": u.value.map(number_to_json),
                "unit": u.unit,
            }),

            Value::Matrix(items) => json!({
                TAG: "DenseMatrix",
                "data": items.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
            Value::Object(map) => {
                let entries: Map<String, Json> =
                    map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                json!({ TAG: "Object", "entries": entries })
            }
            Value::ResultSet(items) => json!({
                TAG: "ResultSet",
                "entries": items.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
        }
    }

    /// Decode a value previously produced by [`Value::to_json`].
    ///
    /// A bare JSON array is accepted as a matrix.
    pub fn from_json(json: &Json) -> Result<Value> {
        match json {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| ExprError::malformed("Number", "not representable as f64")),
            Json::String(s) => Ok(Value::string(s.as_str())),
            Json::Array(items) => Ok(Value::matrix(
                items.iter().map(Value::from_json).collect::<Result<_>>()?,
            )),
            Json::Object(map) => {
                let kind = map
                    .get(TAG)
                    .and_then(Json::as_str)
                    .ok_or_else(|| ExprError::malformed("value", "missing `kind` tag"))?;

                match kind {
                    "Number" => Ok(Value::Number(number_field(map, kind, "value")?)),
                    "BigNumber" => {
                        let digits = field(map, kind, "value")?
                            .as_str()
                            .ok_or_else(|| ExprError::malformed(kind, "value is not a string"))?;
                        Ok(Value::BigNumber(digits.parse()?))
                    }
                    "Complex" => Ok(Value::complex(
                        number_field(map, kind, "re")?,
                        number_field(map, kind, "im")?,
                    )),
                    "Unit" => {
                        let value = match map.get("value") {
                            None | Some(Json::Null) => None,
                            Some(_) => Some(number_field(map, kind, "value")?),
                        };
                        let unit = field(map, kind, "unit")?
                            .as_str()
                            .ok_or_else(|| ExprError::malformed(kind, "unit is not a string"))?;
                        Ok(Value::unit(UnitValue {
                            value,
                            unit: unit.to_string(),
                        }))
                    }
                    "DenseMatrix" => Ok(Value::matrix(list_field(map, kind, "data")?)),
                    "Object" => match field(map, kind, "entries")? {
                        Json::Object(entries) => Ok(Value::object(
                            entries
                                .iter()
                                .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
                                .collect::<Result<_>>()?,
                        )),
                        _ => Err(ExprError::malformed(kind, "entries is not an object")),
                    },
                    "ResultSet" => Ok(Value::result_set(list_field(map, kind, "entries")?)),
                    other => Err(ExprError::malformed(
                        "value",
                        format!("unknown value kind \"{}\"", other),
                    )),
                }
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Value::from_json(&json).map_err(serde::de::Error::custom)
    }
}
