//! JSON encoding of sample values.
//!
//! Encoding is schema-free. Decoding is guided by the schema, since JSON
//! alone cannot tell a date from a string or an integer field from a float
//! that happens to be whole. For every value `v` conforming to a schema `s`,
//! `decode(s, &encode(&v)) == Ok(v)`.

use crate::document::parse_date;
use crate::schema::{LiteralValue, Primitive, SchemaNode};
use crate::values::{Record, SampleValue};
use crate::{element_path, field_path, ROOT_PATH};
use chrono::SecondsFormat;
use serde_json::{Map, Value as JsonValue};

/// Error type for schema-guided decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// JSON value has the wrong shape for the schema node
    #[error("{path}: expected {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A required struct field is absent
    #[error("{path}: missing required field")]
    MissingField { path: String },

    /// The JSON object carries a field the schema does not declare
    #[error("{path}: field not declared in schema")]
    UnknownField { path: String },

    /// A date string could not be parsed
    #[error("{path}: invalid date '{value}'")]
    InvalidDate { path: String, value: String },

    /// A finite number is required
    #[error("{path}: number is not finite")]
    NonFiniteNumber { path: String },
}

/// Encode a sample value as JSON. Record fields keep their order.
///
/// Dates become RFC 3339 strings with second precision and a `Z` suffix.
pub fn encode(value: &SampleValue) -> JsonValue {
    match value {
        SampleValue::String(s) => JsonValue::String(s.clone()),
        SampleValue::Integer(i) => JsonValue::from(*i),
        SampleValue::Number(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        SampleValue::Boolean(b) => JsonValue::Bool(*b),
        SampleValue::Date(dt) => JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        SampleValue::Record(record) => {
            let mut map = Map::with_capacity(record.len());
            for (name, v) in record.iter() {
                map.insert(name.to_string(), encode(v));
            }
            JsonValue::Object(map)
        }
        SampleValue::List(items) => JsonValue::Array(items.iter().map(encode).collect()),
    }
}

/// Decode a JSON value into a sample value shaped by `schema`.
///
/// Decoding checks shape only; run [`SchemaNode::check`] for constraints.
pub fn decode(schema: &SchemaNode, json: &JsonValue) -> Result<SampleValue, CodecError> {
    decode_at(schema, json, ROOT_PATH)
}

fn decode_at(schema: &SchemaNode, json: &JsonValue, path: &str) -> Result<SampleValue, CodecError> {
    let mismatch = || CodecError::TypeMismatch {
        path: path.to_string(),
        expected: schema.describe(),
        found: json_type_name(json).to_string(),
    };

    match schema {
        SchemaNode::Primitive(Primitive::String(_)) => json
            .as_str()
            .map(|s| SampleValue::String(s.to_string()))
            .ok_or_else(mismatch),

        SchemaNode::Primitive(Primitive::Number(c)) if c.integer => {
            json.as_i64().map(SampleValue::Integer).ok_or_else(mismatch)
        }

        SchemaNode::Primitive(Primitive::Number(_)) => {
            let f = json.as_f64().ok_or_else(mismatch)?;
            if !f.is_finite() {
                return Err(CodecError::NonFiniteNumber {
                    path: path.to_string(),
                });
            }
            Ok(SampleValue::Number(f))
        }

        SchemaNode::Primitive(Primitive::Boolean) => {
            json.as_bool().map(SampleValue::Boolean).ok_or_else(mismatch)
        }

        SchemaNode::Primitive(Primitive::Date(_)) => {
            let s = json.as_str().ok_or_else(mismatch)?;
            parse_date(s)
                .map(SampleValue::Date)
                .ok_or_else(|| CodecError::InvalidDate {
                    path: path.to_string(),
                    value: s.to_string(),
                })
        }

        SchemaNode::Literal(allowed) => decode_literal(allowed, json).ok_or_else(mismatch),

        SchemaNode::Struct(fields) => {
            let object = json.as_object().ok_or_else(mismatch)?;
            let mut record = Record::with_capacity(fields.len());
            for field in fields {
                let child = field_path(path, &field.name);
                match object.get(&field.name) {
                    Some(v) => record.insert(field.name.clone(), decode_at(&field.node, v, &child)?),
                    None if field.optional => {}
                    None => return Err(CodecError::MissingField { path: child }),
                }
            }
            if let Some(unknown) = object
                .keys()
                .find(|k| !fields.iter().any(|f| &f.name == *k))
            {
                return Err(CodecError::UnknownField {
                    path: field_path(path, unknown),
                });
            }
            Ok(SampleValue::Record(record))
        }

        SchemaNode::Collection(c) => {
            let items = json.as_array().ok_or_else(mismatch)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_at(&c.element, item, &element_path(path, Some(i))))
                .collect::<Result<Vec<_>, _>>()
                .map(SampleValue::List)
        }
    }
}

/// Pick the literal a JSON value denotes, preferring an exact integer match.
fn decode_literal(allowed: &[LiteralValue], json: &JsonValue) -> Option<SampleValue> {
    let candidate = match json {
        JsonValue::String(s) => LiteralValue::String(s.clone()),
        JsonValue::Bool(b) => LiteralValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) if allowed.contains(&LiteralValue::Integer(i)) => LiteralValue::Integer(i),
            _ => LiteralValue::Number(n.as_f64()?),
        },
        _ => return None,
    };
    allowed
        .contains(&candidate)
        .then(|| candidate.to_sample())
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DateConstraints, FieldSchema, NumberConstraints, StringConstraints};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn event_schema() -> SchemaNode {
        SchemaNode::structure(vec![
            FieldSchema::required("name", SchemaNode::string(StringConstraints::new())),
            FieldSchema::required("at", SchemaNode::date(DateConstraints::default())),
            FieldSchema::required("weight", SchemaNode::number(NumberConstraints::new())),
            FieldSchema::optional(
                "level",
                SchemaNode::literal(vec![LiteralValue::Integer(1), LiteralValue::Number(2.5)]),
            ),
            FieldSchema::required(
                "tags",
                SchemaNode::collection(SchemaNode::string(StringConstraints::new()), 0, None),
            ),
        ])
    }

    #[test]
    fn test_encode_record() {
        let mut record = Record::new();
        record.insert("name", SampleValue::String("deploy".to_string()));
        record.insert(
            "at",
            SampleValue::Date(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
        );
        record.insert("weight", SampleValue::Number(0.5));
        record.insert("tags", SampleValue::List(vec![]));

        assert_eq!(
            encode(&SampleValue::Record(record)),
            json!({"name": "deploy", "at": "2024-05-06T07:08:09Z", "weight": 0.5, "tags": []})
        );
    }

    #[test]
    fn test_decode_is_schema_guided() {
        let value = decode(
            &event_schema(),
            &json!({"name": "deploy", "at": "2024-05-06T07:08:09Z", "weight": 3, "level": 1, "tags": ["a"]}),
        )
        .unwrap();

        let record = value.as_record().unwrap();
        assert!(matches!(record.get("at"), Some(SampleValue::Date(_))));
        assert_eq!(record.get("weight"), Some(&SampleValue::Number(3.0)));
        assert_eq!(record.get("level"), Some(&SampleValue::Integer(1)));
    }

    #[test]
    fn test_roundtrip() {
        let schema = event_schema();
        let json = json!({"name": "x", "at": "2001-02-03T04:05:06Z", "weight": -1.25, "level": 2.5, "tags": ["p", "q"]});
        let value = decode(&schema, &json).unwrap();
        assert_eq!(decode(&schema, &encode(&value)).unwrap(), value);
        assert_eq!(encode(&value), json);
    }

    #[test]
    fn test_decode_errors() {
        let schema = event_schema();

        let err = decode(&schema, &json!({"name": "x", "weight": 1, "tags": []})).unwrap_err();
        assert_eq!(
            err,
            CodecError::MissingField {
                path: "$.at".to_string()
            }
        );

        let err = decode(
            &schema,
            &json!({"name": "x", "at": "2001-02-03", "weight": 1, "tags": [1]}),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref path, .. } if path == "$.tags[0]"));

        let err = decode(
            &schema,
            &json!({"name": "x", "at": "2001-02-03", "weight": 1, "tags": [], "extra": true}),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::UnknownField { .. }));
    }

    #[test]
    fn test_decode_integer_rejects_fraction() {
        let schema = SchemaNode::number(NumberConstraints::int_between(0, 10));
        assert!(decode(&schema, &json!(4)).is_ok());
        assert!(decode(&schema, &json!(4.5)).is_err());
    }
}
