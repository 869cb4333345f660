//! Concrete sample values.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A generated value conforming to some [`SchemaNode`](crate::SchemaNode).
///
/// Values carry no identity beyond their data and are owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    String(String),
    /// Number generated under an `integer` refinement
    Integer(i64),
    Number(f64),
    Boolean(bool),
    /// Whole-second UTC timestamp
    Date(DateTime<Utc>),
    Record(Record),
    List(Vec<SampleValue>),
}

impl SampleValue {
    /// Short name of the value's variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SampleValue::String(_) => "string",
            SampleValue::Integer(_) => "integer",
            SampleValue::Number(_) => "number",
            SampleValue::Boolean(_) => "boolean",
            SampleValue::Date(_) => "date",
            SampleValue::Record(_) => "record",
            SampleValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SampleValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SampleValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            SampleValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SampleValue]> {
        match self {
            SampleValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SampleValue::String(s) => serializer.serialize_str(s),
            SampleValue::Integer(i) => serializer.serialize_i64(*i),
            SampleValue::Number(f) => serializer.serialize_f64(*f),
            SampleValue::Boolean(b) => serializer.serialize_bool(*b),
            SampleValue::Date(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            SampleValue::Record(record) => record.serialize(serializer),
            SampleValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Keyed record whose fields keep the schema's declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, SampleValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field, replacing the value of an existing field with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: SampleValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&SampleValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SampleValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, SampleValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, SampleValue)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
