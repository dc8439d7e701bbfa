//! Maps a flat, delimited run of cell values onto named records.
//!
//! A blog column in the spreadsheet reads top to bottom as
//! `date, username, title, link, content, image, image, ---, date, ...`;
//! [`map_records`] cuts it at each delimiter and zips every group against the
//! declared field order. Values past the declared fields are collected under
//! the overflow key instead of being dropped.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// How a flat value sequence is grouped and named.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct RecordFormat {
    /// Group separator; `None` keeps the whole input as one group. A `null`
    /// delimiter is `Some(Value::Null)` and splits on `null` cells.
    #[serde(
        default,
        deserialize_with = "deserialize_delimiter",
        skip_serializing_if = "Option::is_none"
    )]
    pub delimiter: Option<Value>,
    /// Field names, by position within a group.
    pub order: Vec<String>,
    /// Field that receives values beyond `order.len()`.
    pub overflow_key: String,
}

impl RecordFormat {
    pub fn new<S: Into<String>>(
        delimiter: Option<Value>,
        order: impl IntoIterator<Item = S>,
        overflow_key: impl Into<String>,
    ) -> Self {
        Self {
            delimiter,
            order: order.into_iter().map(Into::into).collect(),
            overflow_key: overflow_key.into(),
        }
    }

    /// The last declared field, used to tell complete records from truncated ones.
    pub fn last_field(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }
}

/// Reads a delimiter that is present in the input as `Some`, `null` included.
/// Only a missing field means "no delimiter".
pub(crate) fn deserialize_delimiter<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One mapped group. Declared fields keep their declared order; a field with
/// no value in the group is absent (`None`) rather than an error.
///
/// Serializes as a JSON object with absent fields omitted and the overflow,
/// when present, last.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Option<Value>)>,
    overflow: Option<(String, Vec<Value>)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Present declared fields in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    pub fn overflow(&self) -> Option<&[Value]> {
        self.overflow.as_ref().map(|(_, values)| values.as_slice())
    }

    pub fn overflow_key(&self) -> Option<&str> {
        self.overflow.as_ref().map(|(k, _)| k.as_str())
    }

    /// Treats `null` declared fields as absent (blank cells read back as `null`).
    pub fn nulls_as_absent(mut self) -> Self {
        for (_, slot) in &mut self.fields {
            if matches!(slot, Some(Value::Null)) {
                *slot = None;
            }
        }
        self
    }

    /// Converts into a JSON object, dropping absent fields.
    pub fn into_json(self) -> serde_json::Map<String, Value> {
        let mut map: serde_json::Map<String, Value> = self
            .fields
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        if let Some((key, values)) = self.overflow {
            map.insert(key, Value::Array(values));
        }
        map
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        if let Some((key, values)) = &self.overflow {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Splits `values` at every element equal to the delimiter and maps each group
/// positionally onto `format.order`.
///
/// Always yields at least one record: an empty input is one empty group, and a
/// trailing delimiter leaves an empty trailing group.
pub fn map_records(values: &[Value], format: &RecordFormat) -> Vec<Record> {
    let groups: Vec<&[Value]> = match &format.delimiter {
        Some(delim) => values.split(|v| v == delim).collect(),
        None => vec![values],
    };
    groups
        .into_iter()
        .map(|group| map_group(group, format))
        .collect()
}

fn map_group(group: &[Value], format: &RecordFormat) -> Record {
    let fields = format
        .order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), group.get(i).cloned()))
        .collect();

    let overflow = (group.len() > format.order.len()).then(|| {
        (
            format.overflow_key.clone(),
            group[format.order.len()..].to_vec(),
        )
    });

    Record { fields, overflow }
}
