//! Values exchanged with the remote application.
//!
//! [`RemoteValue`] is what every reply decodes into, whichever transport carried it. Replies
//! that arrive as plain text (the `qdbus` and `gdbus` paths) stay as [`RemoteValue::Str`] and
//! are coerced at the accessor boundary, so callers always go through `as_bool`, `as_i64`,
//! `into_records` and friends rather than matching on the variant directly.
//!
//! [`Arg`] is the outgoing side: the small set of argument shapes the scripting interface
//! accepts. Each transport encodes it its own way (see `bus::tools`).

use crate::error::BusError;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Ordered string-keyed record, as produced by a dict-entry array.
pub type Record = IndexMap<String, RemoteValue>;

/// A decoded reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum RemoteValue {
    /// The call returned nothing
    #[default]
    Void,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<RemoteValue>),
    Map(Record),
}

impl RemoteValue {
    pub fn is_void(&self) -> bool {
        matches!(self, RemoteValue::Void)
    }

    /// Boolean view. Accepts native booleans and the strings "true"/"false" in any case.
    pub fn as_bool(&self) -> bool {
        match self {
            RemoteValue::Bool(b) => *b,
            RemoteValue::Str(s) => s.trim().eq_ignore_ascii_case("true"),
            RemoteValue::Int(n) => *n != 0,
            _ => false,
        }
    }

    /// Integer view. Textual replies are parsed; floats are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RemoteValue::Int(n) => Some(*n),
            RemoteValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            RemoteValue::Bool(b) => Some(i64::from(*b)),
            RemoteValue::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
            _ => None,
        }
    }

    /// Like [`as_i64`](Self::as_i64) but with a fallback for unparseable replies.
    pub fn i64_or(&self, fallback: i64) -> i64 {
        self.as_i64().unwrap_or(fallback)
    }

    /// Floating point view. Textual replies are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RemoteValue::Float(f) => Some(*f),
            RemoteValue::Int(n) => Some(*n as f64),
            RemoteValue::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn f64_or(&self, fallback: f64) -> f64 {
        self.as_f64().unwrap_or(fallback)
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RemoteValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering of a scalar. `Void` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            RemoteValue::Void => String::new(),
            RemoteValue::Str(s) => s.clone(),
            RemoteValue::Int(n) => n.to_string(),
            RemoteValue::Float(f) => f.to_string(),
            RemoteValue::Bool(b) => b.to_string(),
            RemoteValue::List(_) | RemoteValue::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&RemoteValue> {
        match self {
            RemoteValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Record view. Maps pass through; a list of key/value pairs is folded into a record.
    /// Anything else yields an empty record.
    pub fn into_map(self) -> Record {
        match self {
            RemoteValue::Map(map) => map,
            RemoteValue::List(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    RemoteValue::List(mut pair) if pair.len() == 2 => {
                        let value = pair.pop()?;
                        let key = pair.pop()?;
                        Some((key.to_text(), value))
                    }
                    _ => None,
                })
                .collect(),
            _ => Record::new(),
        }
    }

    /// Sequence view. Textual replies from the plain-text tools list one element per line.
    pub fn into_list(self) -> Vec<RemoteValue> {
        match self {
            RemoteValue::List(items) => items,
            RemoteValue::Void => Vec::new(),
            RemoteValue::Str(s) => s
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| RemoteValue::Str(line.to_string()))
                .collect(),
            other => vec![other],
        }
    }

    /// List of records. Elements that are not record-shaped are dropped.
    pub fn into_records(self) -> Vec<Record> {
        self.into_list()
            .into_iter()
            .filter(|item| matches!(item, RemoteValue::Map(_) | RemoteValue::List(_)))
            .map(RemoteValue::into_map)
            .collect()
    }

    pub fn into_string_list(self) -> Vec<String> {
        self.into_list().iter().map(RemoteValue::to_text).collect()
    }

    pub fn into_i64_list(self) -> Vec<i64> {
        self.into_list()
            .iter()
            .filter_map(RemoteValue::as_i64)
            .collect()
    }
}

impl From<&str> for RemoteValue {
    fn from(value: &str) -> Self {
        RemoteValue::Str(value.to_string())
    }
}

impl From<String> for RemoteValue {
    fn from(value: String) -> Self {
        RemoteValue::Str(value)
    }
}

impl From<i64> for RemoteValue {
    fn from(value: i64) -> Self {
        RemoteValue::Int(value)
    }
}

impl From<f64> for RemoteValue {
    fn from(value: f64) -> Self {
        RemoteValue::Float(value)
    }
}

impl From<bool> for RemoteValue {
    fn from(value: bool) -> Self {
        RemoteValue::Bool(value)
    }
}

/// Field lookups on records returned by the scripting interface.
pub trait RecordExt {
    fn text(&self, key: &str) -> String;
    fn int(&self, key: &str) -> Option<i64>;
    fn flag(&self, key: &str) -> bool;
}

impl RecordExt for Record {
    fn text(&self, key: &str) -> String {
        self.get(key).map(RemoteValue::to_text).unwrap_or_default()
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(RemoteValue::as_i64)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).map(RemoteValue::as_bool).unwrap_or(false)
    }
}

/// An outgoing call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Arg>),
}

impl Arg {
    /// True for integers that are not booleans. Booleans are their own variant here, so this
    /// is just a variant check.
    pub fn is_plain_int(&self) -> bool {
        matches!(self, Arg::Int(_))
    }

    pub fn strings<I, S>(items: I) -> Arg
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arg::List(items.into_iter().map(|s| Arg::Str(s.into())).collect())
    }

    pub fn ints<I>(items: I) -> Arg
    where
        I: IntoIterator<Item = i64>,
    {
        Arg::List(items.into_iter().map(Arg::Int).collect())
    }

    /// Fail on any integer, at any depth, that does not fit the `int32` the bus carries.
    pub fn check_int32(&self) -> Result<(), BusError> {
        match self {
            Arg::Int(n) => int32(*n).map(|_| ()),
            Arg::List(items) => items.iter().try_for_each(Arg::check_int32),
            _ => Ok(()),
        }
    }
}

/// Narrow an integer argument to `int32`.
pub fn int32(n: i64) -> Result<i32, BusError> {
    i32::try_from(n)
        .map_err(|_| BusError::InvalidArgument(format!("{n} does not fit in an int32 argument")))
}

/// Bare text form used by the plain-text tools and inside string arrays.
impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Bool(b) => write!(f, "{b}"),
            Arg::Int(n) => write!(f, "{n}"),
            Arg::Float(x) => write!(f, "{x}"),
            Arg::Str(s) => f.write_str(s),
            Arg::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(value: Vec<T>) -> Self {
        Arg::List(value.into_iter().map(Into::into).collect())
    }
}

/// Build an argument slice from heterogeneous values.
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::bus::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::bus::Arg::from($value)),+]
    };
}
