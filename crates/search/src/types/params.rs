//! Raw request parameters.
//!
//! Search requests arrive as PHP-style bracketed query strings:
//!
//! ```text
//! limit=25&page=2&orderBy=date&ascending=0
//!     &filters[city]=3
//!     &filters[content][]=7&filters[content][]=9
//!     &filters[date][from]=1100&filters[date][to]=1200
//! ```
//!
//! [`RawParams`] parses such a string into a small tree of [`ParamValue`]s
//! and serializes it back. Nothing in here validates values; that is the
//! job of the sanitizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single node of the parameter tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `key=value`
    Scalar(String),
    /// `key[]=a&key[]=b`
    List(Vec<String>),
    /// `key[sub]=value`
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Returns the value if this node is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this node is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            ParamValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns every string carried by a scalar or list node.
    ///
    /// Maps carry no flat values and yield an empty vector.
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Scalar(s) => vec![s.as_str()],
            ParamValue::List(items) => items.iter().map(String::as_str).collect(),
            ParamValue::Map(_) => Vec::new(),
        }
    }
}

/// Parsed request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParams {
    root: BTreeMap<String, ParamValue>,
}

impl RawParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    pub fn parse_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Builds the tree from already decoded `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert_path(key.as_ref(), value.into());
        }
        params
    }

    /// Inserts a value under a bracketed key such as `filters[date][from]`.
    pub fn insert_path(&mut self, key: &str, value: String) {
        let Some((base, segments)) = split_key(key) else {
            return;
        };
        insert_into(&mut self.root, &base, &segments, value);
    }

    /// Sets a top-level node, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.root.insert(key.into(), value);
    }

    /// Returns a top-level node.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.root.get(key)
    }

    /// Returns a top-level scalar.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_scalar)
    }

    /// Returns true when no parameter was supplied.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Iterates over the top-level nodes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.root.iter()
    }

    /// Serializes the tree back into a query string.
    ///
    /// Keys are emitted in sorted order so that equal trees always produce
    /// byte-equal strings.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.root {
            append_pairs(&mut serializer, key, value);
        }
        serializer.finish()
    }
}

fn split_key(key: &str) -> Option<(String, Vec<String>)> {
    let (base, mut rest) = match key.find('[') {
        Some(0) => return None,
        Some(idx) => (&key[..idx], &key[idx..]),
        None => (key, ""),
    };
    if base.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(end) = stripped.find(']') else {
            // unterminated bracket: treat the remainder as part of the name
            return Some((key.to_string(), Vec::new()));
        };
        segments.push(stripped[..end].to_string());
        rest = &stripped[end + 1..];
    }
    Some((base.to_string(), segments))
}

fn insert_into(
    map: &mut BTreeMap<String, ParamValue>,
    key: &str,
    segments: &[String],
    value: String,
) {
    match segments.split_first() {
        None => {
            map.insert(key.to_string(), ParamValue::Scalar(value));
        }
        Some((last, [])) if last.is_empty() || last.parse::<usize>().is_ok() => {
            let slot = map
                .entry(key.to_string())
                .or_insert_with(|| ParamValue::List(Vec::new()));
            match slot {
                ParamValue::List(items) => items.push(value),
                ParamValue::Scalar(existing) => {
                    let existing = std::mem::take(existing);
                    *slot = ParamValue::List(vec![existing, value]);
                }
                ParamValue::Map(_) => *slot = ParamValue::List(vec![value]),
            }
        }
        Some((next, rest)) => {
            let slot = map
                .entry(key.to_string())
                .or_insert_with(|| ParamValue::Map(BTreeMap::new()));
            if !matches!(slot, ParamValue::Map(_)) {
                *slot = ParamValue::Map(BTreeMap::new());
            }
            if let ParamValue::Map(inner) = slot {
                insert_into(inner, next, rest, value);
            }
        }
    }
}

fn append_pairs(
    serializer: &mut url::form_urlencoded::Serializer<'_, String>,
    prefix: &str,
    value: &ParamValue,
) {
    match value {
        ParamValue::Scalar(s) => {
            serializer.append_pair(prefix, s);
        }
        ParamValue::List(items) => {
            let key = format!("{prefix}[]");
            for item in items {
                serializer.append_pair(&key, item);
            }
        }
        ParamValue::Map(inner) => {
            for (sub, nested) in inner {
                append_pairs(serializer, &format!("{prefix}[{sub}]"), nested);
            }
        }
    }
}
