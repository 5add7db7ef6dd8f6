use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEPT: &str = "{dept}";
pub const DATE: &str = "{date}";
pub const START_TIME: &str = "{start_time}";
pub const END_TIME: &str = "{end_time}";
pub const AGENDA: &str = "{agenda}";
pub const ABSENT: &str = "{abs}";
/// Key whose list value is rendered as unbolded bullet points.
pub const NOTES: &str = "{_}";

/// Every key a complete minutes template expects, in form order.
pub const REQUIRED_KEYS: [&str; 7] = [DEPT, DATE, START_TIME, END_TIME, AGENDA, ABSENT, NOTES];

/// How a matched placeholder is rendered into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Single value appended as one bold run.
    Scalar,
    /// `{start_time}` / `{end_time}`: both values rendered together as
    /// `"<start> - <end>"` on whichever line is met first.
    TimeRange,
    /// `{_}`: one unbolded bullet paragraph per item.
    BulletList,
    /// Any other list: first item in place, the rest as bold paragraphs.
    BoldList,
}

impl PlaceholderKind {
    /// The value's shape decides first; key identity only refines it.
    pub fn resolve(key: &str, value: &ReplacementValue) -> Self {
        match value {
            ReplacementValue::Text(_) if key == START_TIME || key == END_TIME => Self::TimeRange,
            ReplacementValue::Text(_) => Self::Scalar,
            ReplacementValue::List(_) if key == NOTES => Self::BulletList,
            ReplacementValue::List(_) => Self::BoldList,
        }
    }
}

/// A placeholder token together with its resolved rendering kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    key: String,
    kind: PlaceholderKind,
}

impl Placeholder {
    /// The literal token searched for in paragraph text, e.g. `{dept}`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> PlaceholderKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplacementValue {
    Text(String),
    List(Vec<String>),
}

impl ReplacementValue {
    /// The value as a list; a single string is a list of one.
    pub fn items(&self) -> &[String] {
        match self {
            Self::Text(value) => std::slice::from_ref(value),
            Self::List(items) => items,
        }
    }
}

impl From<&str> for ReplacementValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ReplacementValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for ReplacementValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<const N: usize> From<[&str; N]> for ReplacementValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Ordered placeholder → value mapping.
///
/// Iteration follows insertion order. When a paragraph contains several
/// tokens, the entry inserted first is the one that gets substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    entries: Vec<(Placeholder, ReplacementValue)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value. Overwriting keeps the key's original
    /// position and re-resolves its kind against the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) {
        let key = key.into();
        let value = value.into();
        let kind = PlaceholderKind::resolve(&key, &value);

        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| p.key == key) {
            entry.0.kind = kind;
            entry.1 = value;
        } else {
            self.entries.push((Placeholder { key, kind }, value));
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ReplacementValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ReplacementValue> {
        self.entries
            .iter()
            .find(|(p, _)| p.key == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Placeholder, &ReplacementValue)> {
        self.entries.iter().map(|(p, v)| (p, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Required keys with no entry, in [`REQUIRED_KEYS`] order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.contains_key(key))
            .collect()
    }

    /// The combined `"<start> - <end>"` text. A time that is absent or not a
    /// single string renders as empty rather than failing.
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.text(START_TIME), self.text(END_TIME))
    }

    fn text(&self, key: &str) -> &str {
        match self.get(key) {
            Some(ReplacementValue::Text(s)) => s,
            _ => "",
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<ReplacementValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut replacements = Replacements::new();
        for (key, value) in iter {
            replacements.insert(key, value);
        }
        replacements
    }
}

impl Serialize for Replacements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (placeholder, value) in &self.entries {
            map.serialize_entry(&placeholder.key, value)?;
        }
        map.end()
    }
}

struct ReplacementsVisitor;

impl<'de> Visitor<'de> for ReplacementsVisitor {
    type Value = Replacements;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of placeholder keys to a string or a list of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut replacements = Replacements::new();
        while let Some((key, value)) = access.next_entry::<String, ReplacementValue>()? {
            replacements.insert(key, value);
        }
        Ok(replacements)
    }
}

impl<'de> Deserialize<'de> for Replacements {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ReplacementsVisitor)
    }
}
