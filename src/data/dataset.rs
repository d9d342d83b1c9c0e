//! Frame data model: character -> {moves by trigger mode, stats}.
//! Maps keep source order so fuzzy ties resolve the same way on every load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whole dataset as loaded from disk. Keys are character names, case preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameDataset {
    pub characters: IndexMap<String, Character>,
}

impl FrameDataset {
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub moves: MoveTables,
    /// Stat name -> opaque value (usually an array of frame counts or distances).
    #[serde(default)]
    pub stats: IndexMap<String, Value>,
}

/// The three fixed move tables of a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveTables {
    #[serde(default)]
    pub normal: IndexMap<String, MoveRecord>,
    #[serde(default, rename = "vtOne")]
    pub vt_one: IndexMap<String, MoveRecord>,
    #[serde(default, rename = "vtTwo")]
    pub vt_two: IndexMap<String, MoveRecord>,
}

impl MoveTables {
    pub fn table(&self, mode: Option<TriggerMode>) -> &IndexMap<String, MoveRecord> {
        match mode {
            None => &self.normal,
            Some(TriggerMode::One) => &self.vt_one,
            Some(TriggerMode::Two) => &self.vt_two,
        }
    }
}

/// V-Trigger mode requested with `vt1` / `vt2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerMode {
    One,
    Two,
}

impl TriggerMode {
    /// Only the trailing digit of the `vt1`/`vt2` token matters.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::One),
            '2' => Some(Self::Two),
            _ => None,
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            Self::One => "vtOne",
            Self::Two => "vtTwo",
        }
    }
}

/// One move: named fields (plnCmd, startup, onHit, custom fields, extraInfo...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveRecord(pub IndexMap<String, Value>);

impl MoveRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for MoveRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Render a dataset value for chat output. Strings are shown raw, arrays as `[a, b]`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "None".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(_) => value.to_string(),
    }
}
