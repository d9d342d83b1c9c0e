//! Reverse index: every alias a player might type (common name, plain command,
//! numpad notation, official name, stat name) -> canonical move key or stat.
//!
//! The index is always built into fresh containers from an immutable snapshot,
//! so building twice from the same data yields the same index.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::data::dataset::{display_value, Character, FrameDataset, MoveRecord, MoveTables};

/// Placeholder move name found in some dumps; it gets no derived aliases.
const UNDEFINED_MOVE: &str = "undefined";

const COMMON_NAME_FIELD: &str = "cmnCmd";
const PLAIN_COMMAND_FIELD: &str = "plnCmd";
const NUMPAD_FIELD: &str = "numCmd";

/// What an alias resolves to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AliasTarget {
    /// Canonical (lowercase) move key.
    Move(String),
    /// Character stat value.
    Stat(Value),
}

/// Indexed view of one character: lowercase move tables, stats and the alias map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterIndex {
    pub moves: MoveTables,
    pub stats: IndexMap<String, Value>,
    pub aliases: IndexMap<String, AliasTarget>,
}

impl CharacterIndex {
    pub fn alias_keys(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameIndex {
    pub characters: IndexMap<String, CharacterIndex>,
}

impl FrameIndex {
    /// Index every character. Characters are independent, so they are built in parallel;
    /// the resulting map keeps the dataset's character order.
    pub fn build(dataset: &FrameDataset) -> Self {
        let entries: Vec<(&String, &Character)> = dataset.characters.iter().collect();
        let indexed: Vec<(String, CharacterIndex)> = entries
            .par_iter()
            .map(|(name, character)| ((*name).clone(), index_character(character)))
            .collect();
        Self {
            characters: indexed.into_iter().collect(),
        }
    }

    pub fn get(&self, character: &str) -> Option<&CharacterIndex> {
        self.characters.get(character)
    }

    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.characters.values().map(|c| c.aliases.len()).sum()
    }
}

fn lowercase_table(table: &IndexMap<String, MoveRecord>) -> IndexMap<String, MoveRecord> {
    table
        .iter()
        .map(|(name, record)| (name.to_lowercase(), record.clone()))
        .collect()
}

fn alias_text(record: &MoveRecord, field: &str) -> Option<String> {
    let text = display_value(record.get(field)?);
    (!text.is_empty()).then_some(text)
}

/// Per-kind alias tables, merged in a fixed precedence once all moves are seen.
#[derive(Default)]
struct AliasTables {
    common: IndexMap<String, String>,
    commands: IndexMap<String, String>,
    numpad: IndexMap<String, String>,
}

impl AliasTables {
    /// Normal moves overwrite earlier common/numpad aliases; trigger-only moves never
    /// displace an existing alias. Plain commands are first-write-wins for both.
    /// A move without its own plain command borrows the one of its trigger variant.
    fn add(
        &mut self,
        move_key: &str,
        record: &MoveRecord,
        variant: Option<&MoveRecord>,
        trigger_only: bool,
    ) {
        if let Some(common) = alias_text(record, COMMON_NAME_FIELD) {
            insert_alias(&mut self.common, common, move_key, !trigger_only);
        }
        let command = alias_text(record, PLAIN_COMMAND_FIELD)
            .or_else(|| variant.and_then(|variant| alias_text(variant, PLAIN_COMMAND_FIELD)));
        if let Some(command) = command {
            insert_alias(&mut self.commands, command, move_key, false);
        }
        if let Some(numpad) = alias_text(record, NUMPAD_FIELD) {
            insert_alias(&mut self.numpad, numpad, move_key, !trigger_only);
        }
    }
}

fn insert_alias(table: &mut IndexMap<String, String>, alias: String, move_key: &str, overwrite: bool) {
    if overwrite {
        table.insert(alias, move_key.to_string());
    } else {
        table.entry(alias).or_insert_with(|| move_key.to_string());
    }
}

/// Build the indexed view of a single character.
///
/// Alias precedence, lowest to highest: common name, plain command, numpad,
/// official move name, trigger-only move name, stat name.
pub fn index_character(character: &Character) -> CharacterIndex {
    let moves = MoveTables {
        normal: lowercase_table(&character.moves.normal),
        vt_one: lowercase_table(&character.moves.vt_one),
        vt_two: lowercase_table(&character.moves.vt_two),
    };

    // Trigger-only moves; when both triggers carry one, the vtOne record supplies its aliases.
    let mut trigger_only: IndexMap<&str, &MoveRecord> = IndexMap::new();
    for (name, record) in moves.vt_one.iter().chain(moves.vt_two.iter()) {
        if !moves.normal.contains_key(name) {
            trigger_only.entry(name.as_str()).or_insert(record);
        }
    }

    let mut tables = AliasTables::default();
    for (name, record) in &moves.normal {
        if name != UNDEFINED_MOVE {
            let variant = moves.vt_one.get(name).or_else(|| moves.vt_two.get(name));
            tables.add(name, record, variant, false);
        }
    }
    for (name, record) in &trigger_only {
        if *name != UNDEFINED_MOVE {
            tables.add(name, record, None, true);
        }
    }

    let mut aliases: IndexMap<String, AliasTarget> = IndexMap::new();
    let derived = tables
        .common
        .into_iter()
        .chain(tables.commands)
        .chain(tables.numpad);
    for (alias, move_key) in derived {
        aliases.insert(alias, AliasTarget::Move(move_key));
    }
    for name in moves.normal.keys().map(String::as_str).chain(trigger_only.keys().copied()) {
        aliases.insert(name.to_string(), AliasTarget::Move(name.to_string()));
    }
    for (stat, value) in &character.stats {
        aliases.insert(stat.clone(), AliasTarget::Stat(value.clone()));
    }

    CharacterIndex {
        moves,
        stats: character.stats.clone(),
        aliases,
    }
}
