//! Resolve a free-text character + move query against the reverse index.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::data::dataset::{MoveRecord, TriggerMode};
use crate::frames::fuzzy::{extract_one, Score};
use crate::frames::index::{AliasTarget, FrameIndex};

pub const DEFAULT_CHARACTER_THRESHOLD: Score = 65;
pub const DEFAULT_MOVE_THRESHOLD: Score = 65;

/// Minimum fuzzy scores (0-100, inclusive) for each match stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchThresholds {
    pub character: Score,
    pub alias: Score,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            character: DEFAULT_CHARACTER_THRESHOLD,
            alias: DEFAULT_MOVE_THRESHOLD,
        }
    }
}

/// A resolved query: either a move record or a character stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome<'a> {
    Move {
        character: &'a str,
        move_key: &'a str,
        record: &'a MoveRecord,
    },
    Stat {
        character: &'a str,
        stat: &'a str,
        value: &'a Value,
    },
}

impl<'a> MatchOutcome<'a> {
    pub fn character(&self) -> &'a str {
        match self {
            Self::Move { character, .. } | Self::Stat { character, .. } => character,
        }
    }

    /// Move key or stat name.
    pub fn key(&self) -> &'a str {
        match self {
            Self::Move { move_key, .. } => move_key,
            Self::Stat { stat, .. } => stat,
        }
    }

    pub fn is_stat(&self) -> bool {
        matches!(self, Self::Stat { .. })
    }
}

fn shorthand_regex() -> &'static Regex {
    static SHORTHAND: OnceLock<Regex> = OnceLock::new();
    SHORTHAND.get_or_init(|| {
        Regex::new(r"^(?i)(cr|c|st|s|jp|j)[\s.]").expect("shorthand pattern is valid")
    })
}

/// Expand a leading `cr.`/`c `/`st.`/`s `/`jp.`/`j ` style prefix to the full word
/// the dataset uses (`crouch `, `stand `, `jump `). Other text is returned as is.
pub fn expand_shorthand(move_text: &str) -> Cow<'_, str> {
    let Some(caps) = shorthand_regex().captures(move_text) else {
        return Cow::Borrowed(move_text);
    };
    let Some(whole) = caps.get(0) else {
        return Cow::Borrowed(move_text);
    };
    let expanded = match caps[1].to_ascii_lowercase().as_str() {
        "cr" | "c" => "crouch ",
        "st" | "s" => "stand ",
        _ => "jump ",
    };
    Cow::Owned(format!("{expanded}{}", &move_text[whole.end()..]))
}

/// Tables consulted for a move, highest priority first.
fn lookup_order(trigger: Option<TriggerMode>) -> &'static [Option<TriggerMode>] {
    match trigger {
        Some(TriggerMode::One) => &[Some(TriggerMode::One), None],
        Some(TriggerMode::Two) => &[Some(TriggerMode::Two), None],
        None => &[None, Some(TriggerMode::One), Some(TriggerMode::Two)],
    }
}

/// Resolve `character_query` + `move_query` to a record. None means no match:
/// a stage scored under its threshold, or the index has no table holding the move.
pub fn match_move<'a>(
    index: &'a FrameIndex,
    character_query: &str,
    move_query: &str,
    trigger: Option<TriggerMode>,
    thresholds: MatchThresholds,
) -> Option<MatchOutcome<'a>> {
    let (character, character_score) = extract_one(character_query, index.character_names())?;
    log::debug!("character '{character_query}' -> '{character}' ({character_score})");
    if character_score < thresholds.character {
        return None;
    }
    let character_index = index.get(character)?;

    let move_text = expand_shorthand(move_query);
    let (alias, alias_score) = extract_one(&move_text, character_index.alias_keys())?;
    log::debug!("move '{move_text}' -> '{alias}' ({alias_score})");
    if alias_score < thresholds.alias {
        return None;
    }

    match character_index.aliases.get(alias)? {
        AliasTarget::Stat(value) => Some(MatchOutcome::Stat {
            character,
            stat: alias,
            value,
        }),
        AliasTarget::Move(move_key) => {
            let found = lookup_order(trigger).iter().find_map(|mode| {
                character_index
                    .moves
                    .table(*mode)
                    .get_key_value(move_key.as_str())
                    .map(|entry| (*mode, entry))
            });
            let Some((mode, (move_key, record))) = found else {
                log::debug!("no table consulted for {trigger:?} holds {character} '{move_key}'");
                return None;
            };
            log::debug!(
                "{character} '{move_key}' read from {}",
                mode.map_or("normal", TriggerMode::table_name)
            );
            Some(MatchOutcome::Move {
                character,
                move_key,
                record,
            })
        }
    }
}
