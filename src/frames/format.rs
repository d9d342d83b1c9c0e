//! Render a matched move or stat as chat text, plus the optional rich (embed) message.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::data::dataset::{display_value, MoveRecord};
use crate::error::FrameError;
use crate::frames::fuzzy::{extract_one, Score};
use crate::frames::matcher::MatchOutcome;

pub const RICH_COLOR: u32 = 0x3998C6;

/// A stat category is shown in full only when the query scores strictly above this.
const STAT_CATEGORY_CUTOFF: Score = 85;

const KNOCKDOWN_MARKER: &str = "KD";
const EXTRA_INFO_FIELD: &str = "extraInfo";

/// Stat categories a query like "dash" or "jump" expands to.
pub const STAT_CATEGORIES: &[(&str, &[&str])] = &[
    ("dash", &["bDash", "fDash", "bDashDist", "fDashDist"]),
    ("walk", &["bWalk", "fWalk"]),
    ("jump", &["bJump", "fJump", "nJump", "bJumpDist", "fJumpDist"]),
    ("throw", &["throwHurt", "throwRange"]),
];

const FRAME_FIELDS: &[(&str, &str)] = &[
    ("startup", "Startup"),
    ("active", "Active"),
    ("recovery", "Recovery"),
    ("onHit", "On Hit"),
    ("onBlock", "On Block"),
];

const KNOCKDOWN_FIELDS: &[(&str, &str)] = &[
    ("kd", "Knockdown Adv"),
    ("kdr", "Quick Rise Adv"),
    ("kdrb", "Back Roll Adv"),
];

const CUSTOM_FIELDS: &[&str] = &[
    "vtc2DashOnHit", "runstopOB", "vtc1OnHit", "vtc2OnHit",
    "ocOnBlock", "ssOnHit", "vscoH", "vtc1OnBlockD",
    "vtc1GapOnBlock", "LKorMKDashOH", "vscoB", "LKorMKDashOB",
    "ssOnBlock", "vtcOnBlock", "lmaoB", "VSKGapBlock",
    "vtcOnHitD", "lmaoH", "vt1dashOB", "vtc2OnBlock",
    "vtc1OnBlockB", "vtcOnBlockD", "vtc1OnBlock", "hopsOnBlock",
    "VSKGapHit", "vtc1OnHitB", "ocOnHit", "vtc1OnHitF",
    "rollcOnBlock", "transfOH", "exDashOB", "VSPGapHit", "lkDashOH",
    "vtc1GapOnHit", "vtc1OnBlockF", "transfOB", "lkDashOB",
    "vtcOnHit", "exDashOH", "mkDashOB", "runstopOH", "vt1dashOH",
    "rollcOnHit", "vtc1OnHitD", "hopsOnHit", "vtcOnHitF",
    "vtcOnBlockB", "vtcOnHitB", "vtc2GapOnBlock", "vtcOnBlockF",
    "vtc2DashOnBlock", "VSPGapBlock", "mkDashOH",
    "KnifeReloadOH", "KnifeReloadOB", "BeanBallOH", "BeanBallOB",
];

/// Character-specific extended fields, in byte order (uppercase names first).
pub fn custom_fields() -> &'static [&'static str] {
    static SORTED: OnceLock<Vec<&'static str>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut fields = CUSTOM_FIELDS.to_vec();
        fields.sort_unstable();
        fields
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral embed: the chat wrapper maps it onto its own message type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichMessage {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<RichField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl RichMessage {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color: RICH_COLOR,
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(RichField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
    }
}

/// One outbound chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Text { text: String },
    Rich { text: String, message: RichMessage },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } | Self::Rich { text, .. } => text,
        }
    }

    pub fn rich_message(&self) -> Option<&RichMessage> {
        match self {
            Self::Rich { message, .. } => Some(message),
            Self::Text { .. } => None,
        }
    }
}

/// Escape `*` so the chat platform does not treat it as formatting. Non-strings are only rendered.
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('*', "\\*"),
        other => display_value(other),
    }
}

fn cell(record: &MoveRecord, field: &str) -> String {
    record.get(field).map(escape_value).unwrap_or_else(|| "-".to_string())
}

fn causes_knockdown(record: &MoveRecord) -> bool {
    record.contains("kd") && record.get_str("onHit") == Some(KNOCKDOWN_MARKER)
}

/// Fixed one-line frame data template, extended with knockdown advantage when relevant.
pub fn format_move_text(character: &str, move_key: &str, record: &MoveRecord) -> String {
    let mut output = format!(
        "{character} - ({move_key} - {}) - [Startup]: {} [Active]: {} [Recovery]: {} [On Hit]: {} [On Block]: {}",
        cell(record, "plnCmd"),
        cell(record, "startup"),
        cell(record, "active"),
        cell(record, "recovery"),
        cell(record, "onHit"),
        cell(record, "onBlock"),
    );
    if causes_knockdown(record) {
        output.push_str(&format!(
            " [KD Adv]: {} [Quick Rise Adv]: {} [Back Rise Adv]: {} ",
            cell(record, "kd"),
            cell(record, "kdr"),
            cell(record, "kdrb"),
        ));
    }
    output
}

/// Stat output. A query close to a category name ("dash", "jump"...) lists every
/// stat of that category the character has; otherwise only the matched stat.
pub fn format_stat_text(
    character: &str,
    stat: &str,
    value: &Value,
    stats: &IndexMap<String, Value>,
    searched_move: &str,
) -> String {
    let labels = STAT_CATEGORIES.iter().map(|(label, _)| *label);
    let category = extract_one(searched_move, labels)
        .filter(|(_, score)| *score > STAT_CATEGORY_CUTOFF)
        .and_then(|(label, _)| STAT_CATEGORIES.iter().find(|(name, _)| *name == label));

    match category {
        Some((_, fields)) => {
            let mut output = format!("{character} -");
            for field in fields.iter() {
                if let Some(value) = stats.get(*field) {
                    output.push_str(&format!(" [{field}] - {}", escape_value(value)));
                }
            }
            output
        }
        None => format!("{character} - [{stat}] - {}", escape_value(value)),
    }
}

/// `extraInfo` as a list of notes. Some dumps store the array JSON-encoded in a string.
pub fn extra_info(
    character: &str,
    move_key: &str,
    record: &MoveRecord,
) -> Result<Option<Vec<String>>, FrameError> {
    let items = match record.get(EXTRA_INFO_FIELD) {
        None => return Ok(None),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(raw)) => {
            serde_json::from_str::<Vec<Value>>(raw).map_err(|source| {
                log::error!("bad extraInfo encoding for {character} - {move_key}");
                FrameError::ExtraInfo {
                    character: character.to_string(),
                    move_key: move_key.to_string(),
                    source,
                }
            })?
        }
        Some(other) => vec![other.clone()],
    };
    Ok(Some(items.iter().map(display_value).collect()))
}

/// Rich message with the frame data fields and the extra info footer.
pub fn rich_message(
    character: &str,
    move_key: &str,
    record: &MoveRecord,
) -> Result<RichMessage, FrameError> {
    let command = cell(record, "plnCmd");
    let mut message = RichMessage::new(character, format!("{move_key} - {command}"));

    for (field, label) in FRAME_FIELDS.iter().chain(KNOCKDOWN_FIELDS) {
        if let Some(value) = record.get(field) {
            message.add_field(*label, escape_value(value));
        }
    }

    if let Some(notes) = extra_info(character, move_key, record)? {
        message.footer = Some(notes.join(", "));
    }
    Ok(message)
}

/// Append present custom fields (sorted) to both outputs, then the extra info block to the text.
pub fn append_custom_fields(
    character: &str,
    move_key: &str,
    record: &MoveRecord,
    text: &mut String,
    message: &mut RichMessage,
) -> Result<(), FrameError> {
    for field in custom_fields() {
        if let Some(value) = record.get(field) {
            let value = escape_value(value);
            text.push_str(&format!(" [{field}]: {value}"));
            message.add_field(*field, value);
        }
    }

    if let Some(notes) = extra_info(character, move_key, record)? {
        text.push_str(&format!(" ```{}``` ", notes.join(", ")));
    }
    Ok(())
}

/// Render a match. Verbose output only applies to moves; stats are always plain text.
pub fn format_reply(
    outcome: &MatchOutcome<'_>,
    stats: &IndexMap<String, Value>,
    searched_move: &str,
    verbose: bool,
) -> Result<Reply, FrameError> {
    match *outcome {
        MatchOutcome::Stat {
            character,
            stat,
            value,
        } => Ok(Reply::text(format_stat_text(
            character,
            stat,
            value,
            stats,
            searched_move,
        ))),
        MatchOutcome::Move {
            character,
            move_key,
            record,
        } => {
            let mut text = format_move_text(character, move_key, record);
            if !verbose {
                return Ok(Reply::Text { text });
            }
            let mut message = rich_message(character, move_key, record)?;
            append_custom_fields(character, move_key, record, &mut text, &mut message)?;
            Ok(Reply::Rich { text, message })
        }
    }
}
