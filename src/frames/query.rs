//! Grammar of the frames command: `[-v] <character> [vt1|vt2] <move...>`.

use std::sync::OnceLock;

use regex::Regex;

use crate::data::dataset::TriggerMode;

const VERBOSE_FLAG: &str = "-v";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameQuery {
    pub verbose: bool,
    pub character: String,
    pub trigger: Option<TriggerMode>,
    pub move_text: String,
}

fn query_regex() -> &'static Regex {
    static QUERY: OnceLock<Regex> = OnceLock::new();
    QUERY.get_or_init(|| Regex::new(r"^(\S*)\s*(vt1|vt2)?\s+(.+)").expect("query pattern is valid"))
}

/// Parse a raw command. None means the text does not fit the grammar.
pub fn parse_query(raw: &str) -> Option<FrameQuery> {
    let (verbose, rest) = match raw.strip_prefix(VERBOSE_FLAG) {
        Some(rest) => (true, rest.trim()),
        None => (false, raw),
    };

    let caps = query_regex().captures(rest)?;
    let character = caps.get(1)?.as_str().to_string();
    let move_text = caps.get(3)?.as_str().to_string();
    let trigger = caps
        .get(2)
        .and_then(|token| token.as_str().chars().last())
        .and_then(TriggerMode::from_digit);

    Some(FrameQuery {
        verbose,
        character,
        trigger,
        move_text,
    })
}
