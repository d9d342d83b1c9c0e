//! Frame data queries: reverse index, fuzzy matching and reply formatting.
//!
//! A raw command goes through [query::parse_query], is resolved against the
//! [index::FrameIndex] by [matcher::match_move] and rendered by [format::format_reply].
//! [service::FrameService] owns the whole pipeline.

pub mod format;
pub mod fuzzy;
pub mod index;
pub mod matcher;
pub mod query;
pub mod service;

pub use format::{Reply, RichField, RichMessage};
pub use index::{AliasTarget, CharacterIndex, FrameIndex};
pub use matcher::{match_move, MatchOutcome, MatchThresholds};
pub use query::{parse_query, FrameQuery};
pub use service::FrameService;
