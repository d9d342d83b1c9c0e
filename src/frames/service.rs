//! FrameService: the dataset source, the loaded snapshot and its reverse index,
//! built once and shared by every query. Owned by the CLI or the server loop.

use std::time::Instant;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::config::Config;
use crate::data::dataset::FrameDataset;
use crate::data::loader::{DatasetSource, FileSource};
use crate::error::{DataError, FrameError};
use crate::frames::format::{format_reply, Reply};
use crate::frames::index::FrameIndex;
use crate::frames::matcher::{match_move, MatchThresholds};
use crate::frames::query::parse_query;

pub const DATASET_ERROR_MESSAGE: &str = "Got an error when trying to get frame data :(.";

pub fn usage_message(user: &str) -> String {
    format!(
        "You've passed me an incorrect format {user}. The correct format is !frames character_name [vt1/vt2] move_name"
    )
}

pub fn rejection_message(user: &str, character: &str, move_text: &str) -> String {
    format!(
        "Don't waste my time {user}. {character} with {move_text} is not a valid character/move combination for SFV."
    )
}

pub struct FrameService {
    source: Box<dyn DatasetSource>,
    snapshot: FrameDataset,
    index: FrameIndex,
    thresholds: MatchThresholds,
    indexed_at: DateTime<Utc>,
}

impl FrameService {
    /// Load the dataset once and build its index.
    pub fn load(
        source: Box<dyn DatasetSource>,
        thresholds: MatchThresholds,
    ) -> Result<Self, DataError> {
        let snapshot = source.load()?;
        if snapshot.is_empty() {
            return Err(DataError::Empty);
        }
        log::info!("loaded {} characters from {}", snapshot.len(), source.describe());

        let mut service = Self {
            source,
            snapshot,
            index: FrameIndex::default(),
            thresholds,
            indexed_at: Utc::now(),
        };
        service.reindex();
        Ok(service)
    }

    pub fn from_config(config: &Config) -> Result<Self, DataError> {
        Self::load(
            Box::new(FileSource::new(&config.data_path)),
            config.thresholds,
        )
    }

    /// Rebuild the index from the current snapshot. Safe to repeat.
    pub fn reindex(&mut self) {
        let started = Instant::now();
        self.index = FrameIndex::build(&self.snapshot);
        self.indexed_at = Utc::now();
        log::info!(
            "indexed {} characters ({} aliases) in {:?}",
            self.index.len(),
            self.index.alias_count(),
            started.elapsed()
        );
    }

    /// Re-read the source and rebuild the index. On failure the previous index stays in place.
    pub fn reload(&mut self) -> Result<(), DataError> {
        let snapshot = self.source.load()?;
        if snapshot.is_empty() {
            return Err(DataError::Empty);
        }
        self.snapshot = snapshot;
        self.reindex();
        Ok(())
    }

    pub fn index(&self) -> &FrameIndex {
        &self.index
    }

    pub fn indexed_at(&self) -> DateTime<Utc> {
        self.indexed_at
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Answer one frames command from `user`.
    ///
    /// Grammar errors, unknown characters/moves and an unavailable dataset all come back
    /// as replies. `Err` is reserved for dataset content the formatter cannot decode.
    pub fn handle(&self, raw: &str, user: &str) -> Result<Vec<Reply>, FrameError> {
        let Some(query) = parse_query(raw) else {
            return Ok(vec![Reply::text(usage_message(user))]);
        };
        log::debug!("{user} asked for {query:?}");

        let fresh = match self.source.load() {
            Ok(dataset) if !dataset.is_empty() => dataset,
            Ok(_) => {
                log::warn!("dataset at {} is empty", self.source.describe());
                return Ok(vec![Reply::text(DATASET_ERROR_MESSAGE)]);
            }
            Err(err) => {
                log::warn!("dataset reload failed: {err}");
                return Ok(vec![Reply::text(DATASET_ERROR_MESSAGE)]);
            }
        };

        let Some(outcome) = match_move(
            &self.index,
            &query.character,
            &query.move_text,
            query.trigger,
            self.thresholds,
        ) else {
            return Ok(vec![Reply::text(rejection_message(
                user,
                &query.character,
                &query.move_text,
            ))]);
        };

        // Category stats are read from the fresh copy; fall back to the indexed one.
        let no_stats = IndexMap::new();
        let stats = fresh
            .get(outcome.character())
            .map(|character| &character.stats)
            .or_else(|| self.index.get(outcome.character()).map(|character| &character.stats))
            .unwrap_or(&no_stats);

        let reply = format_reply(&outcome, stats, &query.move_text, query.verbose)?;
        Ok(vec![reply])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::MemorySource;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn dataset() -> FrameDataset {
        serde_json::from_value(json!({
            "Ryu": {
                "moves": {"normal": {"Hadoken": {"plnCmd": "QCF+P", "onHit": "+2"}}},
                "stats": {"fDash": [19]}
            }
        }))
        .unwrap()
    }

    /// Succeeds for the first `good_loads` calls, then fails.
    struct FlakySource {
        calls: Arc<AtomicUsize>,
        good_loads: usize,
    }

    impl DatasetSource for FlakySource {
        fn load(&self) -> Result<FrameDataset, DataError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.good_loads {
                Ok(dataset())
            } else {
                Err(DataError::Empty)
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[test]
    fn in_memory_dataset_keeps_written_order() {
        let dataset: FrameDataset = serde_json::from_value(json!({
            "Ryu": {"moves": {"normal": {"Stand LP": {"plnCmd": "LP"}}}},
            "Chun-Li": {"moves": {"normal": {"Stand LP": {"plnCmd": "LP"}}}},
            "Akuma": {"moves": {"normal": {"Stand LP": {"plnCmd": "LP"}}}}
        }))
        .unwrap();
        let service = FrameService::load(
            Box::new(MemorySource::new(dataset)),
            MatchThresholds::default(),
        )
        .unwrap();
        let names: Vec<_> = service.index().character_names().collect();
        assert_eq!(names, ["Ryu", "Chun-Li", "Akuma"]);
    }

    #[test]
    fn load_rejects_empty_dataset() {
        let result = FrameService::load(
            Box::new(MemorySource::new(FrameDataset::default())),
            MatchThresholds::default(),
        );
        assert!(matches!(result, Err(DataError::Empty)));
    }

    #[test]
    fn handle_answers_from_index() {
        let service = FrameService::load(
            Box::new(MemorySource::new(dataset())),
            MatchThresholds::default(),
        )
        .unwrap();
        let replies = service.handle("ryu hadoken", "ken").unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].as_text().starts_with("Ryu - (hadoken - QCF+P)"));
    }

    #[test]
    fn unavailable_dataset_yields_generic_error() {
        let service = FrameService::load(
            Box::new(FlakySource {
                calls: Arc::new(AtomicUsize::new(0)),
                good_loads: 1,
            }),
            MatchThresholds::default(),
        )
        .unwrap();
        let replies = service.handle("ryu hadoken", "ken").unwrap();
        assert_eq!(replies, vec![Reply::text(DATASET_ERROR_MESSAGE)]);
    }

    #[test]
    fn failed_reload_keeps_previous_index() {
        let mut service = FrameService::load(
            Box::new(FlakySource {
                calls: Arc::new(AtomicUsize::new(0)),
                good_loads: 1,
            }),
            MatchThresholds::default(),
        )
        .unwrap();
        assert!(service.reload().is_err());
        assert_eq!(service.index().len(), 1);
    }

    #[test]
    fn reindex_is_repeatable() {
        let mut service = FrameService::load(
            Box::new(MemorySource::new(dataset())),
            MatchThresholds::default(),
        )
        .unwrap();
        let before = service.index().clone();
        service.reindex();
        service.reindex();
        assert_eq!(service.index(), &before);
        service.reload().unwrap();
        assert_eq!(service.index(), &before);
    }
}
