//! The table of finished games, kept in a JSON file
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A score is a new record if fewer than this many games have been recorded
pub(crate) const RECORDS_SHOWN: usize = 10;

/// A finished game
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GameRecord {
    pub(crate) id: String,
    pub(crate) player_name: String,
    pub(crate) score: u32,
    pub(crate) time_in_seconds: u64,

    /// When the game was recorded, in RFC 3339 format
    pub(crate) date: String,

    /// Name of the rule set the game was played with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) difficulty: Option<String>,
}

/// The details of a game to record.  The ID and date are filled in when the
/// record is added.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NewRecord {
    pub(crate) player_name: String,
    pub(crate) score: u32,
    pub(crate) time_in_seconds: u64,
    pub(crate) difficulty: Option<String>,
}

/// Recorded games, best first, together with the file they're stored in
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RecordStore {
    path: PathBuf,
    records: Vec<GameRecord>,
}

impl RecordStore {
    /// Load the records stored at `path`.  A missing file means there are no
    /// records yet.  A file that can't be read or parsed is logged and treated
    /// the same way.
    pub(crate) fn load(path: PathBuf) -> RecordStore {
        let records = read_records(&path).unwrap_or_else(|e| {
            log::warn!("{}; starting with no records: {:?}", e, e.0);
            Vec::new()
        });
        RecordStore { path, records }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reread the records file, keeping the records already loaded if that
    /// fails
    pub(crate) fn refresh(&mut self) {
        match read_records(&self.path) {
            Ok(records) => self.records = records,
            Err(e) => log::warn!("{}; keeping records already loaded: {:?}", e, e.0),
        }
    }

    /// All records, highest score first
    #[cfg(test)]
    pub(crate) fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// The `limit` best records, highest score first
    pub(crate) fn top_records(&self, limit: usize) -> &[GameRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// Would a game with the given score make it onto the records table?
    pub(crate) fn is_new_record(&self, score: u32) -> bool {
        match self.records.last() {
            None => true,
            Some(worst) => score > worst.score || self.records.len() < RECORDS_SHOWN,
        }
    }

    /// Record a finished game as of `now` and save all records to disk.  The
    /// file is reread first so that games recorded by other instances of the
    /// program aren't lost.
    pub(crate) fn add_record(
        &mut self,
        record: NewRecord,
        now: DateTime<Utc>,
    ) -> Result<GameRecord, SaveError> {
        self.refresh();
        let mut stamp = now.timestamp_millis();
        while self.records.iter().any(|r| r.id == stamp.to_string()) {
            stamp += 1;
        }
        let record = GameRecord {
            id: stamp.to_string(),
            player_name: record.player_name,
            score: record.score,
            time_in_seconds: record.time_in_seconds,
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            difficulty: record.difficulty,
        };
        self.records.push(record.clone());
        sort_records(&mut self.records);
        self.save()?;
        log::info!(
            "Recorded score of {} for {:?}",
            record.score,
            record.player_name
        );
        Ok(record)
    }

    /// Delete all records, both in memory and on disk
    pub(crate) fn clear_records(&mut self) -> Result<(), SaveError> {
        self.records.clear();
        match fs_err::remove_file(&self.path) {
            Ok(()) => (),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (),
            Err(e) => return Err(SaveError::remove(e)),
        }
        log::info!("Cleared all records");
        Ok(())
    }

    fn save(&self) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(&self.records).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// Best score first.  Games with equal scores stay in the order they were
/// recorded.
fn sort_records(records: &mut [GameRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}

fn read_records(path: &Path) -> Result<Vec<GameRecord>, LoadError> {
    let src = match fs_err::read(path) {
        Ok(src) => src,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LoadError(LoadErrorSource::Read(e))),
    };
    let mut records = serde_json::from_slice::<Vec<GameRecord>>(&src)
        .map_err(|e| LoadError(LoadErrorSource::Deserialize(e)))?;
    sort_records(&mut records);
    Ok(records)
}

#[derive(Debug, Error)]
#[error("Failed to save records to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }

    fn remove(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Remove(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize records")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write records file")]
    Write(#[source] std::io::Error),
    #[error("failed to remove records file")]
    Remove(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read records from disk")]
struct LoadError(#[source] LoadErrorSource);

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read records file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize records")]
    Deserialize(#[source] serde_json::Error),
}
