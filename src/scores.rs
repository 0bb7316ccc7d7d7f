use crate::options::{BoardSize, Options, Speed};
use crate::util::{LoadError, SaveError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A finished game, as stored in the score log
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ScoreRecord {
    pub(crate) player_name: String,
    pub(crate) speed: Speed,
    pub(crate) board_size: BoardSize,
    pub(crate) score: u32,

    /// When the game ended, in seconds since the UNIX epoch
    pub(crate) recorded_at: u64,
}

impl ScoreRecord {
    /// Create a record of a game that ended just now
    pub(crate) fn new(player_name: &str, options: Options, score: u32) -> ScoreRecord {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        ScoreRecord {
            player_name: player_name.to_owned(),
            speed: options.speed,
            board_size: options.board_size,
            score,
            recorded_at,
        }
    }
}

/// Somewhere that finished games are sent to
pub(crate) trait ScoreSink {
    fn save_score(&mut self, record: &ScoreRecord) -> Result<(), SaveError>;
}

/// An append-only log of finished games, stored as one JSON object per line
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ScoreLog {
    /// `None` if the location of the log could not be determined
    path: Option<PathBuf>,
    enabled: bool,
}

impl ScoreLog {
    pub(crate) fn new(path: Option<PathBuf>) -> ScoreLog {
        ScoreLog {
            path,
            enabled: true,
        }
    }

    /// A log that discards every record and is always empty
    pub(crate) fn disabled() -> ScoreLog {
        ScoreLog {
            path: None,
            enabled: false,
        }
    }

    /// Read all records from the log.  A missing file is treated as an empty
    /// log.  Lines that cannot be parsed are skipped.
    pub(crate) fn load(&self) -> Result<Scores, LoadError> {
        if !self.enabled {
            return Ok(Scores::default());
        }
        let path = self.path.as_deref().ok_or_else(|| LoadError::no_path("scores"))?;
        let src = match fs_err::read_to_string(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Scores::default()),
            Err(e) => return Err(LoadError::read("scores", e)),
        };
        let mut records = Vec::new();
        for (i, line) in src.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ScoreRecord>(line) {
                Ok(rec) => records.push(rec),
                Err(e) => {
                    tracing::warn!(path = %path.display(), line = i + 1, error = %e, "Skipping malformed score record");
                }
            }
        }
        Ok(Scores { records })
    }
}

impl ScoreSink for ScoreLog {
    fn save_score(&mut self, record: &ScoreRecord) -> Result<(), SaveError> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.path.as_deref().ok_or_else(|| SaveError::no_path("score"))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir("score", e))?;
        }
        let mut line = serde_json::to_string(record).map_err(|e| SaveError::serialize("score", e))?;
        line.push('\n');
        let mut fp = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SaveError::write("score", e))?;
        fp.write_all(line.as_bytes())
            .map_err(|e| SaveError::write("score", e))?;
        Ok(())
    }
}

/// The contents of a score log, oldest first
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Scores {
    records: Vec<ScoreRecord>,
}

impl Scores {
    #[cfg(test)]
    pub(crate) fn from_records(records: Vec<ScoreRecord>) -> Scores {
        Scores { records }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Return each player's best score for the given settings, best first.
    /// When two scores are equal, the one recorded earlier comes first.
    pub(crate) fn leaderboard(
        &self,
        speed: Speed,
        board_size: BoardSize,
        limit: usize,
    ) -> Vec<&ScoreRecord> {
        let mut best: HashMap<&str, (usize, &ScoreRecord)> = HashMap::new();
        for (i, rec) in self.matching(speed, board_size) {
            best.entry(rec.player_name.as_str())
                .and_modify(|e| {
                    if rec.score > e.1.score {
                        *e = (i, rec);
                    }
                })
                .or_insert((i, rec));
        }
        let mut entries = best.into_values().collect::<Vec<_>>();
        entries.sort_by(|(ia, a), (ib, b)| b.score.cmp(&a.score).then(ia.cmp(ib)));
        entries.into_iter().take(limit).map(|(_, rec)| rec).collect()
    }

    /// Return the most recent games played with the given settings, most
    /// recent first
    pub(crate) fn history(
        &self,
        speed: Speed,
        board_size: BoardSize,
        limit: usize,
    ) -> Vec<&ScoreRecord> {
        self.records
            .iter()
            .rev()
            .filter(|rec| rec.speed == speed && rec.board_size == board_size)
            .take(limit)
            .collect()
    }

    fn matching(
        &self,
        speed: Speed,
        board_size: BoardSize,
    ) -> impl Iterator<Item = (usize, &ScoreRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, rec)| rec.speed == speed && rec.board_size == board_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, speed: Speed, board_size: BoardSize, score: u32, at: u64) -> ScoreRecord {
        ScoreRecord {
            player_name: String::from(name),
            speed,
            board_size,
            score,
            recorded_at: at,
        }
    }

    fn sample() -> Scores {
        Scores {
            records: vec![
                record("alice", Speed::Slow, BoardSize::Small, 40, 1),
                record("bob", Speed::Slow, BoardSize::Small, 55, 2),
                record("alice", Speed::Slow, BoardSize::Small, 70, 3),
                record("carol", Speed::Fast, BoardSize::Small, 500, 4),
                record("dave", Speed::Slow, BoardSize::Small, 55, 5),
                record("bob", Speed::Slow, BoardSize::Small, 30, 6),
                record("erin", Speed::Slow, BoardSize::Large, 90, 7),
            ],
        }
    }

    fn names(recs: &[&ScoreRecord]) -> Vec<(String, u32)> {
        recs.iter()
            .map(|r| (r.player_name.clone(), r.score))
            .collect()
    }

    #[test]
    fn leaderboard_best_per_player() {
        let scores = sample();
        assert_eq!(
            names(&scores.leaderboard(Speed::Slow, BoardSize::Small, 10)),
            [
                (String::from("alice"), 70),
                (String::from("bob"), 55),
                (String::from("dave"), 55),
            ]
        );
        assert_eq!(
            names(&scores.leaderboard(Speed::Slow, BoardSize::Small, 2)),
            [(String::from("alice"), 70), (String::from("bob"), 55)]
        );
        assert!(scores
            .leaderboard(Speed::Medium, BoardSize::Medium, 10)
            .is_empty());
    }

    #[test]
    fn history_most_recent_first() {
        let scores = sample();
        let recent = scores.history(Speed::Slow, BoardSize::Small, 3);
        assert_eq!(
            recent.iter().map(|r| r.recorded_at).collect::<Vec<_>>(),
            [6, 5, 3]
        );
    }

    #[test]
    fn record_serialization() {
        let rec = record("Sam", Speed::Medium, BoardSize::Large, 125, 1_700_000_000);
        assert_eq!(
            serde_json::to_string(&rec).expect("should serialize"),
            r#"{"player-name":"Sam","speed":"medium","board-size":"large","score":125,"recorded-at":1700000000}"#
        );
    }

    #[test]
    fn append_and_load() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let mut log = ScoreLog::new(Some(tmpdir.path().join("data").join("scores.jsonl")));
        assert_eq!(log.load().expect("missing log is empty").len(), 0);
        let first = record("alice", Speed::Slow, BoardSize::Small, 40, 1);
        let second = record("bob", Speed::Fast, BoardSize::Medium, 25, 2);
        log.save_score(&first).expect("should save");
        log.save_score(&second).expect("should save");
        let scores = log.load().expect("should load");
        assert_eq!(scores.records, [first, second]);
    }

    #[test]
    fn load_skips_malformed_lines() {
        let tmpdir = tempfile::tempdir().expect("should create tempdir");
        let path = tmpdir.path().join("scores.jsonl");
        fs_err::write(
            &path,
            concat!(
                r#"{"player-name":"alice","speed":"slow","board-size":"small","score":40,"recorded-at":1}"#,
                "\n",
                "garbage\n",
                "\n",
                r#"{"player-name":"bob","speed":"warp","board-size":"small","score":10,"recorded-at":2}"#,
                "\n",
                r#"{"player-name":"carol","speed":"fast","board-size":"large","score":15,"recorded-at":3}"#,
                "\n",
            ),
        )
        .expect("should write");
        let scores = ScoreLog::new(Some(path)).load().expect("should load");
        assert_eq!(
            scores.records,
            [
                record("alice", Speed::Slow, BoardSize::Small, 40, 1),
                record("carol", Speed::Fast, BoardSize::Large, 15, 3),
            ]
        );
    }

    #[test]
    fn disabled_log() {
        let mut log = ScoreLog::disabled();
        log.save_score(&record("alice", Speed::Slow, BoardSize::Small, 40, 1))
            .expect("disabled log accepts everything");
        assert_eq!(log.load().expect("disabled log is empty").len(), 0);
    }

    #[test]
    fn no_path() {
        let mut log = ScoreLog::new(None);
        let e = log
            .save_score(&record("alice", Speed::Slow, BoardSize::Small, 40, 1))
            .expect_err("saving without a path should fail");
        assert_eq!(e.to_string(), "failed to save score to disk");
        assert!(log.load().is_err());
    }
}
