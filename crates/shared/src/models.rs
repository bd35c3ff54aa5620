//! Data models for the project.
//!
//! This module defines the documents produced by a scrape run: one
//! `MatchRecord` per match, the detail groups and selections nested inside it,
//! and the `SessionMetadata` written once per run.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// The site a record was scraped from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    pub id: String,
}

/// One betting option inside a detail group, copied verbatim from upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Selection name
    pub parameter: String,
    /// Selection classification tag
    pub parameter2: String,
}

/// A named cluster of selections
///
/// Serializes as a single-key map `{name: [selections...]}`. Two groups with
/// the same name stay two separate entries in a record's detail list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailGroup {
    pub name: String,
    pub selections: Vec<Selection>,
}

impl Serialize for DetailGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.selections)?;
        map.end()
    }
}

/// Output document for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "match")]
    pub match_name: String,
    /// Local wall-clock kickoff, `YYYY-MM-DD HH:MM`
    #[serde(rename = "time")]
    pub kickoff_time: String,
    /// `"{match_name} | {source name}"`
    #[serde(rename = "merge")]
    pub merge_key: String,
    #[serde(rename = "data")]
    pub source_ref: SourceRef,
    #[serde(rename = "event_link")]
    pub canonical_link: String,
    pub details: Vec<DetailGroup>,
}

/// Timing summary written once per scrape run (whole seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub start_time: i64,
    pub stop_time: i64,
    pub duration: i64,
}

impl SessionMetadata {
    pub fn new(start_time: i64, stop_time: i64) -> Self {
        Self {
            start_time,
            stop_time,
            duration: stop_time - start_time,
        }
    }
}

/// Identity of one scrape run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSession {
    pub source: SourceRef,
    /// Sport/source tag, e.g. `soccer`
    pub source_type: String,
    pub event_id: u64,
    pub started_at: i64,
    pub ended_at: Option<i64>,
}

impl ScrapeSession {
    /// Start a session now
    pub fn start(source: SourceRef, source_type: impl Into<String>, event_id: u64) -> Self {
        Self {
            source,
            source_type: source_type.into(),
            event_id,
            started_at: chrono::Utc::now().timestamp(),
            ended_at: None,
        }
    }

    /// Mark the session finished at `ended_at` and compute its metadata
    pub fn finish_at(&mut self, ended_at: i64) -> SessionMetadata {
        self.ended_at = Some(ended_at);
        SessionMetadata::new(self.started_at, ended_at)
    }
}

/// How the match ids under an event are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkerKind {
    /// Event listing holds the matches directly
    Direct,
    /// Event listing holds competitions, each listing its matches
    Competition,
}

impl std::fmt::Display for WalkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkerKind::Direct => write!(f, "direct"),
            WalkerKind::Competition => write!(f, "competition"),
        }
    }
}

impl std::str::FromStr for WalkerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(WalkerKind::Direct),
            "competition" => Ok(WalkerKind::Competition),
            _ => Err(anyhow::anyhow!("Invalid walker kind: {}", s)),
        }
    }
}

/// Kind of document handed to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Match,
    Metadata,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Match => "match",
            RecordKind::Metadata => "metadata",
        }
    }
}

/// A completed document ready for a sink
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Match(&'a MatchRecord),
    Metadata(&'a SessionMetadata),
}

impl Record<'_> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Match(_) => RecordKind::Match,
            Record::Metadata(_) => RecordKind::Metadata,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Record::Match(record) => serde_json::to_value(record),
            Record::Metadata(meta) => serde_json::to_value(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selection(name: &str, kind: &str) -> Selection {
        Selection {
            parameter: name.to_string(),
            parameter2: kind.to_string(),
        }
    }

    #[test]
    fn test_detail_group_serializes_as_single_key_map() {
        let group = DetailGroup {
            name: "Winner".to_string(),
            selections: vec![selection("Team A", "home")],
        };

        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"Winner": [{"parameter": "Team A", "parameter2": "home"}]})
        );
    }

    #[test]
    fn test_match_record_keeps_duplicate_group_names() {
        let record = MatchRecord {
            match_name: "A v B".to_string(),
            kickoff_time: "2023-11-14 22:13".to_string(),
            merge_key: "A v B | example".to_string(),
            source_ref: SourceRef {
                name: "example".to_string(),
                id: "123".to_string(),
            },
            canonical_link: "https://www.example.com/soccer/cup/a-v-b--1".to_string(),
            details: vec![
                DetailGroup {
                    name: "Total".to_string(),
                    selections: vec![selection("Over", "over")],
                },
                DetailGroup {
                    name: "Total".to_string(),
                    selections: vec![selection("Under", "under")],
                },
            ],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["match"], "A v B");
        assert_eq!(value["merge"], "A v B | example");
        assert_eq!(value["data"], json!({"name": "example", "id": "123"}));
        assert_eq!(
            value["details"],
            json!([
                {"Total": [{"parameter": "Over", "parameter2": "over"}]},
                {"Total": [{"parameter": "Under", "parameter2": "under"}]}
            ])
        );
    }

    #[test]
    fn test_session_metadata_duration() {
        let meta = SessionMetadata::new(1_700_000_000, 1_700_000_042);
        assert_eq!(meta.duration, 42);
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            json!({"start_time": 1_700_000_000, "stop_time": 1_700_000_042, "duration": 42})
        );
    }

    #[test]
    fn test_session_finish_sets_end_time() {
        let mut session = ScrapeSession::start(
            SourceRef {
                name: "example".to_string(),
                id: "123".to_string(),
            },
            "soccer",
            77,
        );
        let started = session.started_at;

        let meta = session.finish_at(started + 5);
        assert_eq!(session.ended_at, Some(started + 5));
        assert_eq!(meta.duration, 5);
    }

    #[test]
    fn test_walker_kind_round_trip() {
        assert_eq!("direct".parse::<WalkerKind>().unwrap(), WalkerKind::Direct);
        assert_eq!(
            "competition".parse::<WalkerKind>().unwrap(),
            WalkerKind::Competition
        );
        assert!("sideways".parse::<WalkerKind>().is_err());
        assert_eq!(WalkerKind::Competition.to_string(), "competition");
    }

    #[test]
    fn test_record_kind() {
        let meta = SessionMetadata::new(1, 2);
        assert_eq!(Record::Metadata(&meta).kind().as_str(), "metadata");
    }
}
