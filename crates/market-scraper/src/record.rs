//! Match record assembly.
//!
//! A `MatchRecordBuilder` is created fresh for every match from its detail
//! payload, collects the detail groups as they are fetched, and is consumed
//! by `finish()`. Nothing carries over from one match to the next.

use crate::api::{FetchError, GroupPayload, MatchDetail};
use chrono::{Local, TimeDelta, TimeZone};
use shared::{DetailGroup, MatchRecord, Selection, SourceRef};

/// Per-run settings shared by every record
#[derive(Debug, Clone)]
pub struct RecordSettings {
    pub source: SourceRef,
    /// Base URL canonical links are built on
    pub home_link: String,
    /// Hours added to the local kickoff time
    pub kickoff_offset_hours: i64,
}

/// Lower-case and hyphenate a class or competition name
pub fn slug_segment(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Lower-case a match name, drop parentheses and hyphenate
pub fn match_slug(name: &str) -> String {
    name.to_lowercase()
        .replace(['(', ')'], "")
        .replace(' ', "-")
}

/// `{home}/{class}/{competition}/{match}--{id}`
pub fn canonical_link(
    home_link: &str,
    class_name: &str,
    competition_name: &str,
    match_name: &str,
    match_id: u64,
) -> String {
    format!(
        "{}/{}/{}/{}--{}",
        home_link.trim_end_matches('/'),
        slug_segment(class_name),
        slug_segment(competition_name),
        match_slug(match_name),
        match_id
    )
}

/// Render epoch seconds as local wall-clock time to the minute
///
/// The timestamp is read in the local zone and then shifted by
/// `offset_hours`; no other zone handling is applied.
pub fn format_kickoff(epoch_secs: i64, offset_hours: i64) -> Option<String> {
    let local = Local.timestamp_opt(epoch_secs, 0).single()?;
    let offset = TimeDelta::try_hours(offset_hours)?;
    let shifted = local.naive_local().checked_add_signed(offset)?;
    Some(shifted.format("%Y-%m-%d %H:%M").to_string())
}

/// Map one upstream group to its output entry, keeping selection order
pub fn detail_group(payload: GroupPayload) -> DetailGroup {
    DetailGroup {
        name: payload.name,
        selections: payload
            .selections
            .into_iter()
            .map(|s| Selection {
                parameter: s.name,
                parameter2: s.kind,
            })
            .collect(),
    }
}

/// Accumulates one match's record
#[derive(Debug, Clone)]
pub struct MatchRecordBuilder {
    match_id: u64,
    match_name: String,
    kickoff_time: String,
    merge_key: String,
    source_ref: SourceRef,
    canonical_link: String,
    details: Vec<DetailGroup>,
}

impl MatchRecordBuilder {
    /// Start a record from the match detail payload
    ///
    /// Fails only when `startTime` cannot be represented as a local time.
    pub fn new(
        match_id: u64,
        detail: &MatchDetail,
        settings: &RecordSettings,
    ) -> Result<Self, FetchError> {
        let kickoff_time = format_kickoff(detail.start_time, settings.kickoff_offset_hours)
            .ok_or_else(|| {
                FetchError::decode(200, format!("startTime {} out of range", detail.start_time))
            })?;

        Ok(Self {
            match_id,
            match_name: detail.name.clone(),
            kickoff_time,
            merge_key: format!("{} | {}", detail.name, settings.source.name),
            source_ref: settings.source.clone(),
            canonical_link: canonical_link(
                &settings.home_link,
                &detail.class_name,
                &detail.competition_name,
                &detail.name,
                match_id,
            ),
            details: Vec::new(),
        })
    }

    pub fn match_id(&self) -> u64 {
        self.match_id
    }

    /// Append every group of one detail-group response, in response order
    pub fn push_groups(&mut self, groups: Vec<GroupPayload>) -> usize {
        let added = groups.len();
        self.details.extend(groups.into_iter().map(detail_group));
        added
    }

    /// Number of detail groups collected so far
    pub fn detail_count(&self) -> usize {
        self.details.len()
    }

    pub fn finish(self) -> MatchRecord {
        MatchRecord {
            match_name: self.match_name,
            kickoff_time: self.kickoff_time,
            merge_key: self.merge_key,
            source_ref: self.source_ref,
            canonical_link: self.canonical_link,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{IdRef, SelectionPayload};

    fn settings() -> RecordSettings {
        RecordSettings {
            source: SourceRef {
                name: "example".to_string(),
                id: "123".to_string(),
            },
            home_link: "https://www.example.com".to_string(),
            kickoff_offset_hours: 0,
        }
    }

    fn detail() -> MatchDetail {
        MatchDetail {
            name: "Team A (X) v Team B".to_string(),
            start_time: 1_700_000_000,
            class_name: "Soccer".to_string(),
            competition_name: "Premier League".to_string(),
            additional: vec![IdRef { id: 9 }],
        }
    }

    fn group(name: &str, selections: &[(&str, &str)]) -> GroupPayload {
        GroupPayload {
            name: name.to_string(),
            selections: selections
                .iter()
                .map(|(n, k)| SelectionPayload {
                    name: n.to_string(),
                    kind: k.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_slugs() {
        assert_eq!(slug_segment("Premier League"), "premier-league");
        assert_eq!(match_slug("Team A (X) v Team B"), "team-a-x-v-team-b");
        // Only spaces are replaced; other punctuation stays
        assert_eq!(slug_segment("U.S. Open"), "u.s.-open");
    }

    #[test]
    fn test_canonical_link() {
        assert_eq!(
            canonical_link(
                "https://www.example.com",
                "Soccer",
                "Premier League",
                "Team A (X) v Team B",
                501
            ),
            "https://www.example.com/soccer/premier-league/team-a-x-v-team-b--501"
        );
    }

    #[test]
    fn test_kickoff_matches_local_time_to_minute() {
        let expected = Local
            .timestamp_opt(1_700_000_000, 0)
            .unwrap()
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(format_kickoff(1_700_000_000, 0).unwrap(), expected);
        assert_eq!(expected.len(), 16);
    }

    #[test]
    fn test_kickoff_offset_shifts_hours() {
        let base = Local.timestamp_opt(1_700_000_000, 0).unwrap().naive_local();
        let expected = (base + chrono::Duration::hours(2))
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(format_kickoff(1_700_000_000, 2).unwrap(), expected);
    }

    #[test]
    fn test_kickoff_out_of_range() {
        assert!(format_kickoff(i64::MAX, 0).is_none());
    }

    #[test]
    fn test_kickoff_offset_overflow_is_none() {
        assert!(format_kickoff(1_700_000_000, i64::MAX).is_none());
        assert!(format_kickoff(1_700_000_000, i64::MIN).is_none());

        // Last representable second plus a day runs past the calendar
        let last = chrono::NaiveDateTime::MAX.and_utc().timestamp() - 86_400;
        if Local.timestamp_opt(last, 0).single().is_some() {
            assert!(format_kickoff(last, 48).is_none());
        }
    }

    #[test]
    fn test_builder_fields() {
        let builder = MatchRecordBuilder::new(501, &detail(), &settings()).unwrap();
        let record = builder.finish();

        assert_eq!(record.match_name, "Team A (X) v Team B");
        assert_eq!(record.merge_key, "Team A (X) v Team B | example");
        assert_eq!(record.source_ref.id, "123");
        assert_eq!(
            record.canonical_link,
            "https://www.example.com/soccer/premier-league/team-a-x-v-team-b--501"
        );
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_push_groups_preserves_order_and_duplicates() {
        let mut builder = MatchRecordBuilder::new(501, &detail(), &settings()).unwrap();

        let added = builder.push_groups(vec![
            group("Winner", &[("Team A", "home"), ("Team B", "away")]),
            group("Total", &[("Over", "over")]),
        ]);
        assert_eq!(added, 2);
        builder.push_groups(vec![group("Winner", &[("Draw", "draw")])]);
        assert_eq!(builder.detail_count(), 3);

        let names: Vec<_> = builder
            .finish()
            .details
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Winner", "Total", "Winner"]);
    }

    #[test]
    fn test_detail_group_mapping() {
        let mapped = detail_group(group("Winner", &[("Team A", "home")]));
        assert_eq!(
            mapped.selections,
            vec![Selection {
                parameter: "Team A".to_string(),
                parameter2: "home".to_string(),
            }]
        );
    }
}
