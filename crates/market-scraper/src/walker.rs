//! Event traversal strategies.
//!
//! Both layouts end in the same place: every match id found is handed to
//! `EventScraper::scrape_match`, one at a time, in listing order.

use crate::api::Transport;
use crate::scraper::EventScraper;
use shared::{Sink, WalkerKind};

/// Discovers the matches of an event and scrapes each of them
#[allow(async_fn_in_trait)]
pub trait Walker {
    fn name(&self) -> &'static str;

    async fn walk<T: Transport, S: Sink>(&self, scraper: &mut EventScraper<T, S>);
}

/// Event listing holds `{"events": [{id}]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectWalker;

/// Event listing holds competitions, each listing its own matches
#[derive(Debug, Clone, Copy, Default)]
pub struct CompetitionWalker;

impl Walker for DirectWalker {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn walk<T: Transport, S: Sink>(&self, scraper: &mut EventScraper<T, S>) {
        let event_id = scraper.session().event_id;

        let match_ids = match scraper.api().event_match_ids(event_id).await {
            Ok(ids) => ids,
            Err(e) => {
                scraper.listing_failed("match ids", None, &e);
                return;
            }
        };

        for match_id in match_ids {
            scraper.scrape_match(match_id).await;
        }
    }
}

impl Walker for CompetitionWalker {
    fn name(&self) -> &'static str {
        "competition"
    }

    async fn walk<T: Transport, S: Sink>(&self, scraper: &mut EventScraper<T, S>) {
        let event_id = scraper.session().event_id;

        let competition_ids = match scraper.api().event_competition_ids(event_id).await {
            Ok(ids) => ids,
            Err(e) => {
                scraper.listing_failed("competition ids", None, &e);
                return;
            }
        };

        for competition_id in competition_ids {
            let match_ids = match scraper.api().competition_match_ids(competition_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    scraper.listing_failed("competition match ids", Some(competition_id), &e);
                    continue;
                }
            };

            for match_id in match_ids {
                scraper.scrape_match(match_id).await;
            }
        }
    }
}

/// Run `scraper` with the walker matching `kind`
pub async fn run_with<T: Transport, S: Sink>(
    kind: WalkerKind,
    scraper: EventScraper<T, S>,
) -> crate::scraper::ScrapeSummary {
    match kind {
        WalkerKind::Direct => scraper.run(&DirectWalker).await,
        WalkerKind::Competition => scraper.run(&CompetitionWalker).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::record::RecordSettings;
    use crate::testing::{FakeTransport, MemorySink};
    use shared::{Config, ScrapeSession, SourceRef};

    fn scraper(transport: FakeTransport, sink: &mut MemorySink) -> EventScraper<FakeTransport, &mut MemorySink> {
        let source = SourceRef {
            name: "example".to_string(),
            id: "123".to_string(),
        };
        EventScraper::new(
            ApiClient::new(transport, Config::default().api),
            sink,
            RecordSettings {
                source: source.clone(),
                home_link: "https://www.example.com".to_string(),
                kickoff_offset_hours: 0,
            },
            ScrapeSession::start(source, "mlb", 40),
        )
    }

    fn match_body(name: &str) -> String {
        format!(
            r#"{{"name":"{}","startTime":1700000000,"className":"Baseball","competitionName":"MLB","addtioanl":[]}}"#,
            name
        )
    }

    fn match_url(id: u64) -> String {
        format!("https://www.example.com/Events/{}/?displayWinnersPriceMkt=true", id)
    }

    fn competition_url(id: u64) -> String {
        format!(
            "https://www.example.com/Competitions/{}/Events?displayType=default",
            id
        )
    }

    #[tokio::test]
    async fn test_direct_walker_listing_failure() {
        let transport = FakeTransport::new().status(
            "https://www.example.com/Competitions/40?displayType=default",
            503,
        );
        let mut sink = MemorySink::default();

        let summary = scraper(transport, &mut sink).run(&DirectWalker).await;

        assert_eq!(summary.stats.listing_failures, 1);
        assert!(sink.matches.is_empty());
        // Session metadata is still written
        assert_eq!(sink.metadata.len(), 1);
    }

    #[tokio::test]
    async fn test_direct_walker_continues_after_failed_match() {
        let transport = FakeTransport::new()
            .ok(
                "https://www.example.com/Competitions/40?displayType=default",
                r#"{"events":[{"id":1},{"id":2},{"id":3}]}"#,
            )
            .ok(&match_url(1), &match_body("A v B"))
            .status(&match_url(2), 404)
            .ok(&match_url(3), &match_body("E v F"));
        let mut sink = MemorySink::default();

        let summary = scraper(transport, &mut sink).run(&DirectWalker).await;

        assert_eq!(summary.stats.matches_emitted, 2);
        assert_eq!(summary.stats.matches_failed, 1);
        let names: Vec<_> = sink.matches.iter().map(|m| m.match_name.as_str()).collect();
        assert_eq!(names, vec!["A v B", "E v F"]);
    }

    #[tokio::test]
    async fn test_competition_walker_depth_first() {
        let transport = FakeTransport::new()
            .ok(
                "https://www.example.com/40/?displayType=default",
                r#"[{"id":10},{"id":11},{"id":12}]"#,
            )
            .ok(&competition_url(10), r#"[{"id":1},{"id":2}]"#)
            .ok(&competition_url(11), r#"[{"name":"no id"}]"#)
            .ok(&competition_url(12), r#"[{"id":3}]"#)
            .ok(&match_url(1), &match_body("A v B"))
            .ok(&match_url(2), &match_body("C v D"))
            .ok(&match_url(3), &match_body("E v F"));
        let mut sink = MemorySink::default();

        let summary = scraper(transport.clone(), &mut sink)
            .run(&CompetitionWalker)
            .await;

        assert_eq!(summary.stats.listing_failures, 1);
        assert_eq!(summary.stats.matches_emitted, 3);
        assert_eq!(
            transport.requests(),
            vec![
                "https://www.example.com/40/?displayType=default".to_string(),
                competition_url(10),
                match_url(1),
                match_url(2),
                competition_url(11),
                competition_url(12),
                match_url(3),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_with_kind() {
        let transport = FakeTransport::new().ok(
            "https://www.example.com/40/?displayType=default",
            "[]",
        );
        let mut sink = MemorySink::default();

        let summary = run_with(WalkerKind::Competition, scraper(transport, &mut sink)).await;
        assert_eq!(summary.stats, crate::scraper::ScrapeStats::default());
    }
}
