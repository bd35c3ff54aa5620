//! Scrape session orchestrator.
//!
//! Owns the API client, the sink and the session identity of one event, and
//! walks match → detail groups → record → sink strictly in sequence. Every
//! fetch failure is logged with its identifiers and only abandons its own
//! branch of the walk.

use crate::api::{ApiClient, FetchError, Transport};
use crate::record::{MatchRecordBuilder, RecordSettings};
use crate::walker::Walker;
use shared::{MatchRecord, Record, ScrapeSession, SessionMetadata, Sink};
use tracing::{error, info};

/// Statistics for one scrape session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub matches_emitted: usize,
    pub matches_failed: usize,
    pub detail_groups: usize,
    pub groups_failed: usize,
    pub listing_failures: usize,
    pub sink_failures: usize,
}

/// Result of a finished session
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    pub stats: ScrapeStats,
    pub metadata: SessionMetadata,
}

/// Scraper for a single event
pub struct EventScraper<T, S> {
    api: ApiClient<T>,
    sink: S,
    settings: RecordSettings,
    session: ScrapeSession,
    stats: ScrapeStats,
}

impl<T: Transport, S: Sink> EventScraper<T, S> {
    /// Create a scraper for `session`; records are written to `sink`
    pub fn new(api: ApiClient<T>, sink: S, settings: RecordSettings, session: ScrapeSession) -> Self {
        Self {
            api,
            sink,
            settings,
            session,
            stats: ScrapeStats::default(),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn session(&self) -> &ScrapeSession {
        &self.session
    }

    pub fn stats(&self) -> &ScrapeStats {
        &self.stats
    }

    /// Walk the event with `walker`, then close the session
    pub async fn run<W: Walker>(mut self, walker: &W) -> ScrapeSummary {
        info!(
            source_type = %self.session.source_type,
            event_id = self.session.event_id,
            walker = walker.name(),
            "Starting event scrape"
        );

        walker.walk(&mut self).await;
        self.finish()
    }

    /// Record a listing step that produced nothing
    pub(crate) fn listing_failed(&mut self, step: &str, competition_id: Option<u64>, err: &FetchError) {
        self.stats.listing_failures += 1;
        error!(
            source_type = %self.session.source_type,
            event_id = self.session.event_id,
            competition_id = competition_id,
            status = err.status(),
            error = %err,
            "Failed to get {}", step
        );
    }

    /// Fetch one match and all its detail groups, then hand the record to the sink
    ///
    /// Returns whether a record was written.
    pub async fn scrape_match(&mut self, match_id: u64) -> bool {
        let builder = match self.start_match(match_id).await {
            Ok(builder) => builder,
            Err(e) => {
                self.stats.matches_failed += 1;
                error!(
                    source_type = %self.session.source_type,
                    event_id = self.session.event_id,
                    match_id = match_id,
                    status = e.status(),
                    error = %e,
                    "Failed to get match details"
                );
                return false;
            }
        };

        self.emit(builder.finish(), match_id)
    }

    async fn start_match(&mut self, match_id: u64) -> Result<MatchRecordBuilder, FetchError> {
        let detail = self.api.match_detail(match_id).await?;
        let mut builder = MatchRecordBuilder::new(match_id, &detail, &self.settings)?;

        for group in &detail.additional {
            self.collect_groups(&mut builder, group.id).await;
        }

        Ok(builder)
    }

    /// Append one detail group's entries; a failed group contributes nothing
    async fn collect_groups(&mut self, builder: &mut MatchRecordBuilder, group_id: u64) {
        match self.api.detail_groups(builder.match_id(), group_id).await {
            Ok(groups) => {
                self.stats.detail_groups += builder.push_groups(groups);
            }
            Err(e) => {
                self.stats.groups_failed += 1;
                error!(
                    source_type = %self.session.source_type,
                    event_id = self.session.event_id,
                    match_id = builder.match_id(),
                    group_id = group_id,
                    status = e.status(),
                    error = %e,
                    "Failed to get detail group"
                );
            }
        }
    }

    fn emit(&mut self, record: MatchRecord, match_id: u64) -> bool {
        if let Err(e) = self.sink.write(&self.session, Record::Match(&record)) {
            self.stats.sink_failures += 1;
            error!(
                source_type = %self.session.source_type,
                event_id = self.session.event_id,
                match_id = match_id,
                error = %e,
                "Failed to store match record"
            );
            return false;
        }

        self.stats.matches_emitted += 1;
        info!(
            source_type = %self.session.source_type,
            event_id = self.session.event_id,
            match_id = match_id,
            details_found = record.details.len(),
            "Finished scraping match"
        );
        true
    }

    fn finish(mut self) -> ScrapeSummary {
        let metadata = self.session.finish_at(chrono::Utc::now().timestamp());

        if let Err(e) = self.sink.write(&self.session, Record::Metadata(&metadata)) {
            self.stats.sink_failures += 1;
            error!(
                source_type = %self.session.source_type,
                event_id = self.session.event_id,
                error = %e,
                "Failed to store session metadata"
            );
        }

        info!(
            source_type = %self.session.source_type,
            event_id = self.session.event_id,
            matches = self.stats.matches_emitted,
            failed = self.stats.matches_failed,
            duration_secs = metadata.duration,
            "Event scrape complete"
        );
        info!("{}", "-".repeat(120));

        ScrapeSummary {
            stats: self.stats,
            metadata,
        }
    }
}
