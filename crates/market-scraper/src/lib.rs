//! Market scraper library.
//!
//! Walks an event of the upstream betting API down to its matches and
//! detail groups, builds one record per match and hands it to a sink.

pub mod api;
pub mod record;
pub mod scraper;
pub mod walker;

pub use api::{ApiClient, FetchError, HttpTransport, Transport};
pub use record::{MatchRecordBuilder, RecordSettings};
pub use scraper::{EventScraper, ScrapeStats, ScrapeSummary};
pub use walker::{CompetitionWalker, DirectWalker, Walker};
