// Declare all our modules
mod client;
pub mod config;
mod dedup;
mod error;
mod models;
pub mod navigator;
pub mod parsers;
pub mod persist;
mod pipeline;
mod search;

// Publicly export the parts of our library that users will need
pub use client::{HISTORY_LIMIT, HttpNavigator};
pub use config::{
    Credentials, ExtractionConfig, HarvestConfig, OutputConfig, PacingConfig, RemoteSettings,
    SearchConfig,
};
pub use dedup::dedup;
pub use error::{Result, ScraperError};
pub use models::*;
pub use navigator::{Element, NavigationGuard, Navigator};
pub use parsers::enhance::{SearchKind, TargetedSearch, name_from_headline, targeted_searches};
pub use parsers::links::{LinkCandidate, LinkResolver, LinkStrategy, ProfileLinkPattern};
pub use parsers::record::RecordBuilder;
pub use parsers::text::{ProfileFields, classify_lines, classify_text, is_relevant, split_lines};
pub use persist::remote::{RemoteRow, RemoteTable, SupabaseTable};
pub use persist::{Persistence, SaveOutcome};
pub use pipeline::{Harvester, user_interrupt};
pub use search::SearchDriver;
