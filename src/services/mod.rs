pub mod browser;
pub mod directory_scraper;
pub mod droid;
pub mod firecrawl_client;
pub mod page_scraper;
pub mod record_extractor;
pub mod tabular_serializer;

pub use browser::*;
pub use directory_scraper::*;
pub use droid::*;
pub use firecrawl_client::*;
pub use page_scraper::*;
pub use record_extractor::*;
pub use tabular_serializer::*;

#[cfg(test)]
pub mod fake_directory;
