pub mod bot;
pub mod compress;
pub mod config;
pub mod error;
pub mod fetch;
pub mod health;
pub mod publisher;
pub mod resolver;
pub mod scheduler;
pub mod selector;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use bot::{CycleReport, PostingBot};
pub use compress::{CompressedImage, CompressionSettings, ImageCompressor};
pub use config::{Config, ConfigError};
pub use error::{BotError, Result};
pub use publisher::{BlueskyNetwork, Publisher};
pub use resolver::ImageResolver;
pub use scheduler::{Scheduler, SchedulerState};
pub use selector::SiteLists;
pub use types::{ImageCandidate, SessionToken, Site};
