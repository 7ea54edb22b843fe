//! Report ingestion and aggregation core
//!
//! Pure building blocks for the civic reports service:
//! - `validate`: required-field and location shape checks
//! - `normalize`: canonical stored form, stamped with an injected clock
//! - `aggregate`: per-sector and per-city counts plus the average amount
//!
//! Nothing here touches storage or the network.

pub mod aggregator;
pub mod model;
pub mod normalizer;
pub mod validator;

pub use aggregator::{aggregate, Stats, StatsAccumulator, UNKNOWN_GROUP};
pub use model::{
    Location, RawSubmission, Report, StoredReport, ValidSubmission, DEFAULT_CHANNEL,
    MAX_SECTOR_CHARS,
};
pub use normalizer::{normalize, try_parse_number};
pub use validator::{validate, ValidationError, REQUIRED_FIELDS};
