//! Ingestion pipeline: pure transformations from raw feed records to a
//! stored, ordered, duplicate-free event history.
//!
//! ```text
//! RawRecord ─► Classifier ─► merge ─► (demo) synthesize
//!                  │
//!             BoatNameExtractor
//! ```

pub mod classifier;
pub mod extraction;
pub mod freshness;
pub mod merge;
pub mod synthesizer;

pub use classifier::{ClassifiedBatch, Classifier, ParseError};
pub use extraction::{BoatHint, BoatNameExtractor, BoatNameSource, FirstToken};
pub use freshness::{FreshnessPolicy, needs_refresh};
pub use merge::{IntegrityError, latest_timestamp, merge, verify_history};
pub use synthesizer::synthesize;
