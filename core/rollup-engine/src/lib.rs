//! FILENAME: core/rollup-engine/src/lib.rs
//! Time-bucketed aggregation subsystem for the Terroir dashboards.
//!
//! This crate turns the raw analytics rows returned by the backend into
//! the bucketed series the charts consume. It is deliberately free of any
//! UI or transport concern so it can be driven from tests directly.
//!
//! Layers:
//! - `definition`: Serializable configuration (what a series IS)
//! - `record`: The shared row model and field projection helpers
//! - `keys`: Bucket key functions (day / ISO week / month, local time)
//! - `engine`: The rollup calculation itself

pub mod definition;
pub mod engine;
pub mod keys;
pub mod record;

pub use definition::{Bucket, MeasureKind, MeasureSpec, RollupError, SeriesSpec};
pub use engine::{rollup, AggregatedPoint};
pub use keys::{bucket_key, coarsen_day_key, day_key, month_key, week_key, week_sort_pair};
pub use record::{field_number, field_text, field_timestamp, field_values, SourceRow};
