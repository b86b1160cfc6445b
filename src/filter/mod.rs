//! Client-side filtering of fetched record sets.
//!
//! Text filters match by prefix after case and accent folding; the date range
//! compares calendar days inclusively. Every active filter must hold.

pub mod descriptor;
pub mod engine;
pub mod normalize;

pub use descriptor::{FilterDescriptor, FilterKind, FilterState, END_DATE_KEY, START_DATE_KEY};
pub use engine::{apply_filters, FilterConfig, FilterView, Record};
pub use normalize::normalize;
