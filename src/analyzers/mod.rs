//! Survey scoring and aggregation.
//!
//! Each response is normalized to 0–10 per metric, bucketed, and tagged for
//! sentiment and themes. The scored rows are then rolled up into KPI and
//! theme tables, overall and per group, from which the executive summary
//! and dashboard document are built.

pub mod aggregate;
pub mod analyzer;
pub mod bucket;
pub mod dashboard;
pub mod summary;
pub mod tagger;
pub mod types;
pub mod utility;
