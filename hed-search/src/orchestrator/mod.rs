//! Search orchestration: per-source scoring, previews, cross-source merge.
//!
//! Each loaded source is scored independently against the query terms,
//! filtered and capped, then all sources are merged into one list ordered
//! by score with priority tie-breaks.

pub mod merge;
pub mod preview;
pub mod scoring;
