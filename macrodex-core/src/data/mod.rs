//! Source histories and their alignment onto a common timeline.

pub mod align;
pub mod sources;

pub use align::{
    align_row, align_sources, daily_timeline, forward_fill, join_nearest, merge_for_display,
    nearest_within, AlignedRow, ChartPoint, JoinedPoint, INDEX_FALLBACK, NEAREST_TOLERANCE_HOURS,
};
pub use sources::SourceSeries;
