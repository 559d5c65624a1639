//! Windowed broadcast counting.

mod window_aggregator;

pub use window_aggregator::WindowAggregator;
