use std::time::Duration;

/// Simulated round trip for range queries against the event store.
pub const DEFAULT_FETCH_RANGE_LATENCY: Duration = Duration::from_millis(100);

/// Simulated round trip for single-event operations.
pub const DEFAULT_SINGLE_LATENCY: Duration = Duration::from_millis(50);

/// Capacity of the store actor's command queue.
pub const STORE_QUEUE_SIZE: usize = 64;

/// Fractional digits kept when rendering a calculator result.
pub const RESULT_PRECISION: usize = 8;
