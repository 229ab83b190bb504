#[cfg(feature = "latency")]
mod latency;
#[cfg(feature = "latency")]
pub use latency::latency_ms;

#[cfg(feature = "leaked-5xx")]
mod leaked_5xx;
#[cfg(feature = "leaked-5xx")]
pub use leaked_5xx::handle_leaked_5xx;
