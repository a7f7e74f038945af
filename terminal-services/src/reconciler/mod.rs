//! Data reconciler
//!
//! Pure functions that merge per-provider `Result`s into canonical
//! snapshots. Each source is optional; the fallback for a missing source
//! is fixed per field and documented next to the merge.

mod chart;
mod historical;
mod market;
mod network;

pub use chart::build_chart_series;
pub use historical::reconcile_historical;
pub use market::reconcile_market;
pub use network::{collapse_pools, reconcile_network, NetworkInputs, NetworkReport};
