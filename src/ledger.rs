// Thin re-export module: chain keeps the synchronous sequence and its
// admission invariants, validation the anomaly scan, and handle the async
// facade callers go through.

pub mod chain;
pub mod handle;
pub mod validation;

pub use chain::*;
pub use handle::*;
pub use validation::*;
