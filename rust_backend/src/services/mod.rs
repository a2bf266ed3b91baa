//! Service layer for running a daycount.
//!
//! This module sits between the command line and the engine: it resolves
//! the analysis window and dispatches clipping and aggregation.

pub mod daycount;

pub use daycount::{run_daycount, DaycountOutcome, DaycountRequest};
