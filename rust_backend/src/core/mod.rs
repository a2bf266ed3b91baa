//! Core domain models for order daycounts.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: order records, clipped orders, analysis windows and coarse order
//! categories.

pub mod domain;

pub use domain::{AnalysisWindow, ClippedOrder, CoarseOrderType, OrderRecord, CANCELLED_STATUS};
