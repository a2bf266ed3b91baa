//! NROWS order daycount - day counts of personnel orders over an analysis window.
//!
//! Orders exported as tab-separated tables are loaded and cleaned
//! ([`io`], [`parsing`], [`transformations`]), clipped to a closed date
//! window and summarised ([`algorithms`]), then written out as a table
//! ([`io::writers`]). [`services`] ties the engine steps together for one run.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod services;
pub mod time;
pub mod transformations;

pub use error::{DaycountError, DaycountResult};
