//! Search results, statistics and plan files.
//!
//! Provides the types a search reports back to its caller and the
//! reader/writer for the line-oriented plan format.

pub mod reader;
pub mod types;
pub mod writer;

pub use reader::PlanReader;
pub use types::{PlanIoError, SearchResult, SearchStats, TerminationReason};
pub use writer::{write_plan, PlanWriter};
