//! Jobwatch Scheduler - round-robin batch scheduling.
//!
//! Wakes on a fixed interval (and once at startup), runs the scanner's
//! batch pipeline over the next window of sources, advances the cursor and
//! appends one entry to the batch log. Manual triggers go through the same
//! single-flight guard as the timer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cursor;
pub mod error;
pub mod scheduler;

pub use cursor::RoundRobinCursor;
pub use error::{Result, SchedulerError};
pub use scheduler::{BatchScheduler, SchedulerState, SchedulerStatus};
