//! # myinit-daemon
//!
//! Lifecycle helpers for a Unix daemon: resolve state and config paths,
//! detach from the controlling terminal, and manage a PID file.

pub mod paths;
pub mod daemon;
#[cfg(feature = "clap")]
pub mod clap;

pub use paths::{absolutize, DaemonPaths};
pub use daemon::{detach, read_pid, DaemonError, PidFile};
#[cfg(feature = "clap")]
pub use crate::clap::DaemonArgs;
