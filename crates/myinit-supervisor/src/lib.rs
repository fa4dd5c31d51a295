//! # myinit-supervisor
//!
//! Keeps a fixed list of commands running. Each line of a plain-text
//! configuration file names an executable, its arguments and two files for
//! the child's stdin and stdout/stderr:
//!
//! ```text
//! # EXECUTABLE [ARGS...] STDIN STDOUT
//! /usr/bin/tail -f /var/log/syslog /dev/null /tmp/tail.out
//! ```
//!
//! Exited children are restarted on the next poll. A reload (normally
//! triggered by SIGHUP) stops everything and rebuilds the table from the
//! file.
//!
//! ```rust,no_run
//! use myinit_supervisor::{reload, Supervisor, DEFAULT_CAPACITY};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> std::io::Result<()> {
//! let mut supervisor = Supervisor::new("/etc/myinit.conf", DEFAULT_CAPACITY);
//! reload::listen_for_hangup(supervisor.reload_flag())?;
//! supervisor.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod launcher;
pub mod reaper;
pub mod reload;
pub mod spec;
pub mod supervisor;
pub mod table;

pub use launcher::LaunchError;
pub use reaper::{ExitOutcome, ReapAction, Reaped};
pub use reload::ReloadFlag;
pub use spec::{ParseError, ProcessSpec};
pub use supervisor::{LoadReport, State, Supervisor, Timings, GRACE_PERIOD, POLL_INTERVAL};
pub use table::{ProcessSlot, ProcessTable, TableFull, DEFAULT_CAPACITY};
