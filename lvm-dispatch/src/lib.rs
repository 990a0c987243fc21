// SPDX-License-Identifier: GPL-3.0-only

//! Remote execution of volume actions
//!
//! Operations that must run on a node other than the caller's are packaged
//! as a privileged, node-pinned execution unit, submitted through the
//! cluster API and polled to a terminal outcome:
//! - Provisioner argument encoding
//! - Execution unit manifest
//! - Polling with a pluggable clock
//! - Failure classification for rescheduling

pub mod api;
pub mod args;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod retry;
pub mod unit;

pub use api::{ApiError, ExecutionUnitApi, UnitPhase};
pub use args::provisioner_args;
pub use config::{ConfigError, DriverConfig};
pub use dispatcher::{MANAGED_BY_LABEL, PrivilegedDispatcher, VERSION_LABEL};
pub use error::{DispatchError, ErrorKind, Result};
pub use retry::{Clock, RetryPolicy, TokioClock};
pub use unit::{ExecutionUnit, unit_name};
