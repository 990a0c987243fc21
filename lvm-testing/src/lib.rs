// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles for the LVM volume driver
//!
//! The host managers and the dispatcher only touch the outside world
//! through [`lvm_sys::CommandRunner`], [`lvm_dispatch::ExecutionUnitApi`]
//! and [`lvm_dispatch::Clock`]. This crate provides deterministic
//! implementations of all three for the scenario tests under `tests/`.

pub mod clock;
pub mod cluster;
pub mod runner;

use std::sync::{Mutex, MutexGuard};

pub use clock::VirtualClock;
pub use cluster::{Call, FakeUnitApi};
pub use runner::ScriptedRunner;

/// Lock a double's state, ignoring poisoning from a panicked test thread
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
