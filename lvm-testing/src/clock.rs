// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lvm_dispatch::Clock;

use crate::lock;

/// Clock that returns immediately and only adds up the requested delays
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    elapsed: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<usize>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        *lock(&self.elapsed)
    }

    pub fn sleeps(&self) -> usize {
        *lock(&self.sleeps)
    }
}

#[async_trait]
impl Clock for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        *lock(&self.elapsed) += duration;
        *lock(&self.sleeps) += 1;
    }
}
