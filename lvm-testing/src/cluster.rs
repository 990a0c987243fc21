// SPDX-License-Identifier: GPL-3.0-only

//! In-memory execution unit API

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lvm_dispatch::{ApiError, ExecutionUnit, ExecutionUnitApi, UnitPhase};

use crate::lock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { namespace: String, name: String },
    Get { namespace: String, name: String },
    Delete { namespace: String, name: String },
}

/// Records every API call and answers status reads from a script.
///
/// Scripted phases are consumed in order; the last one repeats forever.
/// With nothing scripted, units stay `Pending`.
#[derive(Clone)]
pub struct FakeUnitApi {
    calls: Arc<Mutex<Vec<Call>>>,
    units: Arc<Mutex<Vec<ExecutionUnit>>>,
    phases: Arc<Mutex<VecDeque<Result<UnitPhase, ApiError>>>>,
    create_result: Arc<Mutex<Result<(), ApiError>>>,
    delete_result: Arc<Mutex<Result<(), ApiError>>>,
}

impl Default for FakeUnitApi {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            units: Arc::new(Mutex::new(Vec::new())),
            phases: Arc::new(Mutex::new(VecDeque::new())),
            create_result: Arc::new(Mutex::new(Ok(()))),
            delete_result: Arc::new(Mutex::new(Ok(()))),
        }
    }
}

impl FakeUnitApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `phase` for `polls` status reads
    pub fn push_phase(&self, phase: UnitPhase, polls: usize) -> &Self {
        let mut phases = lock(&self.phases);
        phases.extend(std::iter::repeat_n(Ok(phase), polls));
        self
    }

    pub fn push_phase_error(&self, error: ApiError) -> &Self {
        lock(&self.phases).push_back(Err(error));
        self
    }

    pub fn set_create_result(&self, res: Result<(), ApiError>) {
        *lock(&self.create_result) = res;
    }

    pub fn set_delete_result(&self, res: Result<(), ApiError>) {
        *lock(&self.delete_result) = res;
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Units handed to `create`, oldest first
    pub fn submitted(&self) -> Vec<ExecutionUnit> {
        lock(&self.units).clone()
    }

    pub fn gets(&self) -> usize {
        self.count(|call| matches!(call, Call::Get { .. }))
    }

    pub fn deletes(&self) -> usize {
        self.count(|call| matches!(call, Call::Delete { .. }))
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(*call)).count()
    }

    fn next_phase(&self) -> Result<UnitPhase, ApiError> {
        let mut phases = lock(&self.phases);
        if phases.len() > 1 {
            phases.pop_front().unwrap_or(Ok(UnitPhase::Pending))
        } else {
            phases.front().cloned().unwrap_or(Ok(UnitPhase::Pending))
        }
    }
}

#[async_trait]
impl ExecutionUnitApi for FakeUnitApi {
    async fn create(&self, namespace: &str, unit: &ExecutionUnit) -> Result<(), ApiError> {
        lock(&self.calls).push(Call::Create {
            namespace: namespace.to_string(),
            name: unit.name().to_string(),
        });
        lock(&self.units).push(unit.clone());
        lock(&self.create_result).clone()
    }

    async fn phase(&self, namespace: &str, name: &str) -> Result<UnitPhase, ApiError> {
        lock(&self.calls).push(Call::Get {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        self.next_phase()
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ApiError> {
        lock(&self.calls).push(Call::Delete {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        lock(&self.delete_result).clone()
    }
}
