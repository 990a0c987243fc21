// SPDX-License-Identifier: GPL-3.0-only

//! Privileged execution dispatcher
//!
//! Runs a volume action on a specific node by submitting a one-shot
//! privileged execution unit pinned to that node, then polling it until it
//! reaches a terminal phase or the retry budget runs out.

use std::collections::BTreeMap;

use lvm_types::VolumeAction;
use tracing::{error, info, warn};

use crate::api::{ApiError, ExecutionUnitApi, UnitPhase};
use crate::args::provisioner_args;
use crate::config::DriverConfig;
use crate::error::{DispatchError, Result};
use crate::retry::{Clock, RetryPolicy, TokioClock};
use crate::unit::ExecutionUnit;

pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const VERSION_LABEL: &str = "app.kubernetes.io/version";

enum PollOutcome {
    Succeeded,
    Failed,
    /// The unit disappeared while being polled
    Gone,
    TimedOut,
}

pub struct PrivilegedDispatcher<A, C = TokioClock> {
    api: A,
    clock: C,
    config: DriverConfig,
}

impl<A: ExecutionUnitApi> PrivilegedDispatcher<A, TokioClock> {
    pub fn new(api: A, config: DriverConfig) -> Self {
        Self::with_clock(api, TokioClock, config)
    }
}

impl<A: ExecutionUnitApi, C: Clock> PrivilegedDispatcher<A, C> {
    pub fn with_clock(api: A, clock: C, config: DriverConfig) -> Self {
        Self { api, clock, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn labels(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (MANAGED_BY_LABEL.to_string(), self.config.driver_name.clone()),
            (VERSION_LABEL.to_string(), self.config.version.clone()),
        ])
    }

    /// Run `action` on its node, polling once per second for `retry_seconds`
    pub async fn dispatch(&self, action: &VolumeAction, retry_seconds: u32) -> Result<()> {
        self.dispatch_with_policy(action, RetryPolicy::per_second(retry_seconds))
            .await
    }

    pub async fn dispatch_with_policy(
        &self,
        action: &VolumeAction,
        policy: RetryPolicy,
    ) -> Result<()> {
        action.validate()?;
        let args = provisioner_args(action)?;
        info!("start provisioner unit with args: {}", args.join(" "));

        let unit = ExecutionUnit::for_action(action, args, self.labels());
        let name = unit.name().to_string();
        let namespace = action.namespace.as_str();

        match self.api.create(namespace, &unit).await {
            Ok(()) => {}
            // A unit left over from an earlier attempt is polled like a new one.
            Err(ApiError::AlreadyExists) => {
                info!("provisioner unit {} already exists", name);
            }
            Err(e) => return Err(e.into()),
        }

        let result = match self.poll(namespace, &name, policy).await {
            PollOutcome::Gone => {
                info!("provisioner unit {} is already gone", name);
                return Ok(());
            }
            PollOutcome::Succeeded => Ok(()),
            PollOutcome::Failed => Err(DispatchError::ExecutionFailed { unit: name.clone() }),
            PollOutcome::TimedOut => Err(DispatchError::Timeout {
                unit: name.clone(),
                seconds: policy.budget().as_secs(),
            }),
        };

        self.teardown(namespace, &name).await;

        if result.is_ok() {
            info!(
                "{} for volume {} on {} was successful",
                action.kind, action.name, action.node_name
            );
        }
        result
    }

    async fn poll(&self, namespace: &str, name: &str, policy: RetryPolicy) -> PollOutcome {
        for _ in 0..policy.max_attempts {
            self.clock.sleep(policy.interval).await;

            match self.api.phase(namespace, name).await {
                Ok(UnitPhase::Failed) => {
                    info!("provisioner unit {} terminated with failure", name);
                    return PollOutcome::Failed;
                }
                Ok(UnitPhase::Succeeded) => {
                    info!("provisioner unit {} terminated successfully", name);
                    return PollOutcome::Succeeded;
                }
                Ok(phase) => info!("provisioner unit {} status: {:?}", name, phase),
                Err(ApiError::NotFound) => return PollOutcome::Gone,
                Err(e) => error!("error reading provisioner unit {}: {}", name, e),
            }
        }
        PollOutcome::TimedOut
    }

    async fn teardown(&self, namespace: &str, name: &str) {
        match self.api.delete(namespace, name).await {
            Ok(()) | Err(ApiError::NotFound) => {}
            Err(e) => warn!("unable to delete the provisioner unit {}: {}", name, e),
        }
    }
}
