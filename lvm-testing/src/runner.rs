// SPDX-License-Identifier: GPL-3.0-only

//! Scripted stand-in for the host command runner

use std::io;
use std::sync::{Arc, Mutex};

use lvm_sys::{CommandRunner, ToolOutput, render};

use crate::lock;

#[derive(Debug, Clone)]
enum Reply {
    Output(ToolOutput),
    SpawnError(io::ErrorKind),
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: String,
    reply: Reply,
    /// `None` never runs out
    remaining: Option<usize>,
}

/// Answers commands from a script of rendered-command prefixes.
///
/// The most recently added rule that matches wins. Rules added with
/// [`ScriptedRunner::on_times`] stop matching once used up, exposing older
/// rules again. Unmatched commands succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    rules: Arc<Mutex<Vec<Rule>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` to every command starting with `prefix`
    pub fn on(&self, prefix: &str, output: ToolOutput) -> &Self {
        self.push(prefix, Reply::Output(output), None)
    }

    /// Reply with `output` to the next `times` commands starting with `prefix`
    pub fn on_times(&self, prefix: &str, times: usize, output: ToolOutput) -> &Self {
        self.push(prefix, Reply::Output(output), Some(times))
    }

    /// Fail to start commands starting with `prefix`, as if the binary were missing
    pub fn spawn_error(&self, prefix: &str) -> &Self {
        self.push(prefix, Reply::SpawnError(io::ErrorKind::NotFound), None)
    }

    fn push(&self, prefix: &str, reply: Reply, remaining: Option<usize>) -> &Self {
        lock(&self.rules).push(Rule {
            prefix: prefix.to_string(),
            reply,
            remaining,
        });
        self
    }

    /// Rendered command lines seen so far, oldest first
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ToolOutput> {
        let rendered = render(program, args);
        lock(&self.calls).push(rendered.clone());

        let mut rules = lock(&self.rules);
        let rule = rules
            .iter_mut()
            .rev()
            .find(|rule| rule.remaining != Some(0) && rendered.starts_with(&rule.prefix));

        let Some(rule) = rule else {
            return Ok(ToolOutput::ok(""));
        };
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }

        match &rule.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::SpawnError(kind) => Err(io::Error::new(*kind, format!("{program}: not found"))),
        }
    }
}
