// SPDX-License-Identifier: GPL-3.0-only

//! External tool execution
//!
//! Every host operation goes through [`CommandRunner`], so managers can be
//! driven by a scripted double in tests.

use std::process::Command;

use tracing::{debug, info};

use crate::error::{Result, SysError};

/// Binaries the LVM managers rely on
pub const LVM_TOOLS: &[&str] = &[
    "vgs", "vgscan", "vgchange", "vgcreate", "lvs", "lvcreate", "lvextend", "lvremove",
];

/// Binaries the mount manager relies on, apart from `mkfs.<fstype>`
pub const MOUNT_TOOLS: &[&str] = &["blkid", "mount", "umount"];

/// Exit status and combined stdout/stderr of a finished tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Capability to run an external program to completion
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// Runs tools on the local host
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCommandRunner;

impl CommandRunner for HostCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        let output = Command::new(program).args(args).output()?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ToolOutput {
            success: output.status.success(),
            output: combined,
        })
    }
}

pub fn render(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Run a tool and return its output whatever the exit status.
pub(crate) fn probe<R: CommandRunner>(
    runner: &R,
    program: &str,
    args: &[String],
) -> Result<ToolOutput> {
    debug!("{}", render(program, args));
    Ok(runner.run(program, args)?)
}

/// Run a tool, turning a non-zero exit into [`SysError::ExternalTool`].
pub(crate) fn exec<R: CommandRunner>(runner: &R, program: &str, args: &[String]) -> Result<String> {
    let rendered = render(program, args);
    info!("{}", rendered);
    let out = runner.run(program, args)?;
    if !out.success {
        return Err(SysError::ExternalTool {
            command: rendered,
            output: out.output,
            message: format!("{program} failed"),
        });
    }
    Ok(out.output)
}

/// Names from `tools` that cannot be resolved on `PATH`
pub fn missing_tools(tools: &[&str]) -> Vec<String> {
    tools
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| tool.to_string())
        .collect()
}

pub(crate) fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_command_context() {
        let rendered = render("lvremove", &args(["-q", "-y", "vg0/pvc-1"]));
        assert_eq!(rendered, "lvremove -q -y vg0/pvc-1");
        assert_eq!(render("vgscan", &[]), "vgscan");
    }

    #[test]
    fn reports_unresolvable_tools() {
        let missing = missing_tools(&["lvm-driver-no-such-tool"]);
        assert_eq!(missing, vec!["lvm-driver-no-such-tool".to_string()]);
    }

    #[test]
    fn host_runner_combines_streams() {
        let out = HostCommandRunner
            .run("sh", &args(["-c", "echo out; echo err 1>&2; exit 3"]))
            .expect("sh should run");
        assert!(!out.success);
        assert!(out.output.contains("out"));
        assert!(out.output.contains("err"));
    }
}
