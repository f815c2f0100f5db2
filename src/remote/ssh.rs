//! SSH-backed remote execution.
//!
//! Long-lived processes are launched with `nohup … & echo $!` so the ssh
//! client can return immediately while the launched pid survives the
//! channel. `BatchMode=yes` keeps a misconfigured host from hanging the
//! operator on a password prompt; ssh's own exit status 255 marks channel
//! failures as distinct from remote command failures.

use async_trait::async_trait;
use tokio::process::Command;

use super::{RemoteExecutor, RemoteProcess};
use crate::error::RemoteError;
use crate::fleet::Host;

/// Exit status ssh reserves for its own failures.
const SSH_CHANNEL_FAILURE: i32 = 255;

struct CommandOutput {
    status: i32,
    stdout: String,
    stderr: String,
}

pub struct SshExecutor {
    connect_timeout_secs: u64,
}

impl SshExecutor {
    pub fn new() -> Self {
        Self {
            connect_timeout_secs: 10,
        }
    }

    async fn ssh(&self, host: &Host, remote_command: &str) -> Result<CommandOutput, RemoteError> {
        let output = Command::new("ssh")
            .arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.connect_timeout_secs))
            .arg(&host.name)
            .arg(remote_command)
            .output()
            .await
            .map_err(|e| RemoteError::Spawn {
                host: host.name.clone(),
                source: e,
            })?;

        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if status == SSH_CHANNEL_FAILURE {
            return Err(RemoteError::Unreachable {
                host: host.name.clone(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    }
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `command` so it detaches from the ssh channel and reports its pid.
fn detach_command(command: &str, log_file: &str) -> String {
    format!(
        "mkdir -p \"$(dirname {log_file})\" && nohup {command} > {log_file} 2>&1 < /dev/null & echo $!"
    )
}

fn parse_pid(stdout: &str) -> Option<u32> {
    stdout.trim().lines().last()?.trim().parse().ok()
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn spawn(
        &self,
        host: &Host,
        command: &str,
        log_file: &str,
    ) -> Result<RemoteProcess, RemoteError> {
        let wrapped = detach_command(command, log_file);
        let output = self.ssh(host, &wrapped).await?;

        if output.status != 0 {
            return Err(RemoteError::CommandFailed {
                host: host.name.clone(),
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let pid = parse_pid(&output.stdout).ok_or_else(|| RemoteError::MissingPid {
            host: host.name.clone(),
        })?;

        Ok(RemoteProcess {
            host: host.name.clone(),
            pid,
        })
    }

    async fn terminate(&self, host: &Host, pid: u32) -> Result<(), RemoteError> {
        // `|| true`: a pid that already exited is a success for teardown.
        let command = format!("kill {pid} 2>/dev/null || true");
        self.ssh(host, &command).await.map(|_| ())
    }

    async fn terminate_matching(&self, host: &Host, pattern: &str) -> Result<(), RemoteError> {
        let command = format!("pkill -f '{pattern}' 2>/dev/null || true");
        self.ssh(host, &command).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detach_command_redirects_and_reports_pid() {
        let wrapped = detach_command("server -L tcp:host=10.0.0.1,port=12247", "/tmp/fm/s0.log");
        assert!(wrapped.contains("nohup server -L tcp:host=10.0.0.1,port=12247"));
        assert!(wrapped.contains("> /tmp/fm/s0.log 2>&1"));
        assert!(wrapped.ends_with("& echo $!"));
    }

    #[test]
    fn parse_pid_takes_the_last_line() {
        assert_eq!(parse_pid("12345\n"), Some(12345));
        // Login banners may precede the pid.
        assert_eq!(parse_pid("Welcome to rc01\n9876\n"), Some(9876));
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("not-a-pid\n"), None);
    }
}
