//! Liveness probing through the system `ping` utility.

use crate::discovery::traits::{LivenessProber, ProbeKind};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

/// Spawns one `ping` per address.
///
/// The command-line flags differ between Windows and everything else. The
/// child is killed if it outlives the timeout, since `-W` on Unix only has
/// one-second granularity.
#[derive(Debug, Clone)]
pub struct PingProber {
    program: &'static str,
    timeout: Duration,
}

impl PingProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "ping",
            timeout,
        }
    }

    #[cfg(test)]
    fn with_program(program: &'static str, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    fn command(&self, addr: Ipv4Addr) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(ping_args(addr, self.timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// Build the argument list for a single echo request.
#[cfg(windows)]
fn ping_args(addr: Ipv4Addr, wait: Duration) -> Vec<String> {
    vec![
        "-n".to_string(),
        "1".to_string(),
        "-w".to_string(),
        wait.as_millis().max(1).to_string(),
        addr.to_string(),
    ]
}

/// Build the argument list for a single echo request.
#[cfg(not(windows))]
fn ping_args(addr: Ipv4Addr, wait: Duration) -> Vec<String> {
    let secs = wait.as_millis().div_ceil(1000).max(1);
    vec![
        "-c".to_string(),
        "1".to_string(),
        "-W".to_string(),
        secs.to_string(),
        addr.to_string(),
    ]
}

#[async_trait]
impl LivenessProber for PingProber {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Ping
    }

    fn requires_privileges(&self) -> bool {
        false
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn is_alive(&self, addr: Ipv4Addr) -> bool {
        let child = match self.command(addr).spawn() {
            Ok(child) => child,
            Err(e) => {
                trace!(%addr, program = self.program, error = %e, "failed to spawn ping");
                return false;
            }
        };

        // Dropping the future on timeout drops the child, which kills it.
        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "ping did not complete");
                false
            }
            Err(_) => {
                trace!(%addr, "ping timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_args_single_echo() {
        let args = ping_args(Ipv4Addr::new(10, 0, 0, 1), Duration::from_millis(200));
        assert_eq!(args.len(), 5);
        assert_eq!(args[1], "1");
        assert_eq!(args[4], "10.0.0.1");
        #[cfg(windows)]
        assert_eq!(args[0..4], ["-n", "1", "-w", "200"]);
        #[cfg(not(windows))]
        assert_eq!(args[0..4], ["-c", "1", "-W", "1"]);
    }

    #[test]
    fn test_prober_metadata() {
        let prober = PingProber::new(Duration::from_millis(200));
        assert_eq!(prober.kind(), ProbeKind::Ping);
        assert!(!prober.requires_privileges());
        assert_eq!(prober.timeout(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_missing_binary_means_not_alive() {
        let prober = PingProber::with_program("netsweep-no-such-ping", Duration::from_millis(200));
        assert!(!prober.is_alive(Ipv4Addr::LOCALHOST).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_means_not_alive() {
        // `false` ignores its arguments and exits with status 1.
        let prober = PingProber::with_program("false", Duration::from_millis(500));
        assert!(!prober.is_alive(Ipv4Addr::LOCALHOST).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_means_alive() {
        let prober = PingProber::with_program("true", Duration::from_millis(500));
        assert!(prober.is_alive(Ipv4Addr::LOCALHOST).await);
    }

    #[tokio::test]
    async fn test_probe_never_exceeds_timeout() {
        // TEST-NET-1 is unroutable, so this either fails fast or gets cut off.
        let prober = PingProber::new(Duration::from_millis(200));
        let start = std::time::Instant::now();
        let _ = prober.is_alive(Ipv4Addr::new(192, 0, 2, 1)).await;
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
