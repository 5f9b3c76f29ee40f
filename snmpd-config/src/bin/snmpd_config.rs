//! snmpd config generator - service lifecycle hook
//!
//! Called by the service manager with `start` or `stop` before snmpd runs.
//! `start` renders the daemon config from the appliance settings database,
//! `stop` has nothing to undo.

use anyhow::{anyhow, Context, Result};
use common::{in_current_span, init_logging};
use nix::sys::signal::Signal;
use snmpd_config::{generate, CleanupRegistry, Config, SysctlSource};
use std::env;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

/// Exit status for a malformed invocation
const EXIT_USAGE: i32 = 2;

enum Action {
    Start,
    Stop,
}

impl Action {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("start") => Ok(Self::Start),
            Some("stop") => Ok(Self::Stop),
            Some(other) => Err(anyhow!("unknown action {:?}; usage: snmpd-config [start|stop]", other)),
        }
    }
}

/// Generate the config. Returns `Some(status)` when interrupted by a signal.
async fn start() -> Result<Option<i32>> {
    let config = Config::from_env();
    let cleanup = CleanupRegistry::new();

    info!(
        database = %config.database.display(),
        output = %config.output.display(),
        "Generating snmpd config"
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let worker_cleanup = cleanup.clone();
    let task = tokio::task::spawn_blocking(in_current_span(move || {
        generate(&config, &SysctlSource, &worker_cleanup)
    }));

    tokio::select! {
        result = task => {
            result.context("generation task panicked")??;
            Ok(None)
        }
        _ = sigterm.recv() => Ok(Some(interrupted_status(&cleanup, Signal::SIGTERM))),
        _ = sigint.recv() => Ok(Some(interrupted_status(&cleanup, Signal::SIGINT))),
    }
}

/// Remove in-flight temporary files and give the exit status for `sig`.
/// The live config is left as it was.
fn interrupted_status(cleanup: &CleanupRegistry, sig: Signal) -> i32 {
    let removed = cleanup.purge();
    warn!(signal = %sig, removed, "Interrupted; temporary files removed");
    128 + sig as i32
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _guard = init_logging("snmpd-config");

    let arg = env::args().nth(1);
    let action = match Action::parse(arg.as_deref()) {
        Ok(action) => action,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    match action {
        Action::Stop => {
            info!("Nothing to do on stop");
            Ok(())
        }
        Action::Start => {
            if let Some(status) = start().await? {
                std::process::exit(status);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sigterm_purges_temporary_files_and_exits_143() {
        let dir = tempfile::tempdir().unwrap();
        let cleanup = CleanupRegistry::new();
        let (partial, _token) = cleanup
            .track(|| {
                let path = dir.path().join(".snmpd.conf.partial");
                fs::write(&path, "half a config").map(|_| path)
            })
            .unwrap();

        assert_eq!(interrupted_status(&cleanup, Signal::SIGTERM), 143);
        assert!(!partial.exists());
        assert!(cleanup.pending().is_empty());
    }

    #[test]
    fn test_sigint_exits_130() {
        assert_eq!(interrupted_status(&CleanupRegistry::new(), Signal::SIGINT), 130);
    }

    #[test]
    fn test_action_parsing() {
        assert!(matches!(Action::parse(None), Ok(Action::Start)));
        assert!(matches!(Action::parse(Some("start")), Ok(Action::Start)));
        assert!(matches!(Action::parse(Some("stop")), Ok(Action::Stop)));
        assert!(Action::parse(Some("restart")).is_err());
    }
}
