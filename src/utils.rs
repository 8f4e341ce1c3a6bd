use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::global_constants::{INSTANCE_LOCK_FILE_NAME, LOG_TAG_INSTANCE};

pub fn default_lock_file_path() -> PathBuf {
    std::env::temp_dir().join(INSTANCE_LOCK_FILE_NAME)
}

/// Claims the PID lock file. Fails when another live process holds it; a lock
/// left behind by a dead process is replaced.
pub fn ensure_single_instance(lock_file_path: &Path) -> anyhow::Result<()> {
    let current_pid = std::process::id();

    if let Ok(pid_string) = fs::read_to_string(lock_file_path) {
        if let Ok(pid) = pid_string.trim().parse::<u32>() {
            if pid != current_pid && is_process_running(pid) {
                anyhow::bail!(
                    "another instance is already running with PID {} (lock file {:?})",
                    pid,
                    lock_file_path
                );
            }

            log::info!(
                "{} Previous instance (PID: {}) is not running, cleaning up stale lock file",
                LOG_TAG_INSTANCE,
                pid
            );
        }

        let _ = fs::remove_file(lock_file_path);
    }

    fs::File::create(lock_file_path)
        .and_then(|mut file| file.write_all(current_pid.to_string().as_bytes()))
        .map_err(|e| anyhow::anyhow!("failed to create lock file {:?}: {}", lock_file_path, e))?;

    log::info!(
        "{} Created lock file with PID: {}",
        LOG_TAG_INSTANCE,
        current_pid
    );
    Ok(())
}

fn is_process_running(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[Pid::from_u32(pid)]),
        true,
        ProcessRefreshKind::nothing(),
    );

    system.process(Pid::from_u32(pid)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_lock_file_with_current_pid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("relay.lock");

        ensure_single_instance(&lock_path).unwrap();

        let contents = fs::read_to_string(&lock_path).unwrap();
        assert_eq!(contents, std::process::id().to_string());
    }

    #[test]
    fn test_replaces_unparseable_lock_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("relay.lock");
        fs::write(&lock_path, "garbage").unwrap();

        ensure_single_instance(&lock_path).unwrap();

        assert_eq!(
            fs::read_to_string(&lock_path).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn test_reclaiming_own_lock_is_allowed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("relay.lock");
        fs::write(&lock_path, std::process::id().to_string()).unwrap();

        assert!(ensure_single_instance(&lock_path).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_live_foreign_process_blocks_startup() {
        let mut child = std::process::Command::new("sleep")
            .arg("5")
            .spawn()
            .unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let lock_path = temp_dir.path().join("relay.lock");
        fs::write(&lock_path, child.id().to_string()).unwrap();

        let result = ensure_single_instance(&lock_path);

        child.kill().ok();
        child.wait().ok();
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&lock_path).unwrap(), child.id().to_string());
    }
}
