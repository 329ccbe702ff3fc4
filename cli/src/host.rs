// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local system host provider
//!
//! Files and directories are managed beneath `root` (normally `/`). Packages
//! go through dpkg/apt or rpm/dnf/yum, services through systemctl.

use std::ffi::{CStr, CString};
use std::fs;
use std::io::Write;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use fwknop_core::domain::host::{FileState, HostError, HostProvider, Ownership, ServiceState};
use fwknop_core::domain::resource::{FileMode, FileSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageManager {
    Apt,
    Dnf,
    Yum,
}

impl PackageManager {
    fn detect() -> Option<Self> {
        if which::which("dpkg-query").is_ok() && which::which("apt-get").is_ok() {
            Some(Self::Apt)
        } else if which::which("rpm").is_ok() && which::which("dnf").is_ok() {
            Some(Self::Dnf)
        } else if which::which("rpm").is_ok() && which::which("yum").is_ok() {
            Some(Self::Yum)
        } else {
            None
        }
    }
}

pub struct LocalHost {
    root: PathBuf,
    package_manager: Option<PackageManager>,
}

impl LocalHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let package_manager = PackageManager::detect();
        debug!(?package_manager, "Detected package manager");
        Self {
            root: root.into(),
            package_manager,
        }
    }

    fn is_system_root(&self) -> bool {
        self.root == Path::new("/")
    }

    /// Map an absolute managed path beneath `root`.
    fn resolve(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("/") {
            Ok(relative) => self.root.join(relative),
            Err(_) => self.root.join(path),
        }
    }

    fn ownership_of(&self, metadata: &fs::Metadata) -> Ownership {
        Ownership {
            owner: user_name(metadata.uid()).unwrap_or_else(|| metadata.uid().to_string()),
            group: group_name(metadata.gid()).unwrap_or_else(|| metadata.gid().to_string()),
            mode: FileMode(metadata.permissions().mode() & 0o7777),
        }
    }

    fn apply_ownership(&self, path: &Path, ownership: &Ownership) -> Result<(), HostError> {
        fs::set_permissions(path, fs::Permissions::from_mode(ownership.mode.0))
            .map_err(|e| HostError::io(path, e))?;

        if self.manages_ownership() {
            let uid = user_id(&ownership.owner)?;
            let gid = group_id(&ownership.group)?;
            std::os::unix::fs::chown(path, Some(uid), Some(gid))
                .map_err(|e| HostError::io(path, e))?;
        }
        Ok(())
    }

    fn package_manager(&self) -> Result<PackageManager, HostError> {
        self.package_manager.ok_or_else(|| {
            HostError::Unsupported("no supported package manager (apt, dnf, yum) found".to_string())
        })
    }
}

impl HostProvider for LocalHost {
    fn manages_ownership(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail
        let uid = unsafe { libc::geteuid() };
        uid == 0 && self.is_system_root()
    }

    fn package_installed(&self, name: &str) -> Result<bool, HostError> {
        match self.package_manager()? {
            PackageManager::Apt => {
                let output = Command::new("dpkg-query")
                    .args(["-W", "-f=${Status}", name])
                    .output()
                    .map_err(|e| HostError::io("dpkg-query", e))?;
                Ok(output.status.success()
                    && String::from_utf8_lossy(&output.stdout).ends_with(" ok installed"))
            }
            PackageManager::Dnf | PackageManager::Yum => {
                let status = Command::new("rpm")
                    .args(["-q", "--quiet", name])
                    .status()
                    .map_err(|e| HostError::io("rpm", e))?;
                Ok(status.success())
            }
        }
    }

    fn install_package(&mut self, name: &str) -> Result<(), HostError> {
        info!(package = name, "Installing package");
        let mut command = match self.package_manager()? {
            PackageManager::Apt => {
                let mut command = Command::new("apt-get");
                command
                    .env("DEBIAN_FRONTEND", "noninteractive")
                    .args(["install", "-y", name]);
                command
            }
            PackageManager::Dnf => {
                let mut command = Command::new("dnf");
                command.args(["install", "-y", name]);
                command
            }
            PackageManager::Yum => {
                let mut command = Command::new("yum");
                command.args(["install", "-y", name]);
                command
            }
        };
        run(&mut command)
    }

    fn directory_state(&self, path: &Path) -> Result<Option<Ownership>, HostError> {
        let target = self.resolve(path);
        match fs::metadata(&target) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(self.ownership_of(&metadata))),
            Ok(_) => Err(HostError::io(
                &target,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HostError::io(&target, e)),
        }
    }

    fn ensure_directory(&mut self, path: &Path, ownership: &Ownership) -> Result<(), HostError> {
        let target = self.resolve(path);
        fs::create_dir_all(&target).map_err(|e| HostError::io(&target, e))?;
        self.apply_ownership(&target, ownership)
    }

    fn file_state(&self, path: &Path) -> Result<Option<FileState>, HostError> {
        let target = self.resolve(path);
        let metadata = match fs::metadata(&target) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HostError::io(&target, e)),
        };
        let content = fs::read(&target).map_err(|e| HostError::io(&target, e))?;
        Ok(Some(FileState {
            content,
            ownership: self.ownership_of(&metadata),
        }))
    }

    fn write_file(&mut self, spec: &FileSpec) -> Result<(), HostError> {
        let target = self.resolve(&spec.path);
        let parent = target.parent().unwrap_or(self.root.as_path());

        // Owner-only until persisted; removed on drop if anything below fails.
        let mut temp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| HostError::io(parent, e))?;
        temp.write_all(spec.content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| HostError::io(temp.path(), e))?;

        self.apply_ownership(temp.path(), &spec.ownership())?;
        temp.persist(&target)
            .map_err(|e| HostError::io(&target, e.error))?;
        debug!(path = ?target, sensitive = spec.sensitive, "Wrote file");
        Ok(())
    }

    fn service_state(&self, name: &str) -> Result<ServiceState, HostError> {
        Ok(ServiceState {
            running: systemctl_query("is-active", name)?,
            enabled: systemctl_query("is-enabled", name)?,
        })
    }

    fn start_service(&mut self, name: &str) -> Result<(), HostError> {
        run(Command::new(systemctl()?).args(["start", name]))
    }

    fn enable_service(&mut self, name: &str) -> Result<(), HostError> {
        run(Command::new(systemctl()?).args(["enable", name]))
    }

    fn restart_service(&mut self, name: &str) -> Result<(), HostError> {
        info!(service = name, "Restarting service");
        run(Command::new(systemctl()?).args(["restart", name]))
    }
}

fn systemctl() -> Result<PathBuf, HostError> {
    which::which("systemctl")
        .map_err(|_| HostError::Unsupported("systemctl not found".to_string()))
}

fn systemctl_query(verb: &str, name: &str) -> Result<bool, HostError> {
    let status = Command::new(systemctl()?)
        .args([verb, "--quiet", name])
        .status()
        .map_err(|e| HostError::io("systemctl", e))?;
    Ok(status.success())
}

fn run(command: &mut Command) -> Result<(), HostError> {
    let rendered = format!("{:?}", command);
    debug!(command = %rendered, "Running");
    let output = command
        .output()
        .map_err(|e| HostError::io(command.get_program(), e))?;

    if !output.status.success() {
        return Err(HostError::Command {
            command: rendered,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Run a reentrant NSS lookup, growing the buffer on `ERANGE`.
fn nss_lookup<T>(
    mut call: impl FnMut(&mut [libc::c_char]) -> (libc::c_int, Option<T>),
) -> std::io::Result<Option<T>> {
    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        match call(&mut buf) {
            (0, found) => return Ok(found),
            (libc::ERANGE, _) if buf.len() < 1 << 20 => buf.resize(buf.len() * 2, 0),
            (rc, _) => return Err(std::io::Error::from_raw_os_error(rc)),
        }
    }
}

fn unknown(kind: &str, name: &str) -> HostError {
    HostError::Unsupported(format!("unknown {} '{}'", kind, name))
}

fn user_id(name: &str) -> Result<u32, HostError> {
    if let Ok(id) = name.parse() {
        return Ok(id);
    }
    let c_name = CString::new(name).map_err(|_| unknown("user", name))?;
    // SAFETY: zeroed passwd is a valid out-parameter for getpwnam_r
    let mut entry: libc::passwd = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();
    nss_lookup(|buf| {
        // SAFETY: every pointer is valid for the call and buf.len() is the buffer size
        let rc = unsafe {
            libc::getpwnam_r(c_name.as_ptr(), &mut entry, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        (rc, (!result.is_null()).then_some(entry.pw_uid))
    })
    .map_err(|e| HostError::io("getpwnam_r", e))?
    .ok_or_else(|| unknown("user", name))
}

fn group_id(name: &str) -> Result<u32, HostError> {
    if let Ok(id) = name.parse() {
        return Ok(id);
    }
    let c_name = CString::new(name).map_err(|_| unknown("group", name))?;
    // SAFETY: zeroed group is a valid out-parameter for getgrnam_r
    let mut entry: libc::group = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::group = std::ptr::null_mut();
    nss_lookup(|buf| {
        // SAFETY: every pointer is valid for the call and buf.len() is the buffer size
        let rc = unsafe {
            libc::getgrnam_r(c_name.as_ptr(), &mut entry, buf.as_mut_ptr(), buf.len(), &mut result)
        };
        (rc, (!result.is_null()).then_some(entry.gr_gid))
    })
    .map_err(|e| HostError::io("getgrnam_r", e))?
    .ok_or_else(|| unknown("group", name))
}

fn user_name(uid: u32) -> Option<String> {
    // SAFETY: zeroed passwd is a valid out-parameter for getpwuid_r
    let mut entry: libc::passwd = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();
    nss_lookup(|buf| {
        // SAFETY: every pointer is valid for the call; pw_name points into buf,
        // which outlives the copy below
        let rc = unsafe { libc::getpwuid_r(uid, &mut entry, buf.as_mut_ptr(), buf.len(), &mut result) };
        let name = (!result.is_null())
            .then(|| unsafe { CStr::from_ptr(entry.pw_name) }.to_string_lossy().into_owned());
        (rc, name)
    })
    .ok()
    .flatten()
}

fn group_name(gid: u32) -> Option<String> {
    // SAFETY: zeroed group is a valid out-parameter for getgrgid_r
    let mut entry: libc::group = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::group = std::ptr::null_mut();
    nss_lookup(|buf| {
        // SAFETY: every pointer is valid for the call; gr_name points into buf,
        // which outlives the copy below
        let rc = unsafe { libc::getgrgid_r(gid, &mut entry, buf.as_mut_ptr(), buf.len(), &mut result) };
        let name = (!result.is_null())
            .then(|| unsafe { CStr::from_ptr(entry.gr_name) }.to_string_lossy().into_owned());
        (rc, name)
    })
    .ok()
    .flatten()
}
