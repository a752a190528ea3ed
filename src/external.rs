use crate::command::{Launcher, Status, Streams, Termination};
use crate::error::LaunchError;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Search path used when `PATH` is not set, as `execvp` does.
pub const DEFAULT_SEARCH_PATH: &str = "/bin:/usr/bin";

/// Runs programs with `std::process::Command`, resolving names through `PATH`.
///
/// The child inherits the shell's standard streams, environment and working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    search_paths: Option<OsString>,
}

impl SystemLauncher {
    /// Launcher that reads `PATH` from the process environment at each launch,
    /// falling back to [`DEFAULT_SEARCH_PATH`] when it is unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher with a fixed search path instead of `PATH`.
    pub fn with_search_paths(search_paths: impl Into<OsString>) -> Self {
        Self {
            search_paths: Some(search_paths.into()),
        }
    }

    fn search_paths(&self) -> OsString {
        match &self.search_paths {
            Some(paths) => paths.clone(),
            None => search_paths_or_default(std::env::var_os("PATH")),
        }
    }
}

fn search_paths_or_default(path: Option<OsString>) -> OsString {
    path.unwrap_or_else(|| DEFAULT_SEARCH_PATH.into())
}

impl Launcher for SystemLauncher {
    fn launch(&self, argv: &[&str]) -> Result<Termination, LaunchError> {
        let Some((&name, args)) = argv.split_first() else {
            return Err(LaunchError::NotFound(String::new()));
        };
        let search_paths = self.search_paths();
        let executable = find_command_path(&search_paths, Path::new(name))
            .ok_or_else(|| LaunchError::NotFound(name.to_string()))?;

        let mut cmd = Command::new(&*executable);
        cmd.args(args);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(name);
        }

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            name: name.to_string(),
            source,
        })?;
        debug!(pid = child.id(), program = %executable.display(), "spawned");

        let exit_status = child.wait().map_err(|source| LaunchError::Spawn {
            name: name.to_string(),
            source,
        })?;
        Ok(termination(exit_status))
    }
}

/// Hand `argv` to `launcher` and report launch failures on the error stream.
///
/// Always returns [`Status::Continue`]: how the child ended does not affect the shell.
pub fn launch(launcher: &dyn Launcher, argv: &[&str], streams: &mut Streams<'_>) -> Status {
    // Anything the shell printed must appear before the child's output.
    let _ = streams.out.flush();
    match launcher.launch(argv) {
        Ok(outcome) => debug!(?outcome, program = argv[0], "child finished"),
        Err(e) => {
            let _ = writeln!(streams.err, "sh: {e}");
        }
    }
    Status::Continue
}

fn termination(exit_status: ExitStatus) -> Termination {
    match exit_status.code() {
        Some(code) => Termination::Exited(code),
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;
    match exit_status.signal() {
        Some(signal) => Termination::Signaled(signal),
        None => Termination::Unknown,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> Termination {
    Termination::Unknown
}

/// Locate the program a command name refers to.
///
/// A name containing a separator is taken as a path: absolute, or relative to the
/// current directory. It is returned when it exists, and `spawn` reports anything
/// wrong with it. A bare name is searched in each directory of `search_paths` in
/// order, and only an executable regular file counts, so a stray data file earlier
/// on the path does not hide a program later on it. An empty name resolves to
/// nothing.
pub fn find_command_path<'a>(search_paths: &OsStr, name: &'a Path) -> Option<Cow<'a, Path>> {
    let mut components = name.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(_), None) if !name.is_absolute() && !name.starts_with("./") => {
            std::env::split_paths(search_paths)
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
                .map(Cow::Owned)
        }
        _ => name.exists().then_some(Cow::Borrowed(name)),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lock_current_dir;
    use std::fs::{self, File};

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/bin"), path).expect("/bin/sh via absolute path");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        assert!(find_command_path(osstr("/bin"), Path::new("/bin/nonexisting")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_search_paths() {
        let found = find_command_path(osstr("/nowhere:/bin"), Path::new("sh"))
            .expect("sh in /bin");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    fn single_component_not_found() {
        assert!(find_command_path(osstr("/bin"), Path::new("this-cmd-does-not-exist")).is_none());
    }

    #[test]
    fn directories_in_search_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tool")).unwrap();
        let search = dir.path().as_os_str();
        assert!(find_command_path(search, Path::new("tool")).is_none());
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(osstr("/bin"), Path::new("")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn relative_paths_resolve_against_current_dir() {
        let _lock = lock_current_dir();
        let before = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        File::create(dir.path().join("bin").join("tool")).unwrap();
        File::create(dir.path().join("foo")).unwrap();

        std::env::set_current_dir(dir.path()).unwrap();
        let nested = find_command_path(osstr("/does/not/matter"), Path::new("bin/tool"))
            .map(Cow::into_owned);
        let dotted = find_command_path(osstr("/bin"), Path::new("./foo")).map(Cow::into_owned);
        std::env::set_current_dir(&before).unwrap();

        assert_eq!(nested.as_deref(), Some(Path::new("bin/tool")));
        assert_eq!(dotted.as_deref(), Some(Path::new("./foo")));
    }

    #[test]
    #[cfg(unix)]
    fn system_launcher_reports_exit_code() {
        let launcher = SystemLauncher::new();
        assert_eq!(launcher.launch(&["true"]).unwrap(), Termination::Exited(0));
        assert_eq!(launcher.launch(&["false"]).unwrap(), Termination::Exited(1));
        assert_eq!(
            launcher.launch(&["sh", "-c", "exit 7"]).unwrap(),
            Termination::Exited(7)
        );
    }

    #[test]
    #[cfg(unix)]
    fn system_launcher_reports_signal() {
        let launcher = SystemLauncher::new();
        let outcome = launcher.launch(&["sh", "-c", "kill -TERM $$"]).unwrap();
        assert_eq!(outcome, Termination::Signaled(15));
    }

    #[test]
    fn system_launcher_unknown_program() {
        let launcher = SystemLauncher::with_search_paths("/nowhere");
        let err = launcher.launch(&["this-cmd-does-not-exist"]).unwrap_err();
        assert!(matches!(err, LaunchError::NotFound(ref name) if name == "this-cmd-does-not-exist"));
    }

    #[cfg(unix)]
    fn make_executable(path: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, script).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_file_on_search_path_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("data")).unwrap();
        let launcher = SystemLauncher::with_search_paths(dir.path().as_os_str());
        let err = launcher.launch(&["data"]).unwrap_err();
        assert!(matches!(err, LaunchError::NotFound(ref name) if name == "data"), "{err:?}");
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_file_does_not_shadow_later_program() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        File::create(first.path().join("tool")).unwrap();
        make_executable(&second.path().join("tool"), "#!/bin/sh\nexit 0\n");
        let search = std::env::join_paths([first.path(), second.path()]).unwrap();

        let found = find_command_path(&search, Path::new("tool")).map(Cow::into_owned);
        assert_eq!(found, Some(second.path().join("tool")));

        let launcher = SystemLauncher::with_search_paths(search);
        assert_eq!(launcher.launch(&["tool"]).unwrap(), Termination::Exited(0));
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_path_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        File::create(&data).unwrap();
        let launcher = SystemLauncher::new();
        let err = launcher.launch(&[data.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }), "{err:?}");
    }

    #[test]
    fn unset_path_falls_back_to_default_search_path() {
        assert_eq!(search_paths_or_default(None), OsString::from(DEFAULT_SEARCH_PATH));
        assert_eq!(
            search_paths_or_default(Some(OsString::from("/opt/bin"))),
            OsString::from("/opt/bin")
        );
    }

    #[test]
    #[cfg(unix)]
    fn default_search_path_finds_sh() {
        let found = find_command_path(OsStr::new(DEFAULT_SEARCH_PATH), Path::new("sh"));
        assert_eq!(found.as_deref(), Some(Path::new("/bin/sh")));
    }

    #[test]
    fn launch_reports_failures_and_continues() {
        let launcher = SystemLauncher::with_search_paths("/nowhere");
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let status = launch(
            &launcher,
            &["this-cmd-does-not-exist", "arg"],
            &mut Streams::new(&mut out, &mut err),
        );

        assert_eq!(status, Status::Continue);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "sh: this-cmd-does-not-exist: command not found\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn failing_child_still_continues() {
        let launcher = SystemLauncher::new();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = launch(&launcher, &["false"], &mut Streams::new(&mut out, &mut err));
        assert_eq!(status, Status::Continue);
        assert!(err.is_empty());
    }
}
