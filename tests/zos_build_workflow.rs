use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ussdev::config::{ProjectConfig, UserConfig};
use ussdev::local_files::{Entry, FileSystem};
use ussdev::remote::{FileTransfer, RemoteShell};
use ussdev::remote_env::EnvVars;
use ussdev::utils::command::CommandOutput;
use ussdev::zos_build::{ProgressSink, ZosBuild};
use ussdev::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Run {
        command: String,
        cwd: Option<String>,
        env: EnvVars,
    },
    Upload {
        local: String,
        remote: String,
    },
    Download {
        remote: String,
        local: String,
        binary: bool,
    },
}

#[derive(Default)]
struct FakeRemote {
    calls: RefCell<Vec<Call>>,
    fail_run: Option<&'static str>,
    fail_upload: Option<&'static str>,
    fail_download: Option<&'static str>,
}

impl FakeRemote {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(*c)).count()
    }
}

impl RemoteShell for FakeRemote {
    fn run(&self, command: &str, cwd: Option<&str>, env: &EnvVars) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(Call::Run {
            command: command.to_string(),
            cwd: cwd.map(str::to_string),
            env: env.clone(),
        });
        if self.fail_run.is_some_and(|prefix| command.starts_with(prefix)) {
            return Err(Error::internal_unexpected("command refused"));
        }
        Ok(CommandOutput {
            stdout: "built".to_string(),
            success: true,
            ..Default::default()
        })
    }
}

impl FileTransfer for FakeRemote {
    fn upload(&self, local_path: &str, remote_path: &str) -> Result<()> {
        self.calls.borrow_mut().push(Call::Upload {
            local: local_path.to_string(),
            remote: remote_path.to_string(),
        });
        if self.fail_upload.is_some_and(|name| local_path.ends_with(name)) {
            return Err(Error::internal_unexpected("upload refused"));
        }
        Ok(())
    }

    fn download(&self, remote_path: &str, local_path: &str, binary: bool) -> Result<()> {
        self.calls.borrow_mut().push(Call::Download {
            remote: remote_path.to_string(),
            local: local_path.to_string(),
            binary,
        });
        if self.fail_download.is_some_and(|name| remote_path.ends_with(name)) {
            return Err(Error::internal_unexpected("download refused"));
        }
        Ok(())
    }
}

/// In-memory file system: a map of directory path to its entry names.
#[derive(Default)]
struct FakeFs {
    dirs: BTreeMap<PathBuf, Vec<&'static str>>,
    files: Vec<PathBuf>,
}

impl FakeFs {
    fn with_dir(mut self, dir: &str, entries: Vec<&'static str>) -> Self {
        self.dirs.insert(PathBuf::from(dir), entries);
        self
    }

    fn with_file(mut self, file: &str) -> Self {
        self.files.push(PathBuf::from(file));
        self
    }
}

impl FileSystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains_key(path) || self.files.iter().any(|f| f == path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(path)
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let names = self
            .dirs
            .get(dir)
            .ok_or_else(|| Error::internal_io("not found", None))?;
        Ok(names
            .iter()
            .map(|name| Entry {
                name: name.to_string(),
            })
            .collect())
    }
}

#[derive(Default)]
struct CollectedProgress(RefCell<Vec<String>>);

impl ProgressSink for CollectedProgress {
    fn message(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

fn user(java_home: Option<&str>) -> UserConfig {
    UserConfig {
        zos_target_dir: "/u/dev".to_string(),
        java_home: java_home.map(str::to_string),
        ..Default::default()
    }
}

fn project() -> ProjectConfig {
    let mut build_files = BTreeMap::new();
    build_files.insert("out.so".to_string(), "./build/out.so".to_string());
    ProjectConfig {
        zos_sources_dir: "src".to_string(),
        build_command: "make all".to_string(),
        build_files,
    }
}

fn mkdir_call() -> Call {
    Call::Run {
        command: "mkdir -p '/u/dev/src'".to_string(),
        cwd: None,
        env: EnvVars::new(),
    }
}

#[test]
fn full_build_with_java_home() {
    let user = user(Some("/opt/java"));
    let project = project();
    let fs = FakeFs::default().with_dir("src", vec!["a.c", "b.c"]);
    let remote = FakeRemote::default();
    let progress = CollectedProgress::default();

    let report = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&progress)
        .run(&remote, &remote)
        .unwrap();

    let mut java_env = EnvVars::new();
    java_env.insert("JAVA_HOME".to_string(), "/opt/java".to_string());

    assert_eq!(
        remote.calls(),
        vec![
            mkdir_call(),
            Call::Upload {
                local: "src/a.c".to_string(),
                remote: "/u/dev/src/a.c".to_string(),
            },
            Call::Upload {
                local: "src/b.c".to_string(),
                remote: "/u/dev/src/b.c".to_string(),
            },
            Call::Run {
                command: "make all".to_string(),
                cwd: Some("/u/dev/src".to_string()),
                env: java_env,
            },
            Call::Download {
                remote: "/u/dev/src/out.so".to_string(),
                local: "./build/out.so".to_string(),
                binary: true,
            },
        ]
    );

    assert_eq!(report.zos_dir, "/u/dev/src");
    assert_eq!(report.build.stdout, "built");

    let messages = progress.0.borrow();
    assert_eq!(
        messages.first().map(String::as_str),
        Some("Uploading a.c to /u/dev/src/a.c")
    );
    assert!(messages.contains(&"Building z/OS native code".to_string()));
    assert!(messages
        .iter()
        .any(|m| m == "Downloading /u/dev/src/out.so to ./build/out.so"));
    assert_eq!(messages.last().map(String::as_str), Some("z/OS build completed"));
}

#[test]
fn build_without_java_home_has_empty_env() {
    let user = user(None);
    let project = project();
    let fs = FakeFs::default().with_dir("src", vec!["a.c", "b.c"]);
    let remote = FakeRemote::default();

    ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap();

    let build = remote
        .calls()
        .into_iter()
        .find(|c| matches!(c, Call::Run { command, .. } if command == "make all"))
        .unwrap();
    match build {
        Call::Run { env, .. } => assert!(env.is_empty()),
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn absent_sources_dir_stops_after_mkdir() {
    let user = user(Some("/opt/java"));
    let project = project();
    let fs = FakeFs::default();
    let remote = FakeRemote::default();

    let err = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap_err();

    assert_eq!(err.code.as_str(), "source.dir_not_found");
    assert!(err.message.contains("src"));
    assert_eq!(remote.calls(), vec![mkdir_call()]);
}

#[test]
fn sources_path_that_is_a_file_stops_after_mkdir() {
    let user = user(None);
    let project = project();
    let fs = FakeFs::default().with_file("src");
    let remote = FakeRemote::default();

    let err = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap_err();

    assert_eq!(err.code.as_str(), "source.not_a_directory");
    assert_eq!(remote.calls(), vec![mkdir_call()]);
}

#[test]
fn first_upload_failure_stops_the_workflow() {
    let user = user(None);
    let project = project();
    let fs = FakeFs::default().with_dir("src", vec!["a.c", "b.c", "c.c"]);
    let remote = FakeRemote {
        fail_upload: Some("b.c"),
        ..Default::default()
    };

    let err = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap_err();

    assert_eq!(err.to_string(), "Unexpected error");
    assert_eq!(remote.count(|c| matches!(c, Call::Upload { .. })), 2);
    assert_eq!(remote.count(|c| matches!(c, Call::Run { .. })), 1);
    assert_eq!(remote.count(|c| matches!(c, Call::Download { .. })), 0);
}

#[test]
fn every_build_file_is_downloaded_in_binary_mode() {
    let user = user(None);
    let mut project = project();
    project
        .build_files
        .insert("lib/libzos.a".to_string(), "dist/libzos.a".to_string());
    let fs = FakeFs::default().with_dir("src", vec![]);
    let remote = FakeRemote::default();

    let report = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap();

    let downloads: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Download { .. }))
        .collect();
    assert_eq!(
        downloads,
        vec![
            Call::Download {
                remote: "/u/dev/src/lib/libzos.a".to_string(),
                local: "dist/libzos.a".to_string(),
                binary: true,
            },
            Call::Download {
                remote: "/u/dev/src/out.so".to_string(),
                local: "./build/out.so".to_string(),
                binary: true,
            },
        ]
    );
    assert!(report.uploads.is_empty());
    assert_eq!(report.downloads.len(), 2);
}

#[test]
fn mkdir_failure_stops_before_uploads() {
    let user = user(None);
    let project = project();
    let fs = FakeFs::default().with_dir("src", vec!["a.c", "b.c"]);
    let remote = FakeRemote {
        fail_run: Some("mkdir"),
        ..Default::default()
    };

    let err = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap_err();

    assert_eq!(err.to_string(), "Unexpected error");
    assert_eq!(remote.calls(), vec![mkdir_call()]);
}

#[test]
fn download_failure_stops_remaining_downloads() {
    let user = user(None);
    let mut build_files = BTreeMap::new();
    build_files.insert("a.so".to_string(), "build/a.so".to_string());
    build_files.insert("b.so".to_string(), "build/b.so".to_string());
    let project = ProjectConfig {
        build_files,
        ..project()
    };
    let fs = FakeFs::default().with_dir("src", vec!["a.c"]);
    let remote = FakeRemote {
        fail_download: Some("a.so"),
        ..Default::default()
    };

    let err = ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap_err();

    assert_eq!(err.to_string(), "Unexpected error");
    assert_eq!(remote.count(|c| matches!(c, Call::Run { .. })), 2);
    assert_eq!(
        remote.calls().last(),
        Some(&Call::Download {
            remote: "/u/dev/src/a.so".to_string(),
            local: "build/a.so".to_string(),
            binary: true,
        })
    );
    assert_eq!(remote.count(|c| matches!(c, Call::Download { .. })), 1);
}

#[test]
fn subdirectory_entry_is_uploaded_once() {
    let user = user(None);
    let project = project();
    let fs = FakeFs::default()
        .with_dir("src", vec!["a.c", "h"])
        .with_dir("src/h", vec!["a.h", "b.h"]);
    let remote = FakeRemote::default();

    ZosBuild::new(&user, &project)
        .with_fs(&fs)
        .with_progress(&CollectedProgress::default())
        .run(&remote, &remote)
        .unwrap();

    let uploads: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Upload { .. }))
        .collect();
    assert_eq!(
        uploads,
        vec![
            Call::Upload {
                local: "src/a.c".to_string(),
                remote: "/u/dev/src/a.c".to_string(),
            },
            Call::Upload {
                local: "src/h".to_string(),
                remote: "/u/dev/src/h".to_string(),
            },
        ]
    );
}
