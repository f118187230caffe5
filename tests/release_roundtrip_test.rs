//! End-to-end release against real git repositories.
//!
//! The working copy pushes to a bare repository on disk. Maven is replaced by a
//! scripted stand-in that edits `pom.xml` the way `versions:set` would; git
//! commands run for real.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use maven_release_action::cli::{ReleaseOrchestrator, RunOutcome};
use maven_release_action::config::{ReleaseSettings, RunConfig, Secret};
use maven_release_action::domain::ProjectVersion;
use maven_release_action::git::WorkingCopy;
use maven_release_action::process::{CommandOutput, CommandRunner, Invocation, SystemRunner};
use maven_release_action::{ReleaseError, Result};

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn pom(version: &str) -> String {
    format!(
        "<project>\n  <artifactId>demo</artifactId>\n  <name>demo</name>\n  <version>{}</version>\n</project>\n",
        version
    )
}

fn pom_version(contents: &str) -> String {
    let start = contents.find("<version>").unwrap() + "<version>".len();
    let end = contents.find("</version>").unwrap();
    contents[start..end].to_string()
}

/// Environment that isolates git from the user's global configuration.
fn isolated_env(home: &Path) -> Vec<(String, String)> {
    vec![
        ("HOME".to_string(), home.display().to_string()),
        ("GIT_CONFIG_NOSYSTEM".to_string(), "1".to_string()),
    ]
}

/// Real git, scripted Maven.
struct ScriptedMaven {
    git: SystemRunner,
    workdir: PathBuf,
    env: Vec<(String, String)>,
    deployed: Mutex<Vec<String>>,
}

impl ScriptedMaven {
    fn ok(stdout: impl Into<String>) -> Result<CommandOutput> {
        Ok(CommandOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    fn descriptor(&self) -> PathBuf {
        self.workdir.join("pom.xml")
    }

    fn current_version(&self) -> Result<ProjectVersion> {
        ProjectVersion::parse(&pom_version(&fs::read_to_string(self.descriptor())?))
    }
}

impl CommandRunner for ScriptedMaven {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        if invocation.program == "git" {
            let isolated = invocation.clone().with_env(&self.env);
            return self.git.invoke(&isolated);
        }

        let args = &invocation.args;
        if args.first().map(String::as_str) == Some("build-helper:parse-version") {
            let current = self.current_version()?;
            let next = if args[2].contains("nextIncrementalVersion") {
                current.next_snapshot()
            } else {
                current.release()
            };
            fs::write(self.descriptor(), pom(&next.to_string()))?;
            return Self::ok("");
        }
        if args.iter().any(|a| a == "-Dexpression=project.name") {
            return Self::ok("demo\n");
        }
        if args.iter().any(|a| a == "-Dexpression=project.version") {
            return Self::ok(format!("{}\n", self.current_version()?));
        }
        if args.first().map(String::as_str) == Some("deploy") {
            self.deployed
                .lock()
                .unwrap()
                .push(self.current_version()?.to_string());
            return Self::ok("");
        }
        Err(ReleaseError::config(format!(
            "unexpected build invocation: {}",
            invocation.command_line()
        )))
    }
}

fn git(dir: &Path, home: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(isolated_env(home))
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

struct Fixture {
    _root: tempfile::TempDir,
    home: PathBuf,
    remote: PathBuf,
    work: PathBuf,
}

fn fixture(initial_version: &str) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let home = root.path().join("home");
    let remote = root.path().join("remote.git");
    let work = root.path().join("work");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&work).unwrap();

    git(root.path(), &home, &["init", "--bare", "remote.git"]);
    git(&work, &home, &["init"]);
    git(&work, &home, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    fs::write(work.join("pom.xml"), pom(initial_version)).unwrap();
    git(&work, &home, &["add", "pom.xml"]);
    git(
        &work,
        &home,
        &[
            "-c",
            "user.name=Setup",
            "-c",
            "user.email=setup@example.com",
            "commit",
            "-m",
            "initial",
        ],
    );
    git(&work, &home, &["remote", "add", "origin", remote.to_str().unwrap()]);
    git(&work, &home, &["push", "-u", "origin", "master"]);

    Fixture {
        _root: root,
        home,
        remote,
        work,
    }
}

fn run_config(fx: &Fixture, git_ref: &str) -> RunConfig {
    RunConfig {
        token: Secret::new("abc"),
        author_name: "Release Bot".to_string(),
        author_email: "bot@example.com".to_string(),
        repository_slug: "acme/demo".to_string(),
        git_ref: git_ref.to_string(),
        workdir: fx.work.clone(),
        home_dir: fx.home.clone(),
    }
}

fn scripted(fx: &Fixture) -> ScriptedMaven {
    ScriptedMaven {
        git: SystemRunner::new(&fx.work),
        workdir: fx.work.clone(),
        env: isolated_env(&fx.home),
        deployed: Mutex::new(Vec::new()),
    }
}

#[test]
fn test_release_round_trip() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let fx = fixture("2.0.0-SNAPSHOT");
    let runner = scripted(&fx);

    let outcome = ReleaseOrchestrator::new(
        run_config(&fx, "refs/heads/master"),
        ReleaseSettings::default(),
        &runner,
    )
    .run()
    .unwrap();

    match &outcome {
        RunOutcome::Released(report) => {
            assert_eq!(report.tag, "demo-2.0.0");
            assert_eq!(report.next_snapshot.as_deref(), Some("2.0.1-SNAPSHOT"));
        }
        other => panic!("expected a release, got {:?}", other),
    }
    assert_eq!(*runner.deployed.lock().unwrap(), vec!["2.0.0".to_string()]);

    let remote = WorkingCopy::open(&fx.remote).unwrap();
    let tip = remote.branch_tip("master").unwrap();
    assert!(pom_version(&remote.file_at(tip, "pom.xml").unwrap()) == "2.0.1-SNAPSHOT");

    let history = remote.first_parent_log(tip, 3).unwrap();
    let messages: Vec<&str> = history.iter().map(|(_, m)| m.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "GitHub Action: SNAPSHOT version",
            "GitHub Action: release version",
            "initial",
        ]
    );

    let release_commit = history[1].0;
    assert_eq!(remote.tag_target("demo-2.0.0").unwrap(), Some(release_commit));
    assert_eq!(
        remote.tag_message("demo-2.0.0").unwrap().as_deref(),
        Some("demo-2.0.0")
    );
    assert_eq!(
        pom_version(&remote.file_at(release_commit, "pom.xml").unwrap()),
        "2.0.0"
    );

    assert!(!fx.home.join(".netrc").exists());
}

#[test]
fn test_skipped_run_leaves_remote_untouched() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let fx = fixture("1.0.0-SNAPSHOT");
    let runner = scripted(&fx);
    let remote = WorkingCopy::open(&fx.remote).unwrap();
    let before = remote.branch_tip("master").unwrap();

    let outcome = ReleaseOrchestrator::new(
        run_config(&fx, "refs/heads/feature-x"),
        ReleaseSettings::default(),
        &runner,
    )
    .run()
    .unwrap();

    assert!(matches!(outcome, RunOutcome::Skipped { .. }));
    assert_eq!(remote.branch_tip("master").unwrap(), before);
    assert_eq!(remote.tag_target("demo-1.0.0").unwrap(), None);
    assert!(runner.deployed.lock().unwrap().is_empty());

    // Only the local identity was configured.
    let local = WorkingCopy::open(&fx.work).unwrap();
    assert_eq!(local.head_ref().unwrap(), "refs/heads/master");
    let config = fs::read_to_string(fx.work.join(".git").join("config")).unwrap();
    assert!(config.contains("Release Bot"));
}
