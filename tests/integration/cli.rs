//! Subcommands of the `drove` binary.

use anyhow::Result;
use predicates::prelude::*;
use std::fs;

use crate::common::{TestProject, drove_cmd};

fn canonical(project: &TestProject) -> Result<std::path::PathBuf> {
    Ok(fs::canonicalize(project.project_path())?)
}

#[test]
fn test_root_from_subdirectory() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    let nested = project.project_path().join("cmd/server");
    fs::create_dir_all(&nested)?;

    project
        .drove()
        .current_dir(&nested)
        .arg("root")
        .assert()
        .success()
        .stdout(format!("{}\n", canonical(&project)?.display()));
    Ok(())
}

#[test]
fn test_root_with_legacy_manifest_only() -> Result<()> {
    let project = TestProject::new()?;
    project.write_legacy_manifest("")?;

    project
        .drove()
        .arg("root")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(format!("{}\n", canonical(&project)?.display())));
    Ok(())
}

#[test]
fn test_no_project_found() -> Result<()> {
    let temp = tempfile::TempDir::new()?;

    drove_cmd()
        .current_dir(temp.path())
        .env("DROVE_CONFIG", temp.path().join("none.toml"))
        .arg("root")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No drove.toml or Drovefile found"))
        .stderr(predicate::str::contains("--manifest-path"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_env_prints_search_path() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    let root = canonical(&project)?;

    project
        .drove()
        .arg("env")
        .assert()
        .success()
        .stdout(format!("GOPATH={}:{}\n", root.join(".drove").display(), root.display()));

    project
        .drove()
        .env("GOPATH", "/opt/go")
        .args(["env", "--value-only"])
        .assert()
        .success()
        .stdout(format!("{}:{}:/opt/go\n", root.join(".drove").display(), root.display()));
    Ok(())
}

#[test]
fn test_env_uses_configured_variable() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    project.write_config("search_path_var = \"DROVEPATH\"\n")?;

    project.drove().arg("env").assert().success().stdout(predicate::str::starts_with("DROVEPATH="));
    Ok(())
}

#[test]
fn test_manifest_path_from_outside_project() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    let outside = tempfile::TempDir::new()?;

    project
        .drove()
        .current_dir(outside.path())
        .arg("--manifest-path")
        .arg(project.project_path().join("drove.toml"))
        .arg("root")
        .assert()
        .success()
        .stdout(format!("{}\n", project.project_path().display()));
    Ok(())
}

#[test]
fn test_deps_without_dependencies() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[project]\nname = \"empty\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetched 0 direct dependencies"));

    project.drove().args(["--quiet", "deps"]).assert().success().stdout("");
    Ok(())
}

#[test]
fn test_deps_unknown_type() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[[dependencies]]\ntype = \"svn\"\nlocation = \"https://svn.example.com/x\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch dependency 'https://svn.example.com/x'"))
        .stderr(predicate::str::contains("Unknown dependency type: 'svn'"));
    assert!(!project.source_path().exists());
    Ok(())
}

#[test]
fn test_deps_invalid_manifest() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("[[dependencies]]\ntype = \"git\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load manifest"));
    Ok(())
}

#[test]
fn test_missing_tool_is_reported() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("[tools]\ngit = \"drove-test-no-such-git\"\n")?;
    project.write_manifest("[[dependencies]]\ntype = \"git\"\nlocation = \"https://example.com/a.git\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("drove-test-no-such-git is not installed"));
    Ok(())
}

#[test]
fn test_invalid_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    project.write_config("[tools]\nget = []\n")?;

    project
        .drove()
        .arg("root")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_applies_search_path_and_exit_code() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;
    let root = canonical(&project)?;

    project
        .drove()
        .args(["exec", "--", "sh", "-c", "printf %s \"$GOPATH\""])
        .assert()
        .success()
        .stdout(format!("{}:{}", root.join(".drove").display(), root.display()));

    project.drove().args(["exec", "--", "sh", "-c", "exit 3"]).assert().code(3);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_exec_streams_child_output() -> Result<()> {
    let project = TestProject::new()?;
    project.write_manifest("")?;

    project
        .drove()
        .args(["exec", "--", "sh", "-c", "echo out; echo err >&2"])
        .assert()
        .success()
        .stdout("out\n")
        .stderr(predicate::str::contains("err"));
    Ok(())
}
