//! The `get` backend with a shell script standing in for the installer.
//!
//! The script installs `$0` (the dependency location) under the first entry
//! of `GOPATH` and records the `GOPATH` it was given, which is what a real
//! package installer would see.

#![cfg(unix)]

use anyhow::Result;
use predicates::prelude::*;
use std::fs;

use crate::common::TestProject;

const INSTALLER: &str = r#"
search_path_var = "GOPATH"

[tools]
get = ["sh", "-c", 'dest="${GOPATH%%:*}/src/$0"; mkdir -p "$dest" && printf %s "$GOPATH" > "$dest/gopath.txt"']
"#;

#[test]
fn test_get_installs_with_project_search_path() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(INSTALLER)?;
    project.write_manifest(
        r#"
[[dependencies]]
location = "example.org/x/text"

[[dependencies]]
type = "get"
location = "example.org/x/net"
"#,
    )?;

    project.drove().env("GOPATH", "/opt/go").arg("deps").assert().success();

    let root = fs::canonicalize(project.project_path())?;
    let expected = format!("{}:{}:/opt/go", root.join(".drove").display(), root.display());
    for location in ["example.org/x/text", "example.org/x/net"] {
        let recorded = project.source_path().join(location).join("gopath.txt");
        assert_eq!(fs::read_to_string(recorded)?, expected);
    }
    Ok(())
}

#[test]
fn test_installer_failure_names_dependency() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config("[tools]\nget = [\"sh\", \"-c\", \"exit 7\"]\n")?;
    project.write_manifest("[[dependencies]]\nlocation = \"example.org/broken\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch dependency 'example.org/broken'"))
        .stderr(predicate::str::contains("exit code 7"));
    Ok(())
}

#[test]
fn test_tool_output_reaches_terminal() -> Result<()> {
    let project = TestProject::new()?;
    project.write_config(
        "[tools]\nget = [\"sh\", \"-c\", 'echo \"installing $0\"; echo \"warning from $0\" >&2']\n",
    )?;
    project.write_manifest("[[dependencies]]\nlocation = \"example.org/loud\"\n")?;

    project
        .drove()
        .arg("deps")
        .assert()
        .success()
        .stdout(predicate::str::contains("installing example.org/loud"))
        .stderr(predicate::str::contains("warning from example.org/loud"));
    Ok(())
}
