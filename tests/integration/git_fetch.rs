//! Fetching real git repositories through the library.
//!
//! These tests read the process working directory, so they run serially.

use anyhow::Result;
use drove_cli::config::GlobalConfig;
use drove_cli::core::DroveError;
use drove_cli::environment::Environment;
use drove_cli::fetcher::DependencyFetcher;
use serial_test::serial;
use std::fs;

use crate::common::{TestProject, git_dependency};

fn fetcher() -> DependencyFetcher {
    DependencyFetcher::from_config(&GlobalConfig::default())
}

#[tokio::test]
#[serial]
async fn test_transitive_tree_lands_in_root_library() -> Result<()> {
    let project = TestProject::new()?;

    let d1 = project.create_source_repo("d1")?;
    d1.write_file("README", "d1")?;
    d1.commit_all("d1")?;

    let d3 = project.create_source_repo("d3")?;
    d3.write_file("README", "d3")?;
    d3.commit_all("d3")?;

    let d2 = project.create_source_repo("d2")?;
    d2.write_file("README", "d2")?;
    d2.write_manifest(&git_dependency(&d3.location(), "example.com/d3", None))?;
    d2.commit_all("d2")?;

    project.write_manifest(&format!(
        "{}\n{}",
        git_dependency(&d1.location(), "example.com/d1", None),
        git_dependency(&d2.location(), "example.com/d2", None)
    ))?;

    let cwd_before = std::env::current_dir()?;
    let mut env = Environment::load(project.project_path())?;
    fetcher().fetch_all(&mut env).await?;
    assert_eq!(std::env::current_dir()?, cwd_before);

    let src = project.source_path();
    assert_eq!(fs::read_to_string(src.join("example.com/d1/README"))?, "d1");
    assert_eq!(fs::read_to_string(src.join("example.com/d2/README"))?, "d2");
    assert_eq!(fs::read_to_string(src.join("example.com/d3/README"))?, "d3");
    assert!(!src.join("example.com/d2/.drove").exists());

    assert!(env.dependencies.iter().all(|dep| dep.reference == "master"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_reference_is_checked_out() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.create_source_repo("lib")?;
    repo.write_file("VERSION", "1")?;
    repo.commit_all("v1")?;
    repo.git.tag("v1.0.0")?;
    let tagged = repo.git.head()?;
    repo.write_file("VERSION", "2")?;
    repo.commit_all("v2")?;

    project.write_manifest(&git_dependency(&repo.location(), "lib", Some("v1.0.0")))?;
    let mut env = Environment::load(project.project_path())?;
    fetcher().fetch_all(&mut env).await?;

    let checkout = project.source_path().join("lib");
    assert_eq!(fs::read_to_string(checkout.join("VERSION"))?, "1");
    assert_eq!(crate::common::TestGit::new(&checkout).head()?, tagged);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_failed_checkout_aborts_and_keeps_cwd() -> Result<()> {
    let project = TestProject::new()?;
    let first = project.create_source_repo("first")?;
    first.write_file("README", "first")?;
    first.commit_all("first")?;
    let second = project.create_source_repo("second")?;
    second.write_file("README", "second")?;
    second.commit_all("second")?;

    project.write_manifest(&format!(
        "{}\n{}",
        git_dependency(&first.location(), "first", Some("no-such-ref")),
        git_dependency(&second.location(), "second", None)
    ))?;

    let cwd_before = std::env::current_dir()?;
    let mut env = Environment::load(project.project_path())?;
    let err = fetcher().fetch_all(&mut env).await.unwrap_err();
    assert_eq!(std::env::current_dir()?, cwd_before);

    match err.downcast_ref::<DroveError>() {
        Some(DroveError::ExternalToolFailure {
            command, ..
        }) => assert!(command.ends_with("checkout no-such-ref")),
        other => panic!("unexpected error: {other:?}"),
    }
    // The partial clone stays; the sibling was never attempted
    assert!(project.source_path().join("first").is_dir());
    assert!(!project.source_path().join("second").exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_rerun_clones_again() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.create_source_repo("lib")?;
    repo.write_file("README", "lib")?;
    repo.commit_all("lib")?;
    project.write_manifest(&git_dependency(&repo.location(), "lib", None))?;

    let fetcher = fetcher();
    let mut env = Environment::load(project.project_path())?;
    fetcher.fetch_all(&mut env).await?;

    // No skip-if-present: the second run clones into the existing copy
    let err = fetcher.fetch_all(&mut env).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DroveError>(),
        Some(DroveError::ExternalToolFailure { command, .. }) if command.contains(" clone ")
    ));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_legacy_manifest_in_dependency_is_followed() -> Result<()> {
    let project = TestProject::new()?;
    let leaf = project.create_source_repo("leaf")?;
    leaf.write_file("README", "leaf")?;
    leaf.commit_all("leaf")?;

    let middle = project.create_source_repo("middle")?;
    middle.write_file("Drovefile", &git_dependency(&leaf.location(), "leaf", None))?;
    middle.commit_all("middle")?;

    project.write_legacy_manifest(&git_dependency(&middle.location(), "middle", None))?;
    let mut env = Environment::load(project.project_path())?;
    fetcher().fetch_all(&mut env).await?;

    assert!(project.source_path().join("leaf/README").is_file());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
#[serial]
async fn test_absolute_location_without_path() -> Result<()> {
    let project = TestProject::new()?;
    let repo = project.create_source_repo("widget")?;
    repo.write_file("README", "widget")?;
    repo.commit_all("widget")?;

    project.write_manifest(&format!(
        "[[dependencies]]\ntype = \"git\"\nlocation = {}\n",
        crate::common::toml_string(&repo.location())
    ))?;
    let mut env = Environment::load(project.project_path())?;
    fetcher().fetch_all(&mut env).await?;

    let relative = repo.path.strip_prefix("/")?;
    let checkout = project.source_path().join(relative);
    assert_eq!(fs::read_to_string(checkout.join("README"))?, "widget");
    // The source repository itself was left alone
    assert!(!repo.path.join(".drove").exists());
    assert_eq!(crate::common::TestGit::new(&repo.path).head()?, crate::common::TestGit::new(&checkout).head()?);
    Ok(())
}
