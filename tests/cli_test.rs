//! Integration tests for the netver binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn netver() -> Command {
    let mut cmd = Command::new(cargo_bin("netver"));
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("identify .NET runtimes"))
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("resolve"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_a_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    netver().assert().failure();
    Ok(())
}

#[test]
fn resolve_core_2_1() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args([
            "resolve",
            "--description",
            ".NET Core 4.6.26919.02",
            "--environment-version",
            "4.0.30319.42000",
            "--build-id",
            "4.6.26919.02",
            "--informational-version",
            "4.6.26919.02 @Commit: abc",
        ])
        .assert()
        .success()
        .stdout(".NET Core 2.1.5\n");
    Ok(())
}

#[test]
fn resolve_mono_as_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = netver()
        .args([
            "resolve",
            "--description",
            "Mono 6.12.0.122 (tarball Mon Feb 22 17:33:28 UTC 2021)",
            "--json",
        ])
        .output()?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["family"], "alternative_implementation");
    assert_eq!(json["version"], "6.12.0.122");
    Ok(())
}

#[test]
fn resolve_framework_release_code() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args(["resolve", "--legacy-release", "528049"])
        .assert()
        .success()
        .stdout(".NET Framework 4.8\n");
    Ok(())
}

#[test]
fn resolve_unified_runtime() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args(["resolve", "--description", ".NET 7.0.1", "--environment-version", "7.0.1"])
        .assert()
        .success()
        .stdout(".NET 7.0.1\n");
    Ok(())
}

#[test]
fn resolve_from_signals_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("signals.json");
    fs::write(
        &path,
        r#"{
            "framework_description": ".NET Core 4.6.26328.01",
            "corelib_file_version": "4.6.26328.01",
            "corelib_informational_version": "4.6.26328.01 @SrcCode: b8c69ed222a1e6e5392783cbb4df5faa87be349e"
        }"#,
    )?;

    netver()
        .args(["resolve", "--signals"])
        .arg(&path)
        .assert()
        .success()
        .stdout(".NET Core 2.0.7\n");
    Ok(())
}

#[test]
fn resolve_unknown_build_fails() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args([
            "resolve",
            "--description",
            ".NET Core 4.6.99999.0",
            "--build-id",
            "4.6.99999.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("4.6.99999.0"));
    Ok(())
}

#[test]
fn resolve_native_is_unsupported() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args(["resolve", "--description", ".NET Native 2.2.0"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn catalog_lists_builds() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("4.6.26919.2"))
        .stdout(predicate::str::contains("2.1.5"));
    Ok(())
}

#[test]
fn catalog_json_round_trips_into_resolve() -> Result<(), Box<dyn std::error::Error>> {
    let output = netver().args(["catalog", "--json"]).output()?;
    assert!(output.status.success());

    let temp = TempDir::new()?;
    let path = temp.path().join("catalog.json");
    fs::write(&path, &output.stdout)?;

    netver()
        .args(["resolve", "--description", ".NET Core 4.6.26919.02", "--build-id", "4.6.26919.02", "--catalog"])
        .arg(&path)
        .assert()
        .success()
        .stdout(".NET Core 2.1.5\n");
    Ok(())
}

#[test]
fn catalog_schema_describes_records() -> Result<(), Box<dyn std::error::Error>> {
    let output = netver().args(["catalog", "--schema"]).output()?;
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(schema.to_string().contains("records"));
    Ok(())
}

#[test]
fn catalog_rejects_invalid_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("catalog.json");
    fs::write(&path, r#"{"records": [{"build": "4.6.1.0"}]}"#)?;

    netver()
        .args(["catalog", "--catalog"])
        .arg(&path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    netver()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("netver"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn detect_runs_probe_and_resolves() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let probe = temp.path().join("probe.sh");
    fs::write(
        &probe,
        "echo 4.6.26919.02\necho '4.6.26919.02 @Commit: abc'\necho '.NET Core 4.6.26919.02'\n",
    )?;

    netver()
        .args(["--quiet", "detect", "--dotnet", "/bin/sh", "--probe"])
        .arg(&probe)
        .assert()
        .success()
        .stdout(".NET Core 2.1.5\n");
    Ok(())
}

#[test]
fn scrape_offline_with_nothing_extracted_prints_empty_catalog(
) -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let output = netver()
        .args(["--quiet", "scrape", "--offline", "--rid", "linux-x64", "--dotnets-path"])
        .arg(temp.path())
        .output()?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["records"], serde_json::json!([]));
    Ok(())
}

#[test]
fn scrape_writes_output_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let out = temp.path().join("out/catalog.json");

    netver()
        .env("NETVER_DOTNETS_PATH", temp.path())
        .args(["scrape", "--offline", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("No runtime builds were found"))
        .stderr(predicate::str::contains("Wrote 0 builds"));

    assert!(fs::read_to_string(&out)?.contains("records"));
    Ok(())
}
