// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

use std::{process::Output, str::from_utf8};

use assert_cmd::{output::OutputError, Command};
use tempfile::TempDir;

fn calplot() -> Command {
    Command::cargo_bin("calplot").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// The names of everything in a directory.
fn dir_contents(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_help() {
    let (stdout, _) = get_cmd_output(calplot().arg("--help").ok());
    assert!(stdout.contains("plot"), "{stdout}");
    assert!(stdout.contains("table-info"), "{stdout}");

    let (stdout, _) = get_cmd_output(calplot().args(["plot", "--help"]).ok());
    for flag in [
        "--field",
        "--doplot",
        "--corr",
        "--ant",
        "--t0",
        "--yl1",
        "--cmap",
        "--ms",
        "--plotname",
        "--output-directory",
        "--image-format",
    ] {
        assert!(stdout.contains(flag), "{flag} missing from:\n{stdout}");
    }
}

#[test]
fn test_no_subcommand_is_an_error() {
    calplot().assert().failure();
}

#[test]
fn test_real_imag_delays_fail_without_output() {
    let tmp = TempDir::new().unwrap();
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "x.K0", "-d", "ri"])
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("only 'ap' is supported"), "{stderr}");
    // The table doesn't exist; failing on the display mode means it was never
    // looked for. Nothing may be written.
    assert!(!stderr.contains("No calibration table"), "{stderr}");
    assert!(dir_contents(&tmp).is_empty());
}

#[test]
fn test_unrecognised_table_kind() {
    let tmp = TempDir::new().unwrap();
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "obs.ms"])
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("Couldn't determine the kind"), "{stderr}");
    assert!(dir_contents(&tmp).is_empty());
}

#[test]
fn test_missing_table() {
    let tmp = TempDir::new().unwrap();
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "obs.G0"])
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("No calibration table matches"), "{stderr}");

    let result = calplot()
        .current_dir(tmp.path())
        .args(["table-info", "obs.B0"])
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("No calibration table matches"), "{stderr}");
}

#[test]
fn test_bad_display_mode_even_on_a_dry_run() {
    let tmp = TempDir::new().unwrap();
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "obs.G0", "--doplot", "amp", "--dry-run"])
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("'amp' is not recognised"), "{stderr}");
}

#[test]
fn test_saved_arguments_reproduce_the_run() {
    let tmp = TempDir::new().unwrap();
    let toml = tmp.path().join("args.toml");
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "x.K0", "-d", "ri", "--save-toml"])
        .arg(&toml)
        .ok();
    assert!(result.is_err());

    // Arguments are saved before they're checked.
    let contents = std::fs::read_to_string(&toml).unwrap();
    assert!(contents.contains("table = \"x.K0\""), "{contents}");
    assert!(contents.contains("doplot = \"ri\""), "{contents}");

    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "--args-file"])
        .arg(&toml)
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("only 'ap' is supported"), "{stderr}");

    // Command-line arguments beat the file.
    let result = calplot()
        .current_dir(tmp.path())
        .args(["plot", "-d", "ap", "--args-file"])
        .arg(&toml)
        .ok();
    assert!(result.is_err());
    let (_, stderr) = get_cmd_output(result);
    assert!(stderr.contains("No calibration table matches"), "{stderr}");
}
