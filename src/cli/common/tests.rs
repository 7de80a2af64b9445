// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against command-line interfaces that aren't big enough to go in their
//! own modules.

use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn test_classify_table_names() {
    assert_eq!(classify_table("obs.G0").unwrap(), TableKind::Gain);
    assert_eq!(
        classify_table("/data/1234/obs.b12/").unwrap(),
        TableKind::Bandpass
    );
    assert_eq!(classify_table("obs*.K").unwrap(), TableKind::Delay);

    match classify_table("obs.ms") {
        Err(SolutionsError::UnrecognisedTable(t)) => assert_eq!(t, "obs.ms"),
        _ => panic!("expected UnrecognisedTable"),
    }
}

#[test]
fn test_locate_table() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("1065880128.G0");
    // Calibration tables are directories.
    fs::create_dir(&table).unwrap();

    let s = table.display().to_string();
    assert_eq!(locate_table(&s).unwrap(), table);

    let pattern = format!("{}/10658*.G0", tmp.path().display());
    assert_eq!(locate_table(&pattern).unwrap(), table);

    fs::create_dir(tmp.path().join("1065880129.G0")).unwrap();
    let result = locate_table(&pattern);
    assert!(matches!(
        result,
        Err(CalplotError::Generic(s)) if s.contains("More than one calibration table matches")
    ));

    let missing = tmp.path().join("nothing.B0");
    let result = locate_table(&missing.display().to_string());
    assert!(matches!(
        result,
        Err(CalplotError::Generic(s)) if s.contains("No calibration table matches")
    ));
}

#[test]
fn test_arg_file_types() {
    assert_eq!(ARG_FILE_TYPES_COMMA_SEPARATED.as_str(), "toml, json");
    assert!(ARG_FILE_HELP.contains("toml, json"));
    assert!(TABLE_HELP.contains("G, B, K"));
}

#[test]
fn test_info_printer_accepts_blocks() {
    let mut printer = InfoPrinter::new("Calibration table obs.G0".into());
    printer.push_line("Kind: G".into());
    printer.push_block(vec!["Rows: 10".into(), format!("Fields: {}", 2).into()]);
    printer.display();
}
