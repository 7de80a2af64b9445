// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding calibration tables with glob patterns.
//!
//! Calibration tables are directories, and their names usually start with a
//! long observation ID, so a pattern like "*.G0" is a common way of naming one.

use std::path::PathBuf;

use glob::glob;
use itertools::Itertools;
use log::trace;
use thiserror::Error;

/// Every directory matching the pattern. Plain files can't be tables, so
/// they're skipped.
fn get_table_matches(pattern: &str) -> Result<Vec<PathBuf>, GlobError> {
    let mut tables = vec![];
    for entry in glob(pattern)? {
        let path = entry?;
        if path.is_dir() {
            tables.push(path);
        } else {
            trace!("Ignoring {}; it isn't a directory", path.display());
        }
    }
    Ok(tables)
}

/// Resolve a pattern to exactly one calibration table. No match, or more than
/// one, is an error.
pub(crate) fn get_single_match_from_glob(pattern: &str) -> Result<PathBuf, GlobError> {
    let mut tables = get_table_matches(pattern)?;
    match tables.len() {
        0 => Err(GlobError::NoMatches {
            pattern: pattern.to_string(),
        }),
        1 => Ok(tables.remove(0)),
        _ => Err(GlobError::MoreThanOneMatch {
            pattern: pattern.to_string(),
            matches: tables.iter().map(|t| t.display()).join(", "),
        }),
    }
}

#[derive(Error, Debug)]
pub(crate) enum GlobError {
    #[error("No calibration table matches '{pattern}'")]
    NoMatches { pattern: String },

    #[error("More than one calibration table matches '{pattern}' ({matches}); the pattern must match exactly one")]
    MoreThanOneMatch { pattern: String, matches: String },

    #[error(transparent)]
    GlobCrate(#[from] glob::GlobError),

    #[error(transparent)]
    PatternError(#[from] glob::PatternError),
}
