// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared between `calplot` subcommands: argument files, resolving the
//! calibration table from user input, and the pretty printers.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
#[cfg(test)]
pub(crate) use printers::drain_warnings;
pub(crate) use printers::{display_warnings, Warn};

use std::path::PathBuf;

use itertools::Itertools;
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::CalplotError;
use crate::{
    io::get_single_match_from_glob,
    solutions::{SolutionsError, TableKind, CAL_TABLE_KINDS},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref TABLE_HELP: String =
        format!("The calibration table. Its name must end with the kind of table ({}), optionally followed by a version number, e.g. 'obs.G0'. If the path doesn't exist, it is treated as a glob pattern that must match exactly one table", *CAL_TABLE_KINDS);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(CalplotError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(CalplotError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(CalplotError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Work out what kind of table the user gave us from its name alone, so that
/// a bad name (or a kind that can't be plotted as requested) is rejected
/// before the filesystem is touched.
pub(super) fn classify_table(table: &str) -> Result<TableKind, SolutionsError> {
    TableKind::from_table_name(table)
        .ok_or_else(|| SolutionsError::UnrecognisedTable(table.to_string()))
}

/// Find the table on disk. A path that doesn't exist is tried as a glob
/// pattern, which must match exactly one table directory.
pub(super) fn locate_table(table: &str) -> Result<PathBuf, CalplotError> {
    let pb = PathBuf::from(table);
    if pb.exists() {
        Ok(pb)
    } else {
        debug!("'{table}' doesn't exist; trying it as a glob");
        Ok(get_single_match_from_glob(table)?)
    }
}
