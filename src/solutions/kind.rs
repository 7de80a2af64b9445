// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Working out what kind of calibration table we've been handed.

use std::path::Path;

use itertools::Itertools;
use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{DisplayMode, SolutionsError};

lazy_static::lazy_static! {
    pub(crate) static ref CAL_TABLE_KINDS: String = TableKind::iter().join(", ");

    /// Tables are named like "obs.G0", "obs.B", "obs.k12".
    static ref TABLE_KIND_REGEX: Regex = Regex::new(r"(?i)\.(G|K|B)\d*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub(crate) enum TableKind {
    /// Complex gains, one solution per time.
    #[strum(serialize = "G")]
    Gain,

    /// Complex bandpass, one solution per channel.
    #[strum(serialize = "B")]
    Bandpass,

    /// Real-valued delays.
    #[strum(serialize = "K")]
    Delay,
}

impl TableKind {
    /// Classify a table from its name. Only the last path component is
    /// considered, and any trailing path separators are ignored. Version digits
    /// after the kind letter don't matter. `None` is returned if the name
    /// doesn't match any known kind.
    pub(crate) fn from_table_name(name: &str) -> Option<TableKind> {
        let trimmed = name.trim_end_matches(['/', '\\']);
        let base = Path::new(trimmed)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(trimmed);
        let caps = TABLE_KIND_REGEX.captures(base)?;
        match caps[1].to_uppercase().as_str() {
            "G" => Some(TableKind::Gain),
            "B" => Some(TableKind::Bandpass),
            "K" => Some(TableKind::Delay),
            _ => None,
        }
    }

    /// Can this kind of table be plotted in this display mode?
    pub(crate) fn check_mode(self, mode: DisplayMode) -> Result<(), SolutionsError> {
        match (self, mode) {
            (TableKind::Delay, DisplayMode::RealImaginary) => {
                Err(SolutionsError::DelayNotComplex(mode))
            }
            _ => Ok(()),
        }
    }

    /// The name of the column holding this kind's solutions.
    pub(crate) fn param_column(self) -> &'static str {
        match self {
            TableKind::Gain | TableKind::Bandpass => "CPARAM",
            TableKind::Delay => "FPARAM",
        }
    }

    pub(crate) fn x_label(self) -> &'static str {
        match self {
            TableKind::Gain => "Time [s]",
            TableKind::Bandpass => "Channel",
            TableKind::Delay => "Antenna",
        }
    }

    /// Labels for the upper and lower panels' y axes.
    pub(crate) fn y_labels(self, mode: DisplayMode, corr: usize) -> (String, String) {
        match (self, mode) {
            (TableKind::Delay, _) => (
                format!("Delay [ns] (corr. {corr})"),
                format!("Delay [ns] (corr. {})", 1 - corr.min(1)),
            ),
            (_, DisplayMode::AmplitudePhase) => ("Amplitude".into(), "Phase [Deg]".into()),
            (_, DisplayMode::RealImaginary) => ("Real".into(), "Imaginary".into()),
        }
    }
}
