// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from reading a calibration table.

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum CalTableReadError {
    #[error("Antenna {antenna} is not in the calibration table")]
    UnknownAntenna { antenna: usize },

    #[error(transparent)]
    Casa(#[from] super::casa::CasaReadError),
}
