// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Interactive diagnostic plots of radio-interferometer calibration tables.
 */

mod cli;
mod constants;
mod io;
mod params;
mod plot;
mod solutions;

// Re-exports.
pub use cli::{Calplot, CalplotError};
