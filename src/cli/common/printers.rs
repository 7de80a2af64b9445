// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::{borrow::Cow, sync::Mutex};

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Vec<Cow<'static, str>>>> = Mutex::new(vec![]);
}

/// Log a bold title followed by a tree of blocks, e.g.
///
/// ```text
/// Calibration table
/// ├ obs.G0 (G)
/// ├ 3 antennas
/// │ 0: Tile011
/// └ 2 fields
/// ```
fn log_tree<S: AsRef<str>>(level: Level, title: &str, blocks: &[Vec<S>]) {
    log::log!(level, "{}", console::style(title).bold());
    let num_blocks = blocks.len();
    for (i_block, block) in blocks.iter().enumerate() {
        let num_lines = block.len();
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                (0, true, true) => UP_AND_RIGHT,
                (0, _, _) => VERTICAL_AND_RIGHT,
                _ => VERTICAL,
            };
            log::log!(level, "{symbol} {}", line.as_ref());
        }
    }
    log::log!(level, "");
}

pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log_tree(Level::Info, &self.title, &self.blocks[..]);
    }
}

/// Things that can be queued up as a warning and shown later with
/// [`display_warnings`].
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Vec<Cow<'static, str>>) {
    // A poisoned lock only means another thread panicked while pushing; the
    // warnings themselves are still fine.
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    warnings.push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed. This should only be called once all arguments have been parsed
/// into parameters.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    if warnings.is_empty() {
        return;
    }
    log_tree(Level::Warn, "Warnings", &warnings[..]);
    warnings.clear();
}

/// Take the queued warnings without displaying them.
#[cfg(test)]
pub(crate) fn drain_warnings() -> Vec<Vec<Cow<'static, str>>> {
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    std::mem::take(&mut *warnings)
}
