// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Split per-antenna glyphs into fixed-size batches, so each legend stays
//! small enough to be usable.

use serde::Serialize;

use super::{GlyphKind, Panel};

/// One rendered glyph: an antenna's data or error series on one panel.
/// `antenna_rank` is the antenna's position in the selection, not its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub(crate) struct PlotHandle {
    pub(crate) antenna_rank: usize,
    pub(crate) panel: Panel,
    pub(crate) kind: GlyphKind,
}

/// All of the glyphs belonging to one antenna.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct LegendEntry {
    pub(crate) antenna: usize,
    pub(crate) label: String,
    pub(crate) handles: Vec<PlotHandle>,
}

impl LegendEntry {
    /// Make the handles for the antenna at `antenna_rank`. Every antenna has
    /// data and error glyphs on the upper panel and data on the lower panel;
    /// lower-panel errors only exist for some plots.
    pub(crate) fn new(antenna_rank: usize, antenna: usize, lower_errors: bool) -> LegendEntry {
        let mut handles = vec![
            PlotHandle {
                antenna_rank,
                panel: Panel::Upper,
                kind: GlyphKind::Data,
            },
            PlotHandle {
                antenna_rank,
                panel: Panel::Lower,
                kind: GlyphKind::Data,
            },
            PlotHandle {
                antenna_rank,
                panel: Panel::Upper,
                kind: GlyphKind::Error,
            },
        ];
        if lower_errors {
            handles.push(PlotHandle {
                antenna_rank,
                panel: Panel::Lower,
                kind: GlyphKind::Error,
            });
        }
        LegendEntry {
            antenna,
            label: format!("A{antenna}"),
            handles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct LegendBatch {
    pub(crate) index: usize,

    /// The checkbox label, e.g. "A0 - A15".
    pub(crate) label: String,

    pub(crate) entries: Vec<LegendEntry>,
}

impl LegendBatch {
    /// The antenna ranks covered by this batch.
    pub(crate) fn ranks(&self) -> std::ops::Range<usize> {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => {
                let first = first.handles[0].antenna_rank;
                let last = last.handles[0].antenna_rank;
                first..last + 1
            }
            _ => 0..0,
        }
    }
}

/// Partition `entries` (in antenna-selection order) into batches of at most
/// `batch_size`. Batch `i` holds ranks `[i * batch_size, (i + 1) * batch_size)`.
pub(crate) fn assign_batches(entries: Vec<LegendEntry>, batch_size: usize) -> Vec<LegendBatch> {
    assert!(batch_size > 0, "legend batches can't be empty");
    let mut batches = Vec::with_capacity((entries.len() + batch_size - 1) / batch_size);
    let mut entries = entries.into_iter().peekable();
    while entries.peek().is_some() {
        let batch_entries: Vec<LegendEntry> = entries.by_ref().take(batch_size).collect();
        let label = format!(
            "A{} - A{}",
            batch_entries[0].antenna,
            batch_entries[batch_entries.len() - 1].antenna
        );
        batches.push(LegendBatch {
            index: batches.len(),
            label,
            entries: batch_entries,
        });
    }
    batches
}
