// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The state behind the interactive plot controls.
//!
//! Four controls drive what is drawn: a "select all antennas" toggle, one
//! checkbox per legend batch, an error-bar toggle and a legend-mode selector.
//! Each glyph has a bit: data glyphs follow their antenna's bit (set by the
//! select-all toggle and the batch checkboxes), error glyphs have their own
//! bit (set by the error-bar toggle). An error glyph is only drawn when both
//! its own bit and its antenna's bit are set, so hiding an antenna leaves its
//! error bit dormant rather than clearing it. The legend mode only decides
//! which legends are rendered, never which glyphs.
//!
//! The select-all toggle has no state of its own; it is always derived from
//! the batch checkboxes.
//!
//! The same transitions are replayed in the browser by the HTML page's
//! script, starting from a serialised [`VisibilityView`].

use std::ops::Range;

use itertools::Itertools;
use log::trace;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{GlyphKind, LegendBatch, Panel, PlotHandle};

lazy_static::lazy_static! {
    pub(crate) static ref LEGEND_MODES: String = LegendMode::iter().join(", ");
}

/// Which legends are rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub(crate) enum LegendMode {
    /// Antenna and error legends.
    #[strum(serialize = "all")]
    #[serde(rename = "all")]
    All,

    /// Antenna legends only.
    #[strum(serialize = "alo")]
    #[serde(rename = "alo")]
    AntennasOnly,

    /// Error legends only.
    #[strum(serialize = "elo")]
    #[serde(rename = "elo")]
    ErrorsOnly,

    /// No legends.
    #[strum(serialize = "non")]
    #[serde(rename = "non")]
    None,
}

impl Default for LegendMode {
    fn default() -> Self {
        LegendMode::AntennasOnly
    }
}

impl LegendMode {
    /// The text shown for this mode in the selector.
    pub(crate) fn description(self) -> &'static str {
        match self {
            LegendMode::All => "All",
            LegendMode::AntennasOnly => "Antennas",
            LegendMode::ErrorsOnly => "Errors",
            LegendMode::None => "None",
        }
    }

    /// Are legends for glyphs of this kind shown in this mode?
    pub(crate) fn shows(self, kind: GlyphKind) -> bool {
        matches!(
            (self, kind),
            (LegendMode::All, _)
                | (LegendMode::AntennasOnly, GlyphKind::Data)
                | (LegendMode::ErrorsOnly, GlyphKind::Error)
        )
    }
}

/// A user action on one of the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VisibilityEvent {
    /// The "select all antennas" toggle was set to this value.
    SelectAll(bool),

    /// A batch checkbox was (un)ticked.
    Batch { index: usize, active: bool },

    /// The error-bar toggle was set to this value.
    ErrorBars(bool),

    /// A legend mode was picked.
    LegendMode(LegendMode),
}

/// A snapshot of everything the controls and glyphs display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct VisibilityView {
    pub(crate) batch_active: Vec<bool>,
    pub(crate) select_all: bool,
    pub(crate) select_all_label: &'static str,
    pub(crate) errors_shown: bool,
    pub(crate) errors_label: &'static str,
    pub(crate) legend_mode: LegendMode,

    /// The antenna bit for each antenna rank.
    pub(crate) antennas: Vec<bool>,

    /// The error bits for each antenna rank, upper panel then lower panel.
    /// The lower panel's bits are empty if it has no error glyphs.
    pub(crate) errors: [Vec<bool>; 2],
}

#[derive(Debug, Clone)]
pub(crate) struct VisibilityStateMachine {
    /// The antenna ranks covered by each batch.
    batches: Vec<Range<usize>>,

    batch_active: Vec<bool>,

    antennas: Vec<bool>,

    errors: [Vec<bool>; 2],

    errors_shown: bool,

    legend_mode: LegendMode,
}

impl VisibilityStateMachine {
    /// The initial state: only the first batch's antennas are shown, error
    /// bars are hidden and only antenna legends are rendered.
    pub(crate) fn new(batches: &[LegendBatch], lower_errors: bool) -> VisibilityStateMachine {
        let batches = batches.iter().map(|b| b.ranks()).collect::<Vec<_>>();
        let num_antennas = batches.last().map(|r| r.end).unwrap_or(0);
        let mut sm = VisibilityStateMachine {
            batch_active: vec![false; batches.len()],
            batches,
            antennas: vec![false; num_antennas],
            errors: [
                vec![false; num_antennas],
                if lower_errors {
                    vec![false; num_antennas]
                } else {
                    vec![]
                },
            ],
            errors_shown: false,
            legend_mode: LegendMode::default(),
        };
        if !sm.batches.is_empty() {
            sm.apply(VisibilityEvent::Batch {
                index: 0,
                active: true,
            });
        }
        sm
    }

    /// Handle a user action. Batch indices must be valid.
    pub(crate) fn apply(&mut self, event: VisibilityEvent) {
        trace!("Visibility event: {event:?}");
        match event {
            VisibilityEvent::SelectAll(value) => {
                self.antennas.iter_mut().for_each(|a| *a = value);
                self.batch_active.iter_mut().for_each(|b| *b = value);
            }

            VisibilityEvent::Batch { index, active } => {
                let ranks = self.batches[index].clone();
                self.antennas[ranks].iter_mut().for_each(|a| *a = active);
                self.batch_active[index] = active;
            }

            VisibilityEvent::ErrorBars(value) => {
                self.errors_shown = value;
                for panel_errors in self.errors.iter_mut() {
                    panel_errors.iter_mut().for_each(|e| *e = value);
                }
            }

            VisibilityEvent::LegendMode(mode) => self.legend_mode = mode,
        }
    }

    /// Is every batch active? An empty plot has nothing left to select.
    pub(crate) fn select_all(&self) -> bool {
        self.batch_active.iter().all(|&b| b)
    }

    pub(crate) fn select_all_label(&self) -> &'static str {
        if self.select_all() {
            "Deselect all Antennas"
        } else {
            "Select all Antennas"
        }
    }

    pub(crate) fn errors_label(&self) -> &'static str {
        if self.errors_shown {
            "Hide All Error bars"
        } else {
            "Show All Error bars"
        }
    }

    pub(crate) fn batch_active(&self, index: usize) -> bool {
        self.batch_active[index]
    }

    pub(crate) fn legend_mode(&self) -> LegendMode {
        self.legend_mode
    }

    /// The raw bit of a glyph. For error glyphs this ignores the antenna bit.
    pub(crate) fn bit(&self, handle: PlotHandle) -> bool {
        match handle.kind {
            GlyphKind::Data => self.antennas[handle.antenna_rank],
            GlyphKind::Error => self.errors[handle.panel.index()]
                .get(handle.antenna_rank)
                .copied()
                .unwrap_or(false),
        }
    }

    /// Is this glyph drawn?
    pub(crate) fn is_drawn(&self, handle: PlotHandle) -> bool {
        match handle.kind {
            GlyphKind::Data => self.bit(handle),
            GlyphKind::Error => {
                self.bit(handle)
                    && self.bit(PlotHandle {
                        kind: GlyphKind::Data,
                        ..handle
                    })
            }
        }
    }

    /// Is the legend for glyphs of this kind rendered on this panel?
    pub(crate) fn legend_shown(&self, panel: Panel, kind: GlyphKind) -> bool {
        let has_glyphs = match kind {
            GlyphKind::Data => true,
            GlyphKind::Error => !self.errors[panel.index()].is_empty(),
        };
        has_glyphs && self.legend_mode.shows(kind)
    }

    pub(crate) fn view(&self) -> VisibilityView {
        VisibilityView {
            batch_active: self.batch_active.clone(),
            select_all: self.select_all(),
            select_all_label: self.select_all_label(),
            errors_shown: self.errors_shown,
            errors_label: self.errors_label(),
            legend_mode: self.legend_mode,
            antennas: self.antennas.clone(),
            errors: self.errors.clone(),
        }
    }
}
