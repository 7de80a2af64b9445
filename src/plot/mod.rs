// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything needed to turn derived solution series into plots: axis
//! extents, legend batches, the interactive visibility state, colours, and the
//! renderers that consume all of these.

mod colour;
mod error;
mod extent;
pub(crate) mod html;
mod image;
mod legend;
mod visibility;

pub(crate) use colour::{ColourMap, COLOUR_MAPS};
pub(crate) use error::{AxisExtentError, DrawError};
pub(crate) use extent::{AxisOverrides, AxisRangeAggregator, PlotRanges};
pub(crate) use image::{remove_written, write_images, ImageFormat, IMAGE_FORMATS};
#[cfg(test)]
pub(crate) use image::image_path;
pub(crate) use legend::{assign_batches, LegendBatch, LegendEntry, PlotHandle};
pub(crate) use visibility::{
    LegendMode, VisibilityEvent, VisibilityStateMachine, VisibilityView, LEGEND_MODES,
};

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// The two stacked plots. The upper panel shows amplitudes (or real parts, or
/// the selected delay correlation), the lower panel phases (or imaginary
/// parts, or the other delay correlation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Panel {
    #[strum(serialize = "upper")]
    Upper,
    #[strum(serialize = "lower")]
    Lower,
}

impl Panel {
    pub(crate) fn index(self) -> usize {
        match self {
            Panel::Upper => 0,
            Panel::Lower => 1,
        }
    }
}

/// What a glyph draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum GlyphKind {
    Data,
    Error,
}

/// Everything a renderer needs about one antenna: its plotted series, how to
/// label it and what colour it gets.
#[derive(Debug, Clone)]
pub(crate) struct AntennaPlot {
    /// The antenna number.
    pub(crate) antenna: usize,

    /// The antenna's name, if known.
    pub(crate) name: Option<String>,

    pub(crate) colour: (u8, u8, u8),

    pub(crate) series: crate::solutions::DerivedSeries,
}

impl AntennaPlot {
    /// The legend label for this antenna's data glyphs.
    pub(crate) fn data_label(&self) -> String {
        format!("A{}", self.antenna)
    }

    /// The legend label for this antenna's error glyphs.
    pub(crate) fn error_label(&self) -> String {
        format!("E{}", self.antenna)
    }
}

/// Text shared by the renderers.
#[derive(Debug, Clone)]
pub(crate) struct PlotLabels {
    /// The title of the whole page.
    pub(crate) title: String,
    pub(crate) x: String,
    pub(crate) upper_y: String,
    pub(crate) lower_y: String,
}

impl PlotLabels {
    pub(crate) fn y(&self, panel: Panel) -> &str {
        match panel {
            Panel::Upper => &self.upper_y,
            Panel::Lower => &self.lower_y,
        }
    }

    /// e.g. "Amplitude vs Time [s]".
    pub(crate) fn panel_title(&self, panel: Panel) -> String {
        format!("{} vs {}", self.y(panel), self.x)
    }
}
