// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Static images of each panel. Unlike the interactive page, every selected
//! antenna is drawn.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{AntennaPlot, DrawError, PlotLabels, PlotRanges};

lazy_static::lazy_static! {
    pub(crate) static ref IMAGE_FORMATS: String = ImageFormat::iter().join(", ");
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub(crate) enum ImageFormat {
    Png,
    Svg,
}

/// The image file for a panel, e.g. "plot_obs.G0_corr0_ap_field0_upper.png".
pub(crate) fn image_path(base: &Path, panel: super::Panel, format: ImageFormat) -> PathBuf {
    let mut name = base
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!("_{panel}.{format}"));
    base.with_file_name(name)
}

/// Remove files written before a later failure. Failing to remove one is only
/// worth a warning; the original error is what gets reported.
pub(crate) fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        debug!("Removing {}", path.display());
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Couldn't remove {}: {e}", path.display());
        }
    }
}

#[cfg(not(feature = "plotting"))]
pub(crate) fn write_images(
    _base: &Path,
    _format: ImageFormat,
    _antennas: &[AntennaPlot],
    _ranges: &PlotRanges,
    _labels: &PlotLabels,
) -> Result<Vec<PathBuf>, DrawError> {
    // Plotting is an optional feature, because its C dependencies (e.g.
    // fontconfig) can't always be satisfied.
    Err(DrawError::NoPlottingFeature)
}

#[cfg(feature = "plotting")]
pub(crate) use plotting::write_images;

#[cfg(feature = "plotting")]
mod plotting {
    use std::path::{Path, PathBuf};

    use plotters::{coord::Shift, prelude::*};
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        constants::{PANEL_HEIGHT, PANEL_WIDTH},
        plot::Panel,
    };

    /// Write one image per panel next to `base`, returning the paths written.
    /// If any panel fails, the images already written are removed.
    pub(crate) fn write_images(
        base: &Path,
        format: ImageFormat,
        antennas: &[AntennaPlot],
        ranges: &PlotRanges,
        labels: &PlotLabels,
    ) -> Result<Vec<PathBuf>, DrawError> {
        let mut written = vec![];
        for panel in Panel::iter() {
            let path = image_path(base, panel, format);
            debug!("Drawing the {panel} panel to {}", path.display());
            let result = draw_image(&path, format, panel, antennas, ranges, labels);
            if let Err(e) = result {
                // A backend may have flushed a partial image when it dropped.
                if path.is_file() {
                    written.push(path);
                }
                super::remove_written(&written);
                return Err(e);
            }
            written.push(path);
        }
        Ok(written)
    }

    fn draw_image(
        path: &Path,
        format: ImageFormat,
        panel: Panel,
        antennas: &[AntennaPlot],
        ranges: &PlotRanges,
        labels: &PlotLabels,
    ) -> Result<(), DrawError> {
        match format {
            ImageFormat::Png => {
                let root =
                    BitMapBackend::new(path, (PANEL_WIDTH, PANEL_HEIGHT)).into_drawing_area();
                draw_panel(&root, panel, antennas, ranges, labels)
            }
            ImageFormat::Svg => {
                let root =
                    SVGBackend::new(path, (PANEL_WIDTH, PANEL_HEIGHT)).into_drawing_area();
                draw_panel(&root, panel, antennas, ranges, labels)
            }
        }
    }

    fn draw_panel<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        panel: Panel,
        antennas: &[AntennaPlot],
        ranges: &PlotRanges,
        labels: &PlotLabels,
    ) -> Result<(), DrawError>
    where
        DB::ErrorType: 'static,
    {
        let panel_err = |e: String| DrawError::Panel {
            panel,
            message: e,
        };

        root.fill(&WHITE)
            .map_err(|e| DrawError::Plotters(Box::new(e)))?;

        let y_range = ranges.y(panel);
        let mut cc = ChartBuilder::on(root)
            .caption(labels.panel_title(panel), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(ranges.x.min..ranges.x.max, y_range.min..y_range.max)
            .map_err(|e| panel_err(e.to_string()))?;

        cc.configure_mesh()
            .light_line_style(WHITE)
            .x_desc(&labels.x)
            .y_desc(labels.y(panel))
            .draw()
            .map_err(|e| panel_err(e.to_string()))?;

        for antenna in antennas {
            let ys = match panel {
                Panel::Upper => &antenna.series.y1,
                Panel::Lower => &antenna.series.y2,
            };
            let (r, g, b) = antenna.colour;
            let colour = RGBColor(r, g, b);
            let label = match antenna.name.as_deref() {
                Some(name) => format!("{}: {name}", antenna.data_label()),
                None => antenna.data_label(),
            };
            cc.draw_series(PointSeries::of_element(
                antenna
                    .series
                    .x
                    .iter()
                    .zip(ys.iter())
                    .map(|(&x, &y)| (x, y)),
                3,
                ShapeStyle::from(&colour).filled(),
                &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
            ))
            .map_err(|e| panel_err(e.to_string()))?
            .label(label)
            .legend(move |(x, y)| Circle::new((x, y), 3, colour.filled()));
        }

        if !antennas.is_empty() {
            cc.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| panel_err(e.to_string()))?;
        }

        root.present()
            .map_err(|e| DrawError::Plotters(Box::new(e)))?;
        Ok(())
    }
}
