// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};
use rayon::prelude::*;
use vec1::Vec1;

use crate::{
    constants::LEGEND_BATCH_SIZE,
    io::read::{CalTableRead, CalTableReadError},
    plot::{
        assign_batches, html, remove_written, write_images, AntennaPlot, AxisExtentError,
        AxisOverrides, AxisRangeAggregator, ColourMap, DrawError, ImageFormat, LegendBatch,
        LegendEntry, LegendMode, PlotLabels, PlotRanges, VisibilityEvent,
        VisibilityStateMachine,
    },
    solutions::{transform, DisplayMode, SolutionsError, TableKind},
};

pub(crate) struct PlotParams {
    pub(crate) cal_table: Box<dyn CalTableRead>,
    pub(crate) kind: TableKind,
    pub(crate) mode: DisplayMode,
    pub(crate) field: usize,
    pub(crate) corr: usize,

    /// The antennas to plot, in the order they should be plotted.
    pub(crate) antennas: Vec1<usize>,

    /// Antenna names indexed by antenna number.
    pub(crate) antenna_names: Option<Vec1<String>>,

    pub(crate) overrides: AxisOverrides,
    pub(crate) colour_map: ColourMap,

    /// The page's initial legend mode.
    pub(crate) legend_mode: LegendMode,

    /// Start with every antenna shown, rather than only the first batch.
    pub(crate) show_all: bool,

    /// Start with error bars shown.
    pub(crate) show_errors: bool,

    /// Where the HTML page is written.
    pub(crate) html_output: PathBuf,

    /// If set, also write a static image of each panel in this format.
    pub(crate) image_format: Option<ImageFormat>,
}

/// Everything about a plot except the rendered output.
pub(crate) struct PreparedPlot {
    pub(crate) antennas: Vec<AntennaPlot>,
    pub(crate) ranges: PlotRanges,
    pub(crate) batches: Vec<LegendBatch>,
    pub(crate) visibility: VisibilityStateMachine,
    pub(crate) labels: PlotLabels,
}

#[derive(Debug)]
pub(crate) struct PlotOutputs {
    pub(crate) html: PathBuf,
    pub(crate) images: Vec<PathBuf>,
}

impl PlotParams {
    pub(crate) fn run(&self) -> Result<PlotOutputs, PlotError> {
        let prepared = self.prepare()?;

        // Nothing is written until the page has been rendered.
        let page = html::PlotPage {
            labels: &prepared.labels,
            antennas: &prepared.antennas,
            batches: &prepared.batches,
            ranges: &prepared.ranges,
            visibility: &prepared.visibility,
        };
        let html = html::render(&page)?;

        let created_dir = create_output_dir(&self.html_output)?;
        let result = self.write_outputs(&html, &prepared);
        if result.is_err() {
            if let Some(dir) = created_dir {
                debug!("Removing {}", dir.display());
                if let Err(e) = std::fs::remove_dir_all(&dir) {
                    warn!("Couldn't remove {}: {e}", dir.display());
                }
            }
        }
        result
    }

    /// Images are drawn before the page is written, and removed again if the
    /// page can't be, so a failure leaves nothing behind.
    fn write_outputs(
        &self,
        html: &str,
        prepared: &PreparedPlot,
    ) -> Result<PlotOutputs, PlotError> {
        let images = match self.image_format {
            Some(format) => {
                let base = self.html_output.with_extension("");
                write_images(
                    &base,
                    format,
                    &prepared.antennas,
                    &prepared.ranges,
                    &prepared.labels,
                )?
            }
            None => vec![],
        };

        debug!(
            "Writing {} bytes of HTML to {}",
            html.len(),
            self.html_output.display()
        );
        if let Err(e) = std::fs::write(&self.html_output, html) {
            remove_written(&images);
            return Err(DrawError::from(e).into());
        }

        info!("Wrote {}", self.html_output.display());
        for image in &images {
            info!("Wrote {}", image.display());
        }
        Ok(PlotOutputs {
            html: self.html_output.clone(),
            images,
        })
    }

    /// Read, transform and lay out the solutions.
    pub(crate) fn prepare(&self) -> Result<PreparedPlot, PlotError> {
        let Self {
            cal_table,
            kind,
            mode,
            field,
            corr,
            antennas,
            antenna_names,
            overrides,
            colour_map,
            legend_mode,
            show_all,
            show_errors,
            html_output: _,
            image_format: _,
        } = self;

        // Bail before touching the table if this can't work.
        kind.check_mode(*mode)?;

        let context = cal_table.get_context();
        let solutions = antennas
            .iter()
            .map(|&ant| cal_table.read_antenna(ant, *field))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Read solutions for {} antennas", solutions.len());

        // Antennas are independent of each other, so transform them in
        // parallel. The results keep the antenna order.
        let series = solutions
            .par_iter()
            .map(|sols| transform(*kind, *mode, sols, *corr))
            .collect::<Result<Vec<_>, _>>()?;

        let mut aggregator = AxisRangeAggregator::new();
        for (ant, s) in antennas.iter().zip(series.iter()) {
            trace!("Antenna {ant} has {} unflagged samples", s.len());
            aggregator.fold(&s.x, &s.y1, &s.y2);
        }
        let ranges = aggregator.finalize(overrides)?;

        let lower_errors = series.iter().any(|s| s.y2_err.is_some());
        let plots = antennas
            .iter()
            .zip(series)
            .map(|(&antenna, series)| AntennaPlot {
                antenna,
                name: antenna_names
                    .as_ref()
                    .and_then(|names| names.get(antenna))
                    .cloned(),
                colour: colour_map.for_antenna(antenna, context.antennas.len()),
                series,
            })
            .collect::<Vec<_>>();

        let entries = antennas
            .iter()
            .enumerate()
            .map(|(rank, &antenna)| LegendEntry::new(rank, antenna, lower_errors))
            .collect();
        let batches = assign_batches(entries, LEGEND_BATCH_SIZE);
        debug!("{} antennas over {} legend batches", plots.len(), batches.len());
        let mut visibility = VisibilityStateMachine::new(&batches, lower_errors);
        if *show_all {
            visibility.apply(VisibilityEvent::SelectAll(true));
        }
        if *show_errors {
            visibility.apply(VisibilityEvent::ErrorBars(true));
        }
        visibility.apply(VisibilityEvent::LegendMode(*legend_mode));

        let (upper_y, lower_y) = kind.y_labels(*mode, *corr);
        let labels = PlotLabels {
            title: format!(
                "{} (field {field}, corr. {corr})",
                cal_table.get_table_name()
            ),
            x: kind.x_label().to_string(),
            upper_y,
            lower_y,
        };

        Ok(PreparedPlot {
            antennas: plots,
            ranges,
            batches,
            visibility,
            labels,
        })
    }
}

/// Create the directory the page goes in, if it's missing. The outermost
/// directory that had to be created is returned, so it can be removed again.
fn create_output_dir(html_output: &Path) -> Result<Option<PathBuf>, DrawError> {
    let dir = match html_output.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => return Ok(None),
    };
    let outermost = dir
        .ancestors()
        .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
        .last()
        .map(Path::to_path_buf);
    if let Some(outermost) = &outermost {
        debug!("Creating output directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
        trace!("Created {} and below", outermost.display());
    }
    Ok(outermost)
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum PlotError {
    #[error(transparent)]
    Solutions(#[from] SolutionsError),

    #[error(transparent)]
    Read(#[from] CalTableReadError),

    #[error(transparent)]
    Extent(#[from] AxisExtentError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}
