// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arguments for plotting a calibration table.


use std::{
    borrow::Cow,
    ffi::OsString,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{
    classify_table, display_warnings, locate_table, InfoPrinter, Warn, ARG_FILE_HELP, TABLE_HELP,
};
use crate::{
    constants::{DEFAULT_CORRELATION, DEFAULT_FIELD},
    io::read::{read_antenna_names, CalTableRead, CasaCalTable},
    params::PlotParams,
    plot::{
        AxisOverrides, ColourMap, ImageFormat, LegendMode, COLOUR_MAPS, IMAGE_FORMATS,
        LEGEND_MODES,
    },
    solutions::{DisplayMode, SolutionsError, DISPLAY_MODES},
    CalplotError,
};
#[cfg(not(feature = "plotting"))]
use crate::plot::DrawError;

lazy_static::lazy_static! {
    static ref DOPLOT_HELP: String =
        format!("How complex solutions are split over the two panels. Supported modes: {}. Delay tables only support 'ap'. Default: {}", *DISPLAY_MODES, DisplayMode::default());

    static ref CMAP_HELP: String =
        format!("The colour map used to colour antennas. Supported maps: {}. Default: {}", *COLOUR_MAPS, ColourMap::default());

    static ref LEGEND_HELP: String =
        format!("Which legends the page starts with. Supported modes: {} (antennas and errors, antennas only, errors only, none). Default: {}", *LEGEND_MODES, LegendMode::default());

    static ref IMAGE_FORMAT_HELP: String =
        format!("Also write a static image of each panel next to the HTML page. Supported formats: {}", *IMAGE_FORMATS);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PlotArgs {
    #[clap(long, help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(name = "TABLE", help = TABLE_HELP.as_str())]
    pub(super) table: Option<String>,

    /// The field ID to plot. Default: 0
    #[clap(short, long)]
    pub(super) field: Option<usize>,

    #[clap(short, long, help = DOPLOT_HELP.as_str())]
    pub(super) doplot: Option<String>,

    /// The correlation index to plot. Default: 0
    #[clap(short, long)]
    pub(super) corr: Option<usize>,

    /// Comma-separated antenna IDs to plot, e.g. "0,1,5". Antennas not in the
    /// table are ignored with a warning. Default: all antennas in the table.
    #[clap(short, long)]
    pub(super) ant: Option<String>,

    /// The minimum x-axis value (time or channel).
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) t0: Option<f64>,

    /// The maximum x-axis value (time or channel).
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) t1: Option<f64>,

    /// The minimum y-axis value of the upper panel.
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) yu0: Option<f64>,

    /// The maximum y-axis value of the upper panel.
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) yu1: Option<f64>,

    /// The minimum y-axis value of the lower panel.
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) yl0: Option<f64>,

    /// The maximum y-axis value of the lower panel.
    #[clap(long, allow_hyphen_values = true, help_heading = "AXES")]
    pub(super) yl1: Option<f64>,

    #[clap(long, help = CMAP_HELP.as_str())]
    pub(super) cmap: Option<String>,

    #[clap(long, help = LEGEND_HELP.as_str(), help_heading = "INITIAL VIEW")]
    pub(super) legend: Option<String>,

    /// Start with every antenna shown. By default, only the first 16 are.
    #[clap(long, help_heading = "INITIAL VIEW")]
    #[serde(default)]
    pub(super) show_all: bool,

    /// Start with error bars shown.
    #[clap(long, help_heading = "INITIAL VIEW")]
    #[serde(default)]
    pub(super) show_errors: bool,

    /// A measurement set to take antenna names from. If not given, names are
    /// taken from the calibration table's own antenna table, if it has one.
    #[clap(long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) ms: Option<PathBuf>,

    /// The name of the HTML page to write. ".html" is added if it isn't
    /// there. Default: plot_<table>_corr<c>_<doplot>_field<f>.html
    #[clap(short, long, help_heading = "OUTPUT FILES")]
    pub(super) plotname: Option<String>,

    /// The directory to write the plots into. If this doesn't exist, then the
    /// relevant directories will be created.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_directory: Option<PathBuf>,

    #[clap(long, help = IMAGE_FORMAT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) image_format: Option<String>,
}

impl PlotArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PlotArgs, CalplotError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let PlotArgs {
                args_file: _,
                table,
                field,
                doplot,
                corr,
                ant,
                t0,
                t1,
                yu0,
                yu1,
                yl0,
                yl1,
                cmap,
                legend,
                show_all,
                show_errors,
                ms,
                plotname,
                output_directory,
                image_format,
            } = unpack_arg_file!(arg_file);

            Ok(PlotArgs {
                args_file: None,
                table: cli_args.table.or(table),
                field: cli_args.field.or(field),
                doplot: cli_args.doplot.or(doplot),
                corr: cli_args.corr.or(corr),
                ant: cli_args.ant.or(ant),
                t0: cli_args.t0.or(t0),
                t1: cli_args.t1.or(t1),
                yu0: cli_args.yu0.or(yu0),
                yu1: cli_args.yu1.or(yu1),
                yl0: cli_args.yl0.or(yl0),
                yl1: cli_args.yl1.or(yl1),
                cmap: cli_args.cmap.or(cmap),
                legend: cli_args.legend.or(legend),
                show_all: cli_args.show_all || show_all,
                show_errors: cli_args.show_errors || show_errors,
                ms: cli_args.ms.or(ms),
                plotname: cli_args.plotname.or(plotname),
                output_directory: cli_args.output_directory.or(output_directory),
                image_format: cli_args.image_format.or(image_format),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<PlotParams, CalplotError> {
        debug!("{:#?}", self);

        let PlotArgs {
            args_file: _,
            table,
            field,
            doplot,
            corr,
            ant,
            t0,
            t1,
            yu0,
            yu1,
            yl0,
            yl1,
            cmap,
            legend,
            show_all,
            show_errors,
            ms,
            plotname,
            output_directory,
            image_format,
        } = self;

        // Everything that can be checked without the table comes first.
        let table = table.ok_or(PlotArgsError::NoTable)?;
        let mode = match doplot {
            None => DisplayMode::default(),
            Some(s) => DisplayMode::from_str(&s).map_err(|_| PlotArgsError::BadDisplayMode(s))?,
        };
        let colour_map = match cmap {
            None => ColourMap::default(),
            Some(s) => ColourMap::from_str(&s).map_err(|_| PlotArgsError::BadColourMap(s))?,
        };
        let legend_mode = match legend {
            None => LegendMode::default(),
            Some(s) => LegendMode::from_str(&s).map_err(|_| PlotArgsError::BadLegendMode(s))?,
        };
        let image_format = match image_format {
            None => None,
            Some(s) => Some(
                ImageFormat::from_str(&s.to_lowercase())
                    .map_err(|_| PlotArgsError::BadImageFormat(s))?,
            ),
        };
        #[cfg(not(feature = "plotting"))]
        if image_format.is_some() {
            return Err(DrawError::NoPlottingFeature.into());
        }
        let kind = classify_table(&table)?;
        kind.check_mode(mode)?;

        let table_path = locate_table(&table)?;
        let cal_table = CasaCalTable::new(&table_path, kind)?;
        let context = cal_table.get_context();

        let field = field.unwrap_or(DEFAULT_FIELD);
        if !context.fields.contains(&field) {
            return Err(PlotArgsError::BadField {
                field,
                available: context.fields.iter().join(", "),
            }
            .into());
        }

        let corr = corr.unwrap_or(DEFAULT_CORRELATION);
        if corr >= context.num_corrs {
            return Err(SolutionsError::BadCorrelation {
                corr,
                num_corrs: context.num_corrs,
            }
            .into());
        }

        let antennas = select_antennas(ant.as_deref(), &context.antennas)?;
        let antenna_names = match ms {
            Some(ms) => Some(read_antenna_names(&ms)?),
            None => context.antenna_names.clone(),
        };

        let html_output = output_path(
            plotname.as_deref(),
            output_directory.as_deref(),
            cal_table.get_table_name(),
            corr,
            mode,
            field,
        );

        let mut printer = InfoPrinter::new(
            format!("Plotting {} ({kind} table)", cal_table.get_table_name()).into(),
        );
        printer.push_line(
            format!("Field {field}, correlation {corr}, display mode '{mode}'").into(),
        );
        let mut block: Vec<Cow<'static, str>> = vec![format!(
            "Plotting {} of {} antennas",
            antennas.len(),
            context.antennas.len()
        )
        .into()];
        if antenna_names.is_none() {
            block.push("No antenna names are available".into());
        }
        printer.push_block(block);
        let mut block: Vec<Cow<'static, str>> =
            vec![format!("Writing {}", html_output.display()).into()];
        if let Some(format) = image_format {
            block.push(format!("and one {format} image per panel").into());
        }
        printer.push_block(block);
        printer.display();

        display_warnings();

        Ok(PlotParams {
            cal_table: Box::new(cal_table),
            kind,
            mode,
            field,
            corr,
            antennas,
            antenna_names,
            overrides: AxisOverrides {
                t0,
                t1,
                yu0,
                yu1,
                yl0,
                yl1,
            },
            colour_map,
            legend_mode,
            show_all,
            show_errors,
            html_output,
            image_format,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), CalplotError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

/// Turn the user's antenna list into the antennas to plot. Order is kept and
/// repeats are dropped. IDs not in the table are dropped with a warning; if
/// nothing is left, that's an error.
fn select_antennas(
    ant: Option<&str>,
    available: &Vec1<usize>,
) -> Result<Vec1<usize>, PlotArgsError> {
    let ant = match ant {
        None => return Ok(available.clone()),
        Some(a) => a,
    };

    let mut selected = vec![];
    let mut invalid = vec![];
    for token in ant.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let id: usize = token
            .parse()
            .map_err(|_| PlotArgsError::ParseAntenna(token.to_string()))?;
        if !available.contains(&id) {
            if !invalid.contains(&id) {
                invalid.push(id);
            }
        } else if !selected.contains(&id) {
            selected.push(id);
        }
    }

    if !invalid.is_empty() {
        format!(
            "Antenna(s) {} are not in the calibration table and won't be plotted",
            invalid.iter().join(", ")
        )
        .warn();
    }

    Vec1::try_from_vec(selected).map_err(|_| PlotArgsError::NoValidAntennas {
        given: ant.to_string(),
        available: available.iter().join(", "),
    })
}

/// Where the HTML page goes. A missing output directory is only created when
/// the plot is written.
fn output_path(
    plotname: Option<&str>,
    output_directory: Option<&Path>,
    table_name: &str,
    corr: usize,
    mode: DisplayMode,
    field: usize,
) -> PathBuf {
    let name = match plotname {
        Some(p) => {
            let pb = PathBuf::from(p);
            match pb.extension().and_then(|e| e.to_str()) {
                Some(e) if e.eq_ignore_ascii_case("html") => pb,
                _ => {
                    let mut s = OsString::from(pb);
                    s.push(".html");
                    PathBuf::from(s)
                }
            }
        }
        None => PathBuf::from(format!(
            "plot_{table_name}_corr{corr}_{mode}_field{field}.html"
        )),
    };

    match output_directory {
        Some(dir) => dir.join(name),
        None => name,
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum PlotArgsError {
    #[error("No calibration table was supplied")]
    NoTable,

    #[error("Display mode '{0}' is not recognised. Supported modes: {}", *DISPLAY_MODES)]
    BadDisplayMode(String),

    #[error("Colour map '{0}' is not recognised. Supported maps: {}", *COLOUR_MAPS)]
    BadColourMap(String),

    #[error("Legend mode '{0}' is not recognised. Supported modes: {}", *LEGEND_MODES)]
    BadLegendMode(String),

    #[error("Image format '{0}' is not recognised. Supported formats: {}", *IMAGE_FORMATS)]
    BadImageFormat(String),

    #[error("Field {field} is not in the calibration table. Available fields: {available}")]
    BadField { field: usize, available: String },

    #[error("Couldn't parse '{0}' as an antenna ID")]
    ParseAntenna(String),

    #[error("None of the requested antennas ({given}) are in the calibration table. Available antennas: {available}")]
    NoValidAntennas { given: String, available: String },
}
