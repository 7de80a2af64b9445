// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The interactive HTML page: two `plotly` panels side by side, and the
//! controls that toggle what they show.
//!
//! `plotly` only draws; the controls' behaviour lives in an embedded script
//! that replays the visibility transitions over the serialised state.


use plotly::{
    color::Rgb,
    common::{LegendGroupTitle, Line, Marker, Mode, Title, Visible},
    layout::Axis,
    Layout, Plot, Scatter,
};
use serde::Serialize;
use strum::IntoEnumIterator;

use super::{
    AntennaPlot, DrawError, GlyphKind, LegendBatch, LegendMode, Panel, PlotHandle, PlotLabels,
    PlotRanges, VisibilityStateMachine, VisibilityView,
};
use crate::constants::{PANEL_HEIGHT, PANEL_WIDTH};

const CONTROLS_SCRIPT: &str = include_str!("controls.js");

/// plotly.js must be loaded by the page; the generated plot divs don't carry
/// it.
const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// Everything needed to render the page.
pub(crate) struct PlotPage<'a> {
    pub(crate) labels: &'a PlotLabels,
    pub(crate) antennas: &'a [AntennaPlot],
    pub(crate) batches: &'a [LegendBatch],
    pub(crate) ranges: &'a PlotRanges,
    pub(crate) visibility: &'a VisibilityStateMachine,
}

/// The trace indices of each antenna's glyphs on a panel, by antenna rank.
#[derive(Debug, Default, Serialize, PartialEq)]
struct PanelTraces {
    data: Vec<usize>,
    errors: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct ControlsState {
    divs: [&'static str; 2],
    batches: Vec<[usize; 2]>,
    traces: Traces,
    view: VisibilityView,
}

#[derive(Debug, Default, Serialize)]
struct Traces {
    upper: PanelTraces,
    lower: PanelTraces,
}

fn div_id(panel: Panel) -> &'static str {
    match panel {
        Panel::Upper => "calplot-upper",
        Panel::Lower => "calplot-lower",
    }
}

/// The legend group of every antenna rank, and each group's title.
fn legend_groups(batches: &[LegendBatch], num_antennas: usize) -> Vec<(usize, &str)> {
    let mut groups = vec![(0, ""); num_antennas];
    for batch in batches {
        for rank in batch.ranks() {
            if let Some(g) = groups.get_mut(rank) {
                *g = (batch.index, batch.label.as_str());
            }
        }
    }
    groups
}

/// Build one panel's figure, returning the trace indices of every glyph.
///
/// Each legend batch is its own legend group, so a panel's legend reads as
/// one titled section per batch. Glyphs that aren't drawn stay in the legend
/// as "legendonly" traces; clicking their entry draws them.
fn panel_plot(page: &PlotPage, panel: Panel) -> (Plot, PanelTraces) {
    let mut plot = Plot::new();
    let mut traces = PanelTraces::default();
    let mut num_traces = 0;
    let groups = legend_groups(page.batches, page.antennas.len());

    for ((rank, antenna), &(batch, batch_label)) in
        page.antennas.iter().enumerate().zip(groups.iter())
    {
        let (r, g, b) = antenna.colour;
        let colour = Rgb::new(r, g, b);
        let (ys, errors) = match panel {
            Panel::Upper => (&antenna.series.y1, Some(&antenna.series.y1_err)),
            Panel::Lower => (&antenna.series.y2, antenna.series.y2_err.as_ref()),
        };

        let data_handle = PlotHandle {
            antenna_rank: rank,
            panel,
            kind: GlyphKind::Data,
        };
        let mut data = Scatter::new(antenna.series.x.clone(), ys.clone())
            .name(&antenna.data_label())
            .legend_group(&format!("batch-{batch}"))
            .legend_group_title(LegendGroupTitle::new(batch_label))
            .mode(Mode::Markers)
            .marker(Marker::new().color(colour).size(8))
            .visible(visible(page.visibility.is_drawn(data_handle)))
            .show_legend(page.visibility.legend_shown(panel, GlyphKind::Data));
        if let Some(name) = antenna.name.as_deref() {
            data = data.text(name);
        }
        plot.add_trace(data);
        traces.data.push(num_traces);
        num_traces += 1;

        if let Some(errors) = errors {
            let error_handle = PlotHandle {
                kind: GlyphKind::Error,
                ..data_handle
            };
            let (err_x, err_y) = error_segments(&antenna.series.x, ys, errors);
            let error_trace = Scatter::new(err_x, err_y)
                .name(&antenna.error_label())
                .legend_group(&format!("batch-{batch}-errors"))
                .legend_group_title(LegendGroupTitle::new(&format!("{batch_label} errors")))
                .mode(Mode::Lines)
                .line(Line::new().color(colour).width(3.0))
                .visible(visible(page.visibility.is_drawn(error_handle)))
                .show_legend(page.visibility.legend_shown(panel, GlyphKind::Error));
            plot.add_trace(error_trace);
            traces.errors.push(num_traces);
            num_traces += 1;
        }
    }

    let y_range = page.ranges.y(panel);
    let layout = Layout::new()
        .title(Title::new(&page.labels.panel_title(panel)))
        .width(PANEL_WIDTH as usize)
        .height(PANEL_HEIGHT as usize)
        .show_legend(true)
        .x_axis(
            Axis::new()
                .title(Title::new(&page.labels.x))
                .range(vec![page.ranges.x.min, page.ranges.x.max]),
        )
        .y_axis(
            Axis::new()
                .title(Title::new(page.labels.y(panel)))
                .range(vec![y_range.min, y_range.max]),
        );
    plot.set_layout(layout);

    (plot, traces)
}

fn visible(drawn: bool) -> Visible {
    if drawn {
        Visible::True
    } else {
        Visible::LegendOnly
    }
}

/// Vertical error bars as line segments, `y - err` to `y + err` at each `x`.
/// Segments are separated by gaps.
fn error_segments(x: &[f64], y: &[f64], err: &[f64]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut seg_x = Vec::with_capacity(x.len() * 3);
    let mut seg_y = Vec::with_capacity(x.len() * 3);
    for ((&x, &y), &e) in x.iter().zip(y.iter()).zip(err.iter()) {
        seg_x.extend([Some(x), Some(x), None]);
        seg_y.extend([Some(y - e), Some(y + e), None]);
    }
    (seg_x, seg_y)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The control widgets, in their initial state.
fn controls_html(page: &PlotPage) -> String {
    let sm = page.visibility;
    let mut html = String::new();
    html.push_str("<div id=\"calplot-controls\">\n");
    html.push_str(&format!(
        "<button id=\"calplot-select-all\" type=\"button\">{}</button>\n",
        sm.select_all_label()
    ));
    html.push_str("<div id=\"calplot-batches\">\n");
    for batch in page.batches {
        html.push_str(&format!(
            "<label><input type=\"checkbox\" id=\"calplot-batch-{}\"{}> {}</label><br>\n",
            batch.index,
            if sm.batch_active(batch.index) {
                " checked"
            } else {
                ""
            },
            escape_html(&batch.label)
        ));
    }
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<button id=\"calplot-errors\" type=\"button\">{}</button>\n",
        sm.errors_label()
    ));
    html.push_str("<label>Showing Legends: <select id=\"calplot-legend-mode\">\n");
    for mode in LegendMode::iter() {
        html.push_str(&format!(
            "<option value=\"{mode}\"{}>{}</option>\n",
            if mode == sm.legend_mode() {
                " selected"
            } else {
                ""
            },
            mode.description()
        ));
    }
    html.push_str("</select></label>\n</div>\n");
    html
}

/// Render the whole page.
pub(crate) fn render(page: &PlotPage) -> Result<String, DrawError> {
    let mut traces = Traces::default();
    let mut plot_divs = vec![];
    for panel in Panel::iter() {
        let (plot, panel_traces) = panel_plot(page, panel);
        plot_divs.push(plot.to_inline_html(Some(div_id(panel))));
        match panel {
            Panel::Upper => traces.upper = panel_traces,
            Panel::Lower => traces.lower = panel_traces,
        }
    }

    let state = ControlsState {
        divs: [div_id(Panel::Upper), div_id(Panel::Lower)],
        batches: page
            .batches
            .iter()
            .map(|b| {
                let ranks = b.ranks();
                [ranks.start, ranks.end]
            })
            .collect(),
        traces,
        view: page.visibility.view(),
    };
    // "</" can't appear inside a script element.
    let state_json = serde_json::to_string(&state)?.replace("</", "<\\/");

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(&page.labels.title)
    ));
    html.push_str(&format!(
        "<script src=\"{PLOTLY_JS_URL}\"></script>\n"
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str("<div style=\"display: flex; align-items: flex-start;\">\n");
    html.push_str(&controls_html(page));
    for div in plot_divs {
        html.push_str("<div>\n");
        html.push_str(&div);
        html.push_str("\n</div>\n");
    }
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"calplot-state\">{state_json}</script>\n"
    ));
    html.push_str(&format!("<script>\n{CONTROLS_SCRIPT}</script>\n"));
    html.push_str("</body>\n</html>\n");
    Ok(html)
}
