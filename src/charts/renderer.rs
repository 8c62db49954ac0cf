//! Static Chart Renderer
//! Draws the three engagement charts as SVG documents.
//!
//! Layout of every chart (600x350 by default):
//! 1. Plot area inset by the margins (top 40, right 40, bottom 60, left 60)
//! 2. Bottom axis with categories or dates, left axis with likes
//! 3. Axis titles centred under the x axis and rotated beside the y axis
//! 4. Marks: box + whiskers, grouped bars + legend, or a smoothed line

use crate::charts::curve::natural_path;
use crate::charts::scale::{BandScale, LinearScale, OrdinalScale, PointScale};
use crate::charts::surface::{Anchor, ChartLayout, Style, SvgSurface, TextStyle};
use crate::stats::{AgeGroupSummary, Aggregates, DateAverage, GroupedAverage, StatsCalculator};
use thiserror::Error;
use tracing::debug;

// Colors
const BLACK: &str = "black";
const BOX_FILL: &str = "#dce8f2";
const LINE_COLOR: &str = "#ff7f0e";

/// Post type colours, assigned in order of first appearance
pub const POST_TYPE_PALETTE: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

const TICK_COUNT: usize = 10;
const DATE_LABEL_ROTATION: f64 = -25.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Nothing to draw for {chart}")]
    NoData { chart: &'static str },
    #[error("{chart}: '{value}' is not on the category axis")]
    UnknownCategory { chart: &'static str, value: String },
}

/// The three charts, each bound to its named container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Box,
    Bar,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Box, ChartKind::Bar, ChartKind::Line];

    /// Name of the container element the chart is drawn into.
    pub fn container(self) -> &'static str {
        match self {
            ChartKind::Box => "boxplot",
            ChartKind::Bar => "barplot",
            ChartKind::Line => "lineplot",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Box => "Likes by Age Group",
            ChartKind::Bar => "Average Likes by Platform and Post Type",
            ChartKind::Line => "Average Likes over Time",
        }
    }
}

/// A finished chart ready to be written out.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub svg: String,
}

pub struct ChartRenderer {
    layout: ChartLayout,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartLayout::default())
    }
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// Render box, bar and line charts in that order. The first failure
    /// stops the remaining charts.
    pub fn render_all(&self, aggregates: &Aggregates) -> Result<Vec<RenderedChart>, RenderError> {
        Ok(vec![
            self.render_box_plot(&aggregates.box_summaries)?,
            self.render_bar_chart(&aggregates.grouped_averages)?,
            self.render_line_chart(&aggregates.date_averages)?,
        ])
    }

    fn surface(&self, kind: ChartKind) -> SvgSurface {
        SvgSurface::new(kind.container(), self.layout)
    }

    fn linear_ticks(y: &LinearScale) -> Vec<(f64, String)> {
        let format = y.tick_format(TICK_COUNT);
        y.ticks(TICK_COUNT)
            .into_iter()
            .map(|v| (y.map(v), format(v)))
            .collect()
    }

    /// Box plot of likes per age group: whisker from min to max, box from
    /// q1 to q3 and a heavier median tick.
    pub fn render_box_plot(&self, summaries: &[AgeGroupSummary]) -> Result<RenderedChart, RenderError> {
        let kind = ChartKind::Box;
        let y_max = StatsCalculator::max_of(summaries, |s| s.summary.max)
            .ok_or(RenderError::NoData { chart: kind.container() })?;

        let mut surface = self.surface(kind);
        let width = surface.inner_width();
        let height = surface.inner_height();

        let x = BandScale::new(summaries.iter().map(|s| s.age_group.as_str()), (0.0, width))
            .padding(0.3);
        let y = LinearScale::new((0.0, y_max), (height, 0.0));

        let x_ticks: Vec<(f64, String)> = x
            .domain()
            .iter()
            .filter_map(|g| x.center(g).map(|cx| (cx, g.clone())))
            .collect();
        surface.axis_bottom((0.0, width), &x_ticks, None);
        surface.axis_left((height, 0.0), &Self::linear_ticks(&y));
        surface.axis_titles("Age Group", "Number of Likes");

        let bw = x.bandwidth();
        for group in summaries {
            let left = x.position(&group.age_group).ok_or_else(|| RenderError::UnknownCategory {
                chart: kind.container(),
                value: group.age_group.clone(),
            })?;
            let q = &group.summary;

            surface.line(
                left + bw / 2.0,
                y.map(q.min),
                left + bw / 2.0,
                y.map(q.max),
                &Style::stroke(BLACK),
            );
            surface.rect(
                left,
                y.map(q.q3),
                bw,
                y.map(q.q1) - y.map(q.q3),
                &Style::fill(BOX_FILL).with_stroke(BLACK),
            );
            surface.line(
                left,
                y.map(q.median),
                left + bw,
                y.map(q.median),
                &Style::stroke(BLACK).with_stroke_width(2.0),
            );
        }

        debug!(groups = summaries.len(), y_max, "box plot drawn");
        Ok(RenderedChart {
            kind,
            svg: surface.finish(),
        })
    }

    /// Side-by-side bars: one band per platform, one bar per observed post
    /// type inside it, plus a colour legend.
    pub fn render_bar_chart(&self, rows: &[GroupedAverage]) -> Result<RenderedChart, RenderError> {
        let kind = ChartKind::Bar;
        let y_max = StatsCalculator::max_of(rows, |r| r.avg_likes)
            .ok_or(RenderError::NoData { chart: kind.container() })?;

        let mut surface = self.surface(kind);
        let width = surface.inner_width();
        let height = surface.inner_height();

        let x0 = BandScale::new(rows.iter().map(|r| r.platform.as_str()), (0.0, width))
            .padding_inner(0.2);
        let x1 = BandScale::new(rows.iter().map(|r| r.post_type.as_str()), (0.0, x0.bandwidth()))
            .padding(0.05);
        let y = LinearScale::new((0.0, y_max), (height, 0.0)).nice(TICK_COUNT);
        let color = OrdinalScale::new(x1.domain().iter().cloned(), &POST_TYPE_PALETTE);

        let x_ticks: Vec<(f64, String)> = x0
            .domain()
            .iter()
            .filter_map(|p| x0.center(p).map(|cx| (cx, p.clone())))
            .collect();
        surface.axis_bottom((0.0, width), &x_ticks, None);
        surface.axis_left((height, 0.0), &Self::linear_ticks(&y));
        surface.axis_titles("Platform", "Average Likes");

        let unknown = |value: &str| RenderError::UnknownCategory {
            chart: kind.container(),
            value: value.to_string(),
        };

        for platform in x0.domain() {
            let offset = x0.position(platform).ok_or_else(|| unknown(platform))?;
            surface.begin_group(offset, 0.0);
            for row in rows.iter().filter(|r| &r.platform == platform) {
                let bar_x = x1.position(&row.post_type).ok_or_else(|| unknown(&row.post_type))?;
                let bar_y = y.map(row.avg_likes);
                surface.rect(
                    bar_x,
                    bar_y,
                    x1.bandwidth(),
                    height - bar_y,
                    &Style::fill(color.color(&row.post_type)),
                );
            }
            surface.end_group();
        }

        surface.begin_group(width - 100.0, 0.0);
        for (i, post_type) in x1.domain().iter().enumerate() {
            let row_y = i as f64 * 20.0;
            surface.rect(0.0, row_y, 12.0, 12.0, &Style::fill(color.color(post_type)));
            surface.text(
                18.0,
                row_y + 10.0,
                post_type,
                TextStyle {
                    anchor: Anchor::Start,
                    middle_baseline: true,
                    ..TextStyle::default()
                },
            );
        }
        surface.end_group();

        debug!(
            platforms = x0.domain().len(),
            post_types = x1.domain().len(),
            y_max = y.domain().1,
            "bar chart drawn"
        );
        Ok(RenderedChart {
            kind,
            svg: surface.finish(),
        })
    }

    /// Average likes per date joined by a natural cubic spline.
    pub fn render_line_chart(&self, rows: &[DateAverage]) -> Result<RenderedChart, RenderError> {
        let kind = ChartKind::Line;
        let y_max = StatsCalculator::max_of(rows, |r| r.avg_likes)
            .ok_or(RenderError::NoData { chart: kind.container() })?;

        let mut surface = self.surface(kind);
        let width = surface.inner_width();
        let height = surface.inner_height();

        let x = PointScale::new(rows.iter().map(|r| r.date.as_str()), (0.0, width));
        let y = LinearScale::new((0.0, y_max), (height, 0.0)).nice(TICK_COUNT);

        let x_ticks: Vec<(f64, String)> = x
            .domain()
            .iter()
            .filter_map(|d| x.position(d).map(|px| (px, d.clone())))
            .collect();
        surface.axis_bottom((0.0, width), &x_ticks, Some(DATE_LABEL_ROTATION));
        surface.axis_left((height, 0.0), &Self::linear_ticks(&y));
        surface.axis_titles("Date", "Average Likes");

        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let px = x.position(&row.date).ok_or_else(|| RenderError::UnknownCategory {
                chart: kind.container(),
                value: row.date.clone(),
            })?;
            points.push((px, y.map(row.avg_likes)));
        }

        surface.path(
            &natural_path(&points),
            &Style {
                fill: Some("none".to_string()),
                stroke: Some(LINE_COLOR.to_string()),
                stroke_width: Some(2.0),
            },
        );

        debug!(dates = rows.len(), y_max = y.domain().1, "line chart drawn");
        Ok(RenderedChart {
            kind,
            svg: surface.finish(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FiveNumberSummary;

    fn summary(group: &str, values: [f64; 5]) -> AgeGroupSummary {
        AgeGroupSummary {
            age_group: group.to_string(),
            summary: FiveNumberSummary {
                min: values[0],
                q1: values[1],
                median: values[2],
                q3: values[3],
                max: values[4],
                count: 5,
            },
        }
    }

    fn average(platform: &str, post_type: &str, avg: f64) -> GroupedAverage {
        GroupedAverage {
            platform: platform.to_string(),
            post_type: post_type.to_string(),
            avg_likes: avg,
            count: 1,
        }
    }

    #[test]
    fn box_plot_draws_three_marks_per_group() {
        let renderer = ChartRenderer::default();
        let chart = renderer
            .render_box_plot(&[
                summary("18-24", [10.0, 15.0, 20.0, 25.0, 30.0]),
                summary("25-34", [5.0, 8.0, 12.0, 40.0, 100.0]),
            ])
            .unwrap();

        assert_eq!(chart.kind, ChartKind::Box);
        assert_eq!(chart.svg.matches(&format!("fill=\"{BOX_FILL}\"")).count(), 2);
        assert_eq!(chart.svg.matches("stroke-width=\"2\"").count(), 2);
        assert!(chart.svg.contains(">18-24</text>"));
        assert!(chart.svg.contains(">Number of Likes</text>"));
        // y axis top is the largest max, without rounding
        assert!(chart.svg.contains(">100</text>"));
    }

    #[test]
    fn box_whisker_spans_min_to_max() {
        let renderer = ChartRenderer::default();
        let chart = renderer
            .render_box_plot(&[summary("A", [0.0, 25.0, 50.0, 75.0, 100.0])])
            .unwrap();

        // single band: step = 500 / 1.3, band starts at 0.3 * step
        let step = 500.0 / 1.3;
        let cx = crate::charts::curve::fmt(step * 0.3 + step * 0.35);
        let whisker = format!("<line x1=\"{cx}\" y1=\"250\" x2=\"{cx}\" y2=\"0\" stroke=\"black\"/>");
        assert!(chart.svg.contains(&whisker), "{}", chart.svg);
    }

    #[test]
    fn bar_chart_colors_by_post_type_and_lists_legend() {
        let renderer = ChartRenderer::default();
        let chart = renderer
            .render_bar_chart(&[
                average("Instagram", "video", 120.0),
                average("Instagram", "image", 80.0),
                average("Twitter", "image", 40.0),
                average("Twitter", "text", 10.0),
            ])
            .unwrap();

        // three colours, each used by its bars plus its legend swatch
        assert_eq!(chart.svg.matches("fill=\"#1f77b4\"").count(), 2);
        assert_eq!(chart.svg.matches("fill=\"#ff7f0e\"").count(), 3);
        assert_eq!(chart.svg.matches("fill=\"#2ca02c\"").count(), 2);
        assert!(chart.svg.contains("alignment-baseline=\"middle\">video</text>"));
        assert!(chart.svg.contains("<g transform=\"translate(400,0)\">"));
        // y axis niced from 120 up to a round bound
        assert!(chart.svg.contains(">120</text>"));
    }

    #[test]
    fn line_chart_has_single_smoothed_path() {
        let renderer = ChartRenderer::default();
        let rows = vec![
            DateAverage {
                date: "2024-01-01".into(),
                avg_likes: 10.0,
                count: 1,
            },
            DateAverage {
                date: "2024-01-02".into(),
                avg_likes: 30.0,
                count: 1,
            },
            DateAverage {
                date: "2024-01-03".into(),
                avg_likes: 20.0,
                count: 1,
            },
        ];
        let chart = renderer.render_line_chart(&rows).unwrap();

        assert_eq!(chart.svg.matches("<path d=").count(), 1);
        assert!(chart.svg.contains("stroke=\"#ff7f0e\" stroke-width=\"2\""));
        assert!(chart.svg.contains("fill=\"none\""));
        assert_eq!(chart.svg.matches("transform=\"rotate(-25)\"").count(), 3);
        assert!(chart.svg.contains("<path d=\"M0,"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let renderer = ChartRenderer::default();
        assert_eq!(
            renderer.render_box_plot(&[]).unwrap_err(),
            RenderError::NoData { chart: "boxplot" }
        );
        assert_eq!(
            renderer.render_bar_chart(&[]).unwrap_err(),
            RenderError::NoData { chart: "barplot" }
        );
        assert_eq!(
            renderer.render_line_chart(&[]).unwrap_err(),
            RenderError::NoData { chart: "lineplot" }
        );
    }
}
