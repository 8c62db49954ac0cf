//! SVG Drawing Surface
//! Rendering context handed to each chart: fixed layout, an element buffer,
//! and primitives for lines, rectangles, text, paths and axes.

use crate::charts::curve::fmt;
use std::fmt::Write;

/// Space reserved around the plot area for axes and titles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 60.0,
            left: 60.0,
        }
    }
}

/// Outer size of a chart and its margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 350.0,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

/// Fill and stroke of a shape. `None` leaves the attribute out.
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Style {
    pub fn fill(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn stroke(color: &str) -> Self {
        Self {
            stroke: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: &str) -> Self {
        self.stroke = Some(color.to_string());
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    fn attrs(&self) -> String {
        let mut out = String::new();
        if let Some(fill) = &self.fill {
            let _ = write!(out, " fill=\"{}\"", escape(fill));
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(out, " stroke=\"{}\"", escape(stroke));
        }
        if let Some(width) = self.stroke_width {
            let _ = write!(out, " stroke-width=\"{}\"", fmt(width));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Placement options for a text element.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStyle {
    pub anchor: Anchor,
    /// Degrees, applied around the text origin
    pub rotate: Option<f64>,
    pub dy: Option<&'static str>,
    pub middle_baseline: bool,
}

/// Escape text for use in SVG/HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// One SVG document under construction.
///
/// Coordinates passed to the drawing methods are relative to the plot area,
/// i.e. already shifted by the left and top margins.
pub struct SvgSurface {
    container: String,
    layout: ChartLayout,
    body: String,
    depth: usize,
}

impl SvgSurface {
    pub fn new(container: &str, layout: ChartLayout) -> Self {
        Self {
            container: container.to_string(),
            layout,
            body: String::new(),
            depth: 0,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.layout.inner_width()
    }

    pub fn inner_height(&self) -> f64 {
        self.layout.inner_height()
    }

    fn push(&mut self, element: &str) {
        for _ in 0..self.depth + 2 {
            self.body.push_str("  ");
        }
        self.body.push_str(element);
        self.body.push('\n');
    }

    /// Open a `<g>` translated by (x, y). Must be paired with `end_group`.
    pub fn begin_group(&mut self, x: f64, y: f64) {
        self.push(&format!("<g transform=\"translate({},{})\">", fmt(x), fmt(y)));
        self.depth += 1;
    }

    pub fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push("</g>");
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &Style) {
        self.push(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>",
            fmt(x1),
            fmt(y1),
            fmt(x2),
            fmt(y2),
            style.attrs()
        ));
    }

    /// Rectangle; negative sizes are clamped to zero.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &Style) {
        self.push(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>",
            fmt(x),
            fmt(y),
            fmt(width.max(0.0)),
            fmt(height.max(0.0)),
            style.attrs()
        ));
    }

    pub fn path(&mut self, d: &str, style: &Style) {
        self.push(&format!("<path d=\"{}\"{}/>", escape(d), style.attrs()));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle) {
        let mut attrs = format!(
            " x=\"{}\" y=\"{}\" text-anchor=\"{}\"",
            fmt(x),
            fmt(y),
            style.anchor.as_str()
        );
        if let Some(dy) = style.dy {
            let _ = write!(attrs, " dy=\"{}\"", dy);
        }
        if style.middle_baseline {
            attrs.push_str(" alignment-baseline=\"middle\"");
        }
        if let Some(deg) = style.rotate {
            let _ = write!(attrs, " transform=\"rotate({})\"", fmt(deg));
        }
        self.push(&format!("<text{}>{}</text>", attrs, escape(content)));
    }

    /// Horizontal axis along the bottom of the plot area.
    ///
    /// `ticks` are (position, label) pairs; `rotate` turns the labels and
    /// anchors them at their end.
    pub fn axis_bottom(&mut self, range: (f64, f64), ticks: &[(f64, String)], rotate: Option<f64>) {
        let height = self.inner_height();
        self.begin_group(0.0, height);
        self.push("<g fill=\"none\" font-size=\"10\" font-family=\"sans-serif\" text-anchor=\"middle\">");
        self.depth += 1;
        self.push(&format!(
            "<path class=\"domain\" stroke=\"currentColor\" d=\"M{},6V0H{}V6\"/>",
            fmt(range.0),
            fmt(range.1)
        ));
        for (x, label) in ticks {
            self.begin_group(*x, 0.0);
            self.line(0.0, 0.0, 0.0, 6.0, &Style::stroke("currentColor"));
            let style = match rotate {
                Some(deg) => TextStyle {
                    anchor: Anchor::End,
                    rotate: Some(deg),
                    dy: Some("0.71em"),
                    middle_baseline: false,
                },
                None => TextStyle {
                    dy: Some("0.71em"),
                    ..TextStyle::default()
                },
            };
            self.tick_label(0.0, 9.0, label, style);
            self.end_group();
        }
        self.end_group();
        self.end_group();
    }

    /// Vertical axis along the left edge of the plot area.
    pub fn axis_left(&mut self, range: (f64, f64), ticks: &[(f64, String)]) {
        self.push("<g fill=\"none\" font-size=\"10\" font-family=\"sans-serif\" text-anchor=\"end\">");
        self.depth += 1;
        self.push(&format!(
            "<path class=\"domain\" stroke=\"currentColor\" d=\"M-6,{}H0V{}H-6\"/>",
            fmt(range.0),
            fmt(range.1)
        ));
        for (y, label) in ticks {
            self.begin_group(0.0, *y);
            self.line(0.0, 0.0, -6.0, 0.0, &Style::stroke("currentColor"));
            self.tick_label(
                -9.0,
                0.0,
                label,
                TextStyle {
                    anchor: Anchor::End,
                    dy: Some("0.32em"),
                    ..TextStyle::default()
                },
            );
            self.end_group();
        }
        self.end_group();
    }

    fn tick_label(&mut self, x: f64, y: f64, label: &str, style: TextStyle) {
        let mut attrs = format!(
            " fill=\"currentColor\" x=\"{}\" y=\"{}\" text-anchor=\"{}\"",
            fmt(x),
            fmt(y),
            style.anchor.as_str()
        );
        if let Some(dy) = style.dy {
            let _ = write!(attrs, " dy=\"{}\"", dy);
        }
        if let Some(deg) = style.rotate {
            let _ = write!(attrs, " transform=\"rotate({})\"", fmt(deg));
        }
        self.push(&format!("<text{}>{}</text>", attrs, escape(label)));
    }

    /// Axis titles: one centred under the x axis, one rotated beside the y axis.
    pub fn axis_titles(&mut self, x_title: &str, y_title: &str) {
        let width = self.inner_width();
        let height = self.inner_height();
        self.text(width / 2.0, height + 45.0, x_title, TextStyle::default());
        self.text(
            -height / 2.0,
            -45.0,
            y_title,
            TextStyle {
                rotate: Some(-90.0),
                ..TextStyle::default()
            },
        );
    }

    /// Close every open group and return the SVG document.
    pub fn finish(mut self) -> String {
        while self.depth > 0 {
            self.end_group();
        }

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" data-container=\"{}\">",
            fmt(self.layout.width),
            fmt(self.layout.height),
            fmt(self.layout.width),
            fmt(self.layout.height),
            escape(&self.container)
        );
        let _ = writeln!(
            svg,
            "  <g transform=\"translate({},{})\">",
            fmt(self.layout.margin.left),
            fmt(self.layout.margin.top)
        );
        svg.push_str(&self.body);
        svg.push_str("  </g>\n</svg>\n");
        svg
    }
}
