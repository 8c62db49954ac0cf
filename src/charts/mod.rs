//! Charts module - scales, SVG surface and chart rendering

mod curve;
mod renderer;
mod scale;
mod surface;

pub use curve::natural_path;
pub use renderer::{ChartKind, ChartRenderer, RenderError, RenderedChart, POST_TYPE_PALETTE};
pub use scale::{BandScale, LinearScale, OrdinalScale, PointScale};
pub use surface::{escape, Anchor, ChartLayout, Margin, Style, SvgSurface, TextStyle};
