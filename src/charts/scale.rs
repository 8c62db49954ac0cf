//! Scales
//! Map categories and values onto pixel ranges: band, point, linear and
//! ordinal colour scales.

use std::collections::HashMap;

/// Categorical scale that splits a range into equal, padded bands.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = Vec::new();
        let mut index = HashMap::new();
        for value in domain {
            let value = value.into();
            if !index.contains_key(&value) {
                index.insert(value.clone(), values.len());
                values.push(value);
            }
        }

        Self {
            domain: values,
            index,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    /// Set inner and outer padding together.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self
    }

    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (start, stop) = self.range;
        (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn origin(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (start, stop) = self.range;
        start + (stop - start - self.step() * (n - self.padding_inner)) * self.align
    }

    /// Start of the band for `value`, `None` when it is not in the domain.
    pub fn position(&self, value: &str) -> Option<f64> {
        let i = *self.index.get(value)?;
        Some(self.origin() + self.step() * i as f64)
    }

    /// Centre of the band for `value`.
    pub fn center(&self, value: &str) -> Option<f64> {
        self.position(value).map(|x| x + self.bandwidth() / 2.0)
    }
}

/// Categorical scale placing each category at a discrete point.
#[derive(Debug, Clone)]
pub struct PointScale {
    band: BandScale,
}

impl PointScale {
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            band: BandScale::new(domain, range).padding_inner(1.0),
        }
    }

    pub fn domain(&self) -> &[String] {
        self.band.domain()
    }

    pub fn position(&self, value: &str) -> Option<f64> {
        self.band.position(value)
    }
}

/// Continuous scale from a numeric domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Map a domain value into the range. A collapsed domain maps everything
    /// to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 || !(d1 - d0).is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        if !(start.is_finite() && stop.is_finite()) {
            return self;
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prev_step = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prev_step {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prev_step = step;
        }

        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Round tick values covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if !(start.is_finite() && stop.is_finite()) || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let inc = tick_increment(start, stop, count);
        if inc == 0.0 || !inc.is_finite() {
            return Vec::new();
        }

        let mut ticks: Vec<f64> = if inc > 0.0 {
            let lo = (start / inc).ceil() as i64;
            let hi = (stop / inc).floor() as i64;
            (lo..=hi).map(|i| i as f64 * inc).collect()
        } else {
            let inc = -inc;
            let lo = (start * inc).ceil() as i64;
            let hi = (stop * inc).floor() as i64;
            (lo..=hi).map(|i| i as f64 / inc).collect()
        };

        if reversed {
            ticks.reverse();
        }
        ticks
    }

    /// Label for a tick, with as many decimals as the tick step needs.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let (start, stop) = self.domain;
        let inc = tick_increment(start.min(stop), start.max(stop), count);
        let decimals = if inc < 0.0 {
            ((-inc).log10() - 1e-9).ceil().max(0.0) as usize
        } else {
            0
        };
        move |value| format_grouped(value, decimals)
    }
}

/// Tick increment for a span: positive for steps >= 1, negative reciprocal
/// for fractional steps so that integer arithmetic stays exact.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(1) as f64;
    if step <= 0.0 || !step.is_finite() {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn format_grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text.clone(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Maps categories to a fixed list of colours by position, cycling.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    index: HashMap<String, usize>,
    colors: Vec<String>,
}

impl OrdinalScale {
    pub fn new<I, S>(domain: I, colors: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        for value in domain {
            let value = value.into();
            let next = index.len();
            index.entry(value).or_insert(next);
        }
        Self {
            index,
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn color(&self, value: &str) -> &str {
        if self.colors.is_empty() {
            return "black";
        }
        let i = self.index.get(value).copied().unwrap_or(0);
        &self.colors[i % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn band_scale_with_padding() {
        let x = BandScale::new(["a", "b", "c"], (0.0, 500.0)).padding(0.3);
        // step = 500 / (3 - 0.3 + 0.6)
        let step = 500.0 / 3.3;
        assert!(close(x.step(), step));
        assert!(close(x.bandwidth(), step * 0.7));
        assert!(close(x.position("a").unwrap(), step * 0.3));
        assert!(close(x.position("c").unwrap() + x.bandwidth(), 500.0 - step * 0.3));
        assert!(x.position("zzz").is_none());
    }

    #[test]
    fn band_scale_inner_padding_only_spans_range() {
        let x = BandScale::new(["p", "q"], (0.0, 100.0)).padding_inner(0.2);
        assert!(close(x.position("p").unwrap(), 0.0));
        assert!(close(x.position("q").unwrap() + x.bandwidth(), 100.0));
    }

    #[test]
    fn band_scale_ignores_duplicate_domain_values() {
        let x = BandScale::new(["a", "b", "a"], (0.0, 10.0));
        assert_eq!(x.domain(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn point_scale_spans_range() {
        let x = PointScale::new(["d1", "d2", "d3"], (0.0, 500.0));
        assert!(close(x.position("d1").unwrap(), 0.0));
        assert!(close(x.position("d2").unwrap(), 250.0));
        assert!(close(x.position("d3").unwrap(), 500.0));
    }

    #[test]
    fn single_point_sits_in_the_middle() {
        let x = PointScale::new(["only"], (0.0, 500.0));
        assert!(close(x.position("only").unwrap(), 250.0));
    }

    #[test]
    fn linear_maps_inverted_range() {
        let y = LinearScale::new((0.0, 100.0), (250.0, 0.0));
        assert!(close(y.map(0.0), 250.0));
        assert!(close(y.map(100.0), 0.0));
        assert!(close(y.map(50.0), 125.0));
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let y = LinearScale::new((0.0, 0.0), (250.0, 0.0));
        assert!(close(y.map(0.0), 125.0));
    }

    #[test]
    fn nice_rounds_domain_outward() {
        let y = LinearScale::new((0.0, 487.3), (250.0, 0.0)).nice(10);
        assert_eq!(y.domain(), (0.0, 500.0));

        let y = LinearScale::new((0.0, 0.87), (1.0, 0.0)).nice(10);
        assert!(close(y.domain().1, 0.9));

        let y = LinearScale::new((0.0, 1234.0), (1.0, 0.0)).nice(10);
        assert_eq!(y.domain(), (0.0, 1300.0));
    }

    #[test]
    fn ticks_cover_domain() {
        let y = LinearScale::new((0.0, 500.0), (250.0, 0.0));
        let ticks = y.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&500.0));
        assert_eq!(ticks.len(), 11);

        let y = LinearScale::new((0.0, 1.0), (1.0, 0.0));
        let ticks = y.ticks(5);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn tick_labels_use_step_precision() {
        let y = LinearScale::new((0.0, 5000.0), (1.0, 0.0));
        let fmt = y.tick_format(10);
        assert_eq!(fmt(1500.0), "1,500");
        assert_eq!(fmt(0.0), "0");

        let y = LinearScale::new((0.0, 1.0), (1.0, 0.0));
        let fmt = y.tick_format(10);
        assert_eq!(fmt(0.3), "0.3");
    }

    #[test]
    fn ordinal_colors_cycle() {
        let c = OrdinalScale::new(["a", "b", "c", "d"], &["red", "green", "blue"]);
        assert_eq!(c.color("a"), "red");
        assert_eq!(c.color("c"), "blue");
        assert_eq!(c.color("d"), "red");
    }
}
