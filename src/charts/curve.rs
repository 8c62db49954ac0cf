//! Natural cubic spline through a sequence of points, emitted as SVG path
//! data made of cubic Bézier segments.

use std::fmt::Write;

/// Bézier control points for one coordinate of a natural spline.
///
/// Solves the tridiagonal system with the Thomas algorithm. Returns the
/// first and second control values of each of the `n - 1` segments.
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n.saturating_sub(1) {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];

    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }

    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }

    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }

    (a, b)
}

/// SVG path data for a natural cubic spline through `points`.
///
/// One point gives a bare move-to, two points a straight segment.
pub fn natural_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    let Some(&(x0, y0)) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{},{}", fmt(x0), fmt(y0));

    match points.len() {
        1 => {}
        2 => {
            let (x1, y1) = points[1];
            let _ = write!(d, "L{},{}", fmt(x1), fmt(y1));
        }
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (px0, px1) = control_points(&xs);
            let (py0, py1) = control_points(&ys);

            for i in 0..points.len() - 1 {
                let (x, y) = points[i + 1];
                let _ = write!(
                    d,
                    "C{},{},{},{},{},{}",
                    fmt(px0[i]),
                    fmt(py0[i]),
                    fmt(px1[i]),
                    fmt(py1[i]),
                    fmt(x),
                    fmt(y)
                );
            }
        }
    }

    d
}

/// Compact coordinate text: up to three decimals, trailing zeros trimmed.
pub fn fmt(value: f64) -> String {
    let text = format!("{:.3}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
