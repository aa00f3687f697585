use nalgebra::Point2;

use crate::image::BinaryView;

/// Pixel evidence collected inside a vertical core area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoreData {
    /// Largest run of consecutive rows with no foreground pixel.
    pub gap: i32,
    /// Ratio of rows with no foreground pixel over all scanned rows.
    pub white_ratio: f64,
}

/// Scan the area enclosed between two oriented boundary lines.
///
/// `left` and `right` each join a corner of the upper glyph to the matching
/// corner of the lower glyph. For every integer ordinate between the line
/// ends, the row segment between the interpolated boundary abscissae is
/// inspected; a row with no foreground pixel at all is "white".
pub fn vertical_core(
    view: &BinaryView<'_>,
    left: (Point2<f64>, Point2<f64>),
    right: (Point2<f64>, Point2<f64>),
) -> CoreData {
    let y_start = left.0.y.min(right.0.y).round() as i32;
    let y_stop = left.1.y.max(right.1.y).round() as i32;

    if y_stop < y_start {
        return CoreData::default();
    }

    let mut rows = 0;
    let mut white_rows = 0;
    let mut run = 0;
    let mut gap = 0;

    for y in y_start..=y_stop {
        let xl = interpolate_x(&left, y);
        let xr = interpolate_x(&right, y);
        let (x0, x1) = if xl <= xr { (xl, xr) } else { (xr, xl) };

        let mut fore = false;
        for x in x0.floor() as i32..=x1.ceil() as i32 {
            if view.is_fore(x, y) {
                fore = true;
                break;
            }
        }

        rows += 1;
        if fore {
            run = 0;
        } else {
            white_rows += 1;
            run += 1;
            gap = gap.max(run);
        }
    }

    CoreData {
        gap,
        white_ratio: white_rows as f64 / rows as f64,
    }
}

fn interpolate_x(line: &(Point2<f64>, Point2<f64>), y: i32) -> f64 {
    let (a, b) = line;
    let dy = b.y - a.y;
    if dy.abs() < f64::EPSILON {
        return a.x;
    }
    let t = ((y as f64 - a.y) / dy).clamp(0.0, 1.0);
    a.x + t * (b.x - a.x)
}
