//! End-to-end retrieval over synthetic sheets.

use bargrid::{
    BarGridDetector, BarShape, BracketKind, GridBuildError, GridParams, InterKind, RawPeak,
    StaffSpec, Tag, VerticalSide,
};
use bargrid_core::{BinaryImage, Glyph, GlyphSource, Rect, Scale, Skew};
use nalgebra::Point2;

/// Pixel-backed glyph service over the synthetic sheet image.
///
/// Bar glyphs keep only the peak's own columns of the lookup box, mirroring
/// a run table that drops runs wider than the peak.
struct ImageGlyphs<'a> {
    image: &'a BinaryImage,
    interline: i32,
}

impl ImageGlyphs<'_> {
    fn scan(&self, x0: i32, x1: i32, y0: i32, y1: i32, exclude: &[Rect]) -> Option<Glyph> {
        let view = self.image.view();
        let mut pixels: Vec<(i32, i32)> = Vec::new();

        for y in y0..=y1 {
            for x in x0..=x1 {
                if view.is_fore(x, y) && !exclude.iter().any(|r| r.contains(x, y)) {
                    pixels.push((x, y));
                }
            }
        }

        let (&(first_x, first_y), weight) = (pixels.first()?, pixels.len() as i32);
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        for &(x, y) in &pixels {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            sum_x += x as f64;
            sum_y += y as f64;
        }
        let centroid = Point2::new(sum_x / weight as f64, sum_y / weight as f64);

        // Least-squares dy/dx through the pixels.
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for &(x, y) in &pixels {
            let dx = x as f64 - centroid.x;
            sxx += dx * dx;
            sxy += dx * (y as f64 - centroid.y);
        }
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };

        Some(Glyph {
            bounds: Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1),
            weight,
            centroid,
            mean_curvature: 1e6,
            slope,
        })
    }
}

impl GlyphSource for ImageGlyphs<'_> {
    fn bar_glyph(&self, lookup: Rect, max_width: i32) -> Glyph {
        let x0 = lookup.x + self.interline;
        let x1 = x0 + max_width - 1;
        self.scan(x0, x1, lookup.y, lookup.bottom() - 1, &[])
            .unwrap_or(Glyph {
                bounds: Rect::new(x0, lookup.y, max_width, 0),
                weight: 0,
                centroid: Point2::new(x0 as f64, lookup.y as f64),
                mean_curvature: 1e6,
                slope: 0.0,
            })
    }

    fn glyph_in(&self, roi: Rect, exclude: &[Rect]) -> Option<Glyph> {
        self.scan(roi.x, roi.right() - 1, roi.y, roi.bottom() - 1, exclude)
    }
}

fn raw_peak(start: i32, stop: i32) -> RawPeak {
    RawPeak {
        start,
        stop,
        top: 0,
        bottom: 0,
        grade: 0.8,
        staff_end: None,
    }
}

fn staff(top: i32, bottom: i32, left: i32, right: i32, xs: &[(i32, i32)]) -> StaffSpec {
    StaffSpec {
        left,
        right,
        top,
        bottom,
        short: false,
        peaks: xs
            .iter()
            .map(|&(start, stop)| RawPeak {
                top,
                bottom,
                ..raw_peak(start, stop)
            })
            .collect(),
    }
}

fn draw_bar(image: &mut BinaryImage, x: i32, y0: i32, y1: i32, width: i32) {
    image.fill(Rect::new(x, y0, width, y1 - y0 + 1));
}

fn detector() -> BarGridDetector {
    let _ = bargrid_core::init_with_level(log::LevelFilter::Debug);
    BarGridDetector::new(Scale::new(20, 3), Skew::identity(), GridParams::default())
}

#[test]
fn two_staff_sheet_yields_one_system() {
    let mut image = BinaryImage::blank(1200, 500);
    // Staff 0 spans y 100..180, staff 1 spans y 300..380.
    for &x in &[100, 500, 898] {
        draw_bar(&mut image, x, 100, 180, 3);
        draw_bar(&mut image, x, 300, 380, 3);
    }
    // Only the opening bar runs through between the staves.
    draw_bar(&mut image, 100, 180, 300, 3);
    // A stray mark on staff 0 with no counterpart below.
    draw_bar(&mut image, 700, 100, 180, 3);

    let staves = vec![
        staff(100, 180, 101, 899, &[(100, 102), (500, 502), (700, 702), (898, 900)]),
        staff(300, 380, 101, 899, &[(100, 102), (500, 502), (898, 900)]),
    ];

    let glyphs = ImageGlyphs {
        image: &image,
        interline: 20,
    };
    let result = detector()
        .detect(&staves, &image.view(), &glyphs)
        .expect("retrieval");

    // One two-staff system; no repeated shifted connection, so the system
    // stays a single part.
    assert_eq!(result.systems.len(), 1);
    assert_eq!(result.systems[0].staves, vec![0, 1]);
    assert_eq!(result.systems[0].parts.len(), 1);
    assert_eq!(result.systems[0].parts[0].staves, vec![0, 1]);

    // The isolated peak at x=700 is gone, the aligned ones survive.
    assert_eq!(result.staves[0].peaks.len(), 3);
    assert!(result.staves[0]
        .peaks
        .iter()
        .all(|p| p.tags.is_set(Tag::Aligned)));

    // Staff sides snap to the outermost bars.
    assert_eq!(result.staves[0].left, 100);
    assert_eq!(result.staves[0].right, 900);

    // Three thin bar lines per staff, staff ends fall on the outer ones.
    for staff_result in &result.staves {
        assert_eq!(staff_result.bars.len(), 3);
        assert_eq!(staff_result.side_bars[0], Some(staff_result.bars[0]));
        assert_eq!(staff_result.side_bars[1], Some(staff_result.bars[2]));
    }
    let sig = &result.systems[0].sig;
    for bar in &result.staves[0].bars {
        assert_eq!(sig.inters[bar.index].kind, InterKind::Barline(BarShape::Thin));
    }

    // The connected column shows up as a connector inter.
    assert!(sig
        .inters
        .iter()
        .any(|i| i.kind == InterKind::BarConnector(BarShape::Thin) && i.staff.is_none()));
}

#[test]
fn bracket_column_is_classified_end_to_end() {
    let mut image = BinaryImage::blank(1200, 500);
    // Bracket trunk running from above staff 0 to below staff 1.
    draw_bar(&mut image, 96, 80, 400, 10);
    // Top serif hooking up-right.
    for dx in 0..15 {
        image.fill(Rect::new(106 + dx, 72 - dx, 1, 8));
    }
    // Bottom serif hooking down-right.
    for dx in 0..15 {
        image.fill(Rect::new(106 + dx, 398 + dx, 1, 8));
    }
    // One ordinary bar per staff.
    draw_bar(&mut image, 500, 100, 180, 3);
    draw_bar(&mut image, 500, 300, 380, 3);

    let staves = vec![
        staff(100, 180, 100, 900, &[(96, 105), (500, 502)]),
        staff(300, 380, 100, 900, &[(96, 105), (500, 502)]),
    ];

    let glyphs = ImageGlyphs {
        image: &image,
        interline: 20,
    };
    let result = detector()
        .detect(&staves, &image.view(), &glyphs)
        .expect("retrieval");

    assert_eq!(result.systems.len(), 1);

    let top_bracket = &result.staves[0].peaks[0];
    let bottom_bracket = &result.staves[1].peaks[0];
    assert!(top_bracket.is_bracket_end(VerticalSide::Top));
    assert!(!top_bracket.is_bracket_end(VerticalSide::Bottom));
    assert!(bottom_bracket.is_bracket_end(VerticalSide::Bottom));

    let sig = &result.systems[0].sig;
    let kinds: Vec<InterKind> = sig.inters.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&InterKind::Bracket(BracketKind::Top)));
    assert!(kinds.contains(&InterKind::Bracket(BracketKind::Bottom)));
    assert!(kinds.contains(&InterKind::BracketConnector));

    // Brackets are not bars.
    assert_eq!(result.staves[0].bars.len(), 1);
    assert_eq!(result.staves[1].bars.len(), 1);
}

#[test]
fn input_validation_is_strict() {
    let image = BinaryImage::blank(10, 10);
    let glyphs = ImageGlyphs {
        image: &image,
        interline: 20,
    };
    let det = detector();

    assert!(matches!(
        det.detect(&[], &image.view(), &glyphs),
        Err(GridBuildError::NoStaves)
    ));

    let empty = vec![staff(100, 180, 100, 900, &[])];
    assert!(matches!(
        det.detect(&empty, &image.view(), &glyphs),
        Err(GridBuildError::NoPeaks)
    ));

    // Overlapping peaks on the second staff.
    let malformed = vec![
        staff(100, 180, 100, 900, &[(100, 102)]),
        staff(300, 380, 100, 900, &[(100, 104), (103, 106)]),
    ];
    assert!(matches!(
        det.detect(&malformed, &image.view(), &glyphs),
        Err(GridBuildError::MalformedStaff { staff: 2 })
    ));
}
