//! Swoosh - crescent strokes sweeping around the center, with an optional
//! sparkle at the leading tip.

use super::{
    accent_gradient, at_least_one, body_gradient, fit_within, layer_tone, min_len, tone_gradient,
    GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::color;
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{
    arc_points, circle_path, smooth_closed_path, star_points, tapered_stroke, CapStyle, Point,
};
use crate::params::{AlgorithmParameters, SwooshParams};
use crate::seed::SeedStream;

/// Largest distance any swoosh point may sit from the center.
const MAX_REACH: f64 = 42.0;
const ARC_STEPS: usize = 18;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = SwooshParams::derive(stream);
    build(&params, seed, ctx)
}

/// Centerline and crescent half-widths of swoosh `j`, rotated into place.
fn swoosh_geometry(p: &SwooshParams, j: u32) -> (Vec<Point>, Vec<f64>) {
    let base = &p.base;
    let rx = min_len(p.arc_radius * base.scale * (1.0 - 0.18 * j as f64));
    let ry = min_len(rx * p.flatten.clamp(0.1, 1.0));
    let start = p.start_angle + 40.0 * j as f64;
    let sweep = p.sweep.clamp(30.0, 330.0);

    let mut line = arc_points(CENTER, rx, ry, 0.0, sweep, ARC_STEPS);
    for pt in line.iter_mut() {
        *pt = pt.rotate_around(CENTER, start);
    }
    fit_within(&mut line, CENTER, MAX_REACH);

    let half = min_len(p.thickness * base.scale * (1.0 - 0.2 * j as f64)) / 2.0;
    let last = (line.len().max(2) - 1) as f64;
    let widths = (0..line.len())
        .map(|i| half * (std::f64::consts::PI * i as f64 / last).sin().max(0.05))
        .collect();
    (line, widths)
}

pub fn build(p: &SwooshParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 120.0);
    let count = at_least_one(p.swoosh_count);

    let mut tip = CENTER;
    for j in 0..count {
        let (line, widths) = swoosh_geometry(p, j);
        if j == 0 {
            tip = line.last().copied().unwrap_or(CENTER);
        }
        let fill = if j == 0 {
            body.clone()
        } else {
            let tone = layer_tone(palette, j as f64 / count as f64);
            tone_gradient(&mut b, &color::lighten(&tone, 0.2), &tone, p.start_angle + 40.0 * j as f64)
        };
        let d = tapered_stroke(&line, &widths, CapStyle::Pointed, base.curve_tension);
        b.path(&d, Attrs::new().fill_ref(&fill).opacity(1.0 - base.opacity_falloff * j as f64));
    }

    if p.sparkle {
        let outer = min_len(p.sparkle_size * base.scale) / 2.0;
        let mut pts = star_points(tip, outer, outer * 0.32, p.sparkle_tips, base.rotation);
        fit_within(&mut pts, CENTER, 47.0);
        b.path(&smooth_closed_path(&pts, 0.15), Attrs::new().fill_ref(&accent));
    } else {
        let r = min_len(p.thickness * base.scale * 0.45);
        b.path(&circle_path(tip, r), Attrs::new().fill_ref(&accent));
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            layered: count > 1,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::Swoosh(p.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::params::CategoryBias;
    use crate::seed::create_stream;

    fn ctx(palette: &Palette) -> RenderContext<'_> {
        RenderContext { brand_name: "Acme", palette, bias: CategoryBias::default() }
    }

    #[test]
    fn test_one_path_per_swoosh_plus_accent() {
        let palette = Palette::resolve("#3b82f6", None);
        for sparkle in [true, false] {
            let mut p = SwooshParams::derive(&mut create_stream("count"));
            p.swoosh_count = 3;
            p.sparkle = sparkle;
            let r = build(&p, "count", &ctx(&palette));
            assert_eq!(r.svg.matches("<path").count(), 4);
        }
    }

    #[test]
    fn test_crescent_thins_at_ends() {
        let p = SwooshParams::derive(&mut create_stream("crescent"));
        let (_, widths) = swoosh_geometry(&p, 0);
        let mid = widths[widths.len() / 2];
        assert!(widths[0] < mid);
        assert!(widths[widths.len() - 1] < mid);
    }

    #[test]
    fn test_swooshes_within_reach() {
        for i in 0..20 {
            let p = SwooshParams::derive(&mut create_stream(&format!("reach-{}", i)));
            for j in 0..p.swoosh_count {
                let (line, _) = swoosh_geometry(&p, j);
                assert!(line.iter().all(|pt| pt.distance(CENTER) <= MAX_REACH + 1e-9));
            }
        }
    }

    #[test]
    fn test_zero_count_clamped() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = SwooshParams::derive(&mut create_stream("zero"));
        p.swoosh_count = 0;
        p.thickness = 0.0;
        let r = build(&p, "zero", &ctx(&palette));
        assert_eq!(r.svg.matches("<path").count(), 2);
        assert!(!r.svg.contains("NaN"));
    }
}
