//! Parallel Bars - skewed bars or tapered lines stacked in a block.

use super::{
    accent_gradient, at_least_one, body_gradient, min_len, GeometryFlags, RenderContext, Rendered,
};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{rounded_parallelogram_path, tapered_stroke, CapStyle, Point};
use crate::noise::noise2d;
use crate::params::{AlgorithmParameters, BarStyle, ParallelBarsParams};
use crate::seed::SeedStream;

/// Vertical room the stack may occupy.
const MAX_STACK: f64 = 70.0;
const FULL_WIDTH: f64 = 64.0;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = ParallelBarsParams::derive(stream);
    build(&params, seed, ctx)
}

/// One bar's box: (x, y, width, height).
fn layout(p: &ParallelBarsParams, seed: &str) -> Vec<(f64, f64, f64, f64)> {
    let n = at_least_one(p.bar_count);
    let mut thick = min_len(p.bar_thickness);
    let mut gap = p.bar_gap.max(0.0);
    let total = n as f64 * thick + (n - 1) as f64 * gap;
    if total > MAX_STACK {
        let k = MAX_STACK / total;
        thick *= k;
        gap *= k;
    }
    let total = n as f64 * thick + (n - 1) as f64 * gap;
    let top = 50.0 - total / 2.0;

    (0..n)
        .map(|i| {
            let rank = if p.ascending { n - 1 - i } else { i };
            let shrink = if n > 1 { p.stagger * rank as f64 / (n - 1) as f64 } else { 0.0 };
            let w = min_len(FULL_WIDTH * p.base.scale * (1.0 - shrink));
            let wander = noise2d(i as f64 + 0.5, 0.5, seed) * p.base.jitter * 4.0;
            let x = 50.0 - w / 2.0 + p.base.balance * 20.0 + wander;
            let y = top + i as f64 * (thick + gap);
            (x, y, w, thick)
        })
        .collect()
}

pub fn build(p: &ParallelBarsParams, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 180.0);
    let boxes = layout(p, seed);

    // snap the block to 45 degree steps so the bars stay legible
    let turn = ((base.rotation / 45.0).round() * 45.0) % 180.0;
    let transform = if turn == 0.0 { String::new() } else { format!("rotate({} 50 50)", turn) };

    b.group(&transform, Attrs::new(), |g| {
        for (i, (x, y, w, h)) in boxes.iter().copied().enumerate() {
            let fill = if i % 2 == 0 { &body } else { &accent };
            let d = match p.style {
                BarStyle::Bars => {
                    let radius = if p.rounded { h / 2.0 } else { base.corner_radius.min(h / 2.0) };
                    rounded_parallelogram_path(x, y, w, h, p.bar_skew, radius)
                }
                BarStyle::Lines => {
                    let shift = p.bar_skew.to_radians().tan() * h / 2.0;
                    let mid = y + h / 2.0;
                    let line = [
                        Point::new(x + shift, mid),
                        Point::new(x + w / 2.0 + shift, mid),
                        Point::new(x + w + shift, mid),
                    ];
                    let hw = h / 2.0;
                    let widths = [hw, hw * (0.5 + base.taper / 2.0), hw * base.taper];
                    let cap = if p.rounded { CapStyle::Round } else { CapStyle::Square };
                    tapered_stroke(&line, &widths, cap, base.curve_tension)
                }
            };
            g.path(&d, Attrs::new().fill_ref(fill));
        }
    });

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            layered: true,
            symmetric: p.stagger < 0.05 && p.bar_skew.abs() < 1.0,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::ParallelBars(p.clone()),
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
    fn test_stack_fits_canvas() {
        let mut p = ParallelBarsParams::derive(&mut create_stream("stack"));
        p.bar_count = 6;
        p.bar_thickness = 14.0;
        p.bar_gap = 7.0;
        let boxes = layout(&p, "stack");
        let first = boxes.first().map(|b| b.1).unwrap_or_default();
        let last = boxes.last().map(|b| b.1 + b.3).unwrap_or_default();
        assert!(last - first <= MAX_STACK + 1e-9);
        assert!(first >= 15.0 - 1e-9);
    }

    #[test]
    fn test_one_path_per_bar() {
        let palette = Palette::resolve("#3b82f6", None);
        for style in [BarStyle::Bars, BarStyle::Lines] {
            let mut p = ParallelBarsParams::derive(&mut create_stream("count"));
            p.bar_count = 4;
            p.style = style;
            let r = build(&p, "count", &ctx(&palette));
            assert_eq!(r.svg.matches("<path").count(), 4);
        }
    }

    #[test]
    fn test_stagger_orders_widths() {
        let mut p = ParallelBarsParams::derive(&mut create_stream("stagger"));
        p.bar_count = 3;
        p.stagger = 0.3;
        p.ascending = false;
        let widths: Vec<f64> = layout(&p, "stagger").iter().map(|b| b.2).collect();
        assert!(widths[0] > widths[1] && widths[1] > widths[2]);
        p.ascending = true;
        let widths: Vec<f64> = layout(&p, "stagger").iter().map(|b| b.2).collect();
        assert!(widths[0] < widths[2]);
    }

    #[test]
    fn test_jitter_shifts_bars() {
        let mut p = ParallelBarsParams::derive(&mut create_stream("jitter"));
        p.bar_count = 4;
        p.stagger = 0.0;
        p.base.jitter = 0.0;
        let still: Vec<f64> = layout(&p, "jitter").iter().map(|b| b.0).collect();
        assert!(still.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));

        p.base.jitter = 1.5;
        let moved: Vec<f64> = layout(&p, "jitter").iter().map(|b| b.0).collect();
        assert_ne!(still, moved);
        assert!(moved.iter().zip(&still).all(|(m, s)| (m - s).abs() <= 1.5 * 4.0));
    }

    #[test]
    fn test_zero_bars_clamped() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = ParallelBarsParams::derive(&mut create_stream("zero"));
        p.bar_count = 0;
        p.bar_thickness = 0.0;
        let r = build(&p, "zero", &ctx(&palette));
        assert_eq!(r.svg.matches("<path").count(), 1);
    }
}
