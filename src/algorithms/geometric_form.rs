//! Geometric Form - nested regular shapes cut into bands.
//!
//! Each nesting level is a band: the level outline plus the next level in,
//! filled even-odd so the gap between them shows through. Bands alternate
//! between body and accent paint.

use super::{
    accent_gradient, at_least_one, body_gradient, highlight_gradient, min_len, GeometryFlags,
    RenderContext, Rendered, CENTER,
};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{circle_path, regular_polygon_points, rounded_polygon_path, PathBuilder};
use crate::params::{AlgorithmParameters, GeometricFormParams, GeometricShape};
use crate::seed::SeedStream;

const OUTER_RADIUS: f64 = 44.0;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = GeometricFormParams::derive(stream, &ctx.bias);
    build(&params, seed, ctx)
}

fn outline(shape: GeometricShape, r: f64, rotation: f64, corner: f64) -> String {
    match shape.sides() {
        None => circle_path(CENTER, r),
        Some(sides) => {
            let turn = if shape == GeometricShape::Square { 45.0 } else { 0.0 };
            let pts = regular_polygon_points(CENTER, r, sides, rotation + turn);
            rounded_polygon_path(&pts, corner.min(r * 0.3))
        }
    }
}

/// Radii of every nesting level, outermost first. Each band keeps a hole.
fn level_radii(p: &GeometricFormParams) -> Vec<f64> {
    let n = at_least_one(p.nested_count).min(6);
    let inset = p.inset_ratio.clamp(0.2, 0.95);
    let outer = min_len(OUTER_RADIUS * p.base.scale);
    (0..n).map(|k| min_len(outer * inset.powi(k as i32))).collect()
}

pub fn build(p: &GeometricFormParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 180.0);
    let radii = level_radii(p);
    let band = base.inner_ratio.clamp(0.3, 0.9);

    for (k, r) in radii.iter().copied().enumerate() {
        let rotation = p.inner_rotation * k as f64;
        let mut pb = PathBuilder::new();
        pb.append(&outline(p.shape, r, rotation, base.corner_radius));
        pb.append(&outline(p.shape, r * (1.0 - (1.0 - band) * 0.5), rotation, base.corner_radius));
        let fill = if k % 2 == 0 { &body } else { &accent };
        b.path(&pb.finish(), Attrs::new().fill_ref(fill).even_odd());
    }

    let innermost = radii.last().copied().unwrap_or(OUTER_RADIUS);
    let outermost = radii.first().copied().unwrap_or(OUTER_RADIUS);
    for i in 0..p.line_accents.min(8) {
        let a = base.rotation + 360.0 * i as f64 / p.line_accents.max(1) as f64;
        let from = CENTER.polar(innermost * 0.4, a);
        let to = CENTER.polar(outermost * 0.98, a);
        let stroke = Attrs::new().stroke(&palette.dark, min_len(base.stroke_width) * 0.4).opacity(0.6);
        b.line(from.x, from.y, to.x, to.y, stroke);
    }

    if p.accent_dot {
        let dot = min_len(innermost * 0.35);
        b.path(&circle_path(CENTER, dot), Attrs::new().fill_ref(&accent));
    }

    if base.use_highlight {
        let sheen = highlight_gradient(&mut b, base);
        b.path(&outline(p.shape, outermost, 0.0, base.corner_radius), Attrs::new().fill_ref(&sheen));
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            even_odd: true,
            layered: radii.len() > 1,
            symmetric: p.line_accents == 0 || p.shape == GeometricShape::Circle,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::GeometricForm(p.clone()),
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

    fn plain(shape: GeometricShape, nested: u32) -> GeometricFormParams {
        let mut p = GeometricFormParams::derive(&mut create_stream("plain"), &CategoryBias::default());
        p.shape = shape;
        p.nested_count = nested;
        p.accent_dot = false;
        p.line_accents = 0;
        p.base.use_highlight = false;
        p
    }

    #[test]
    fn test_one_band_per_level() {
        let palette = Palette::resolve("#3b82f6", None);
        let r = build(&plain(GeometricShape::Hexagon, 3), "bands", &ctx(&palette));
        assert_eq!(r.svg.matches("<path").count(), 3);
        assert_eq!(r.svg.matches("evenodd").count(), 3);
    }

    #[test]
    fn test_levels_shrink() {
        let radii = level_radii(&plain(GeometricShape::Circle, 4));
        assert!(radii.windows(2).all(|w| w[1] < w[0]));
        assert!(radii[0] <= OUTER_RADIUS);
    }

    #[test]
    fn test_accents() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = plain(GeometricShape::Triangle, 1);
        p.line_accents = 3;
        p.accent_dot = true;
        let r = build(&p, "accents", &ctx(&palette));
        assert_eq!(r.svg.matches("<line ").count(), 3);
        assert_eq!(r.svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_every_shape_closes() {
        for shape in [
            GeometricShape::Circle,
            GeometricShape::Triangle,
            GeometricShape::Square,
            GeometricShape::Pentagon,
            GeometricShape::Hexagon,
            GeometricShape::Octagon,
            GeometricShape::Diamond,
        ] {
            let d = outline(shape, 30.0, 10.0, 3.0);
            assert!(d.starts_with('M') && d.ends_with('Z'), "{:?}", shape);
        }
    }
}
