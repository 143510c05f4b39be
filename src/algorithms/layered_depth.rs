//! Layered Depth - stacked or overlapping translucent shapes.
//!
//! Depth style extrudes one shape backward along an offset vector with
//! falling opacity and a drop shadow on the front face. Overlap style fans
//! translucent copies around the center.

use super::{
    body_gradient, highlight_gradient, layer_tone, min_len, tone_gradient,
    GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::color;
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{
    circle_path, fmt_num, regular_polygon_points, rounded_polygon_path, rounded_rect_path,
    smooth_closed_path, Point,
};
use crate::noise::fbm;
use crate::params::{AlgorithmParameters, BaseParameters, DepthStyle, LayerShape, LayeredDepthParams};
use crate::seed::SeedStream;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = LayeredDepthParams::derive(stream);
    build(&params, seed, ctx)
}

fn shape_path(shape: LayerShape, center: Point, r: f64, base: &BaseParameters, seed: &str) -> String {
    let r = min_len(r);
    match shape {
        LayerShape::Circle => circle_path(center, r),
        LayerShape::Square => rounded_rect_path(
            center.x - r,
            center.y - r,
            r * 2.0,
            r * 2.0,
            base.corner_radius + r * 0.1,
        ),
        LayerShape::Hexagon => {
            rounded_polygon_path(&regular_polygon_points(center, r, 6, 30.0), base.corner_radius)
        }
        LayerShape::Blob => {
            let n = base.segment_count.max(5) as usize + 2;
            let pts: Vec<Point> = (0..n)
                .map(|i| {
                    let a = 360.0 * i as f64 / n as f64;
                    let rad = a.to_radians();
                    let wobble = fbm(rad.cos() * base.noise_scale, rad.sin() * base.noise_scale, seed, 3);
                    center.polar(r * (1.0 + wobble * 0.35), a)
                })
                .collect();
            smooth_closed_path(&pts, base.curve_tension.max(0.6))
        }
    }
}

pub fn build(p: &LayeredDepthParams, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let layers = p.layer_count.max(2);
    let size = min_len(p.size * base.scale);
    let step = p.offset_distance.max(0.0);
    let dir = Point::new(0.0, 0.0).polar(1.0, p.offset_angle);

    // total extrusion must stay on canvas
    let reach = size * 1.25 + step * (layers - 1) as f64;
    let fit = if reach > 46.0 { 46.0 / reach } else { 1.0 };
    let size = size * fit;
    let step = step * fit;

    let body = body_gradient(&mut b, palette, base);
    match p.style {
        DepthStyle::Depth => {
            let shadow = b.drop_shadow(dir.x * 1.5, dir.y * 1.5, 1.5, &palette.dark, base.shadow_opacity);
            // front face sits at the center; back layers trail behind it
            for k in (1..layers).rev() {
                let t = k as f64 / layers as f64;
                let tone = color::darken(&layer_tone(palette, t), 0.15 + 0.1 * t);
                let grad = tone_gradient(&mut b, &tone, &color::darken(&tone, 0.2), base.gradient_angle);
                let r = size * (1.0 - p.scale_step * k as f64).max(0.3);
                let opacity = (1.0 - base.opacity_falloff * k as f64).max(0.15);
                let offset = dir * (step * k as f64);
                let d = shape_path(p.shape, CENTER, r, base, seed);
                let transform = format!("translate({} {})", fmt_num(offset.x), fmt_num(offset.y));
                b.group(&transform, Attrs::new().opacity(opacity), |g| {
                    g.path(&d, Attrs::new().fill_ref(&grad));
                });
            }
            let front = shape_path(p.shape, CENTER, size, base, seed);
            b.path(&front, Attrs::new().fill_ref(&body).filter_ref(&shadow));
            if base.use_highlight {
                let sheen = highlight_gradient(&mut b, base);
                b.path(&front, Attrs::new().fill_ref(&sheen));
            }
        }
        DepthStyle::Overlap => {
            let spread = step * 1.5;
            for k in 0..layers {
                let a = p.offset_angle + 360.0 * k as f64 / layers as f64;
                let offset = Point::new(0.0, 0.0).polar(spread, a);
                let fill = if k == 0 {
                    body.clone()
                } else {
                    let tone = layer_tone(palette, k as f64 / layers as f64);
                    tone_gradient(&mut b, &color::lighten(&tone, 0.1), &tone, base.gradient_angle + 45.0 * k as f64)
                };
                let r = size * (1.0 - p.scale_step * k as f64).max(0.3) * 0.85;
                let d = shape_path(p.shape, CENTER, r, base, seed);
                let transform = format!("translate({} {})", fmt_num(offset.x), fmt_num(offset.y));
                let opacity = (0.85 - base.opacity_falloff * k as f64 * 0.5).max(0.45);
                b.group(&transform, Attrs::new().opacity(opacity), |g| {
                    g.path(&d, Attrs::new().fill_ref(&fill).set("style", "mix-blend-mode:multiply"));
                });
            }
        }
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            layered: true,
            symmetric: p.shape != LayerShape::Blob && step < 1e-6,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::LayeredDepth(p.clone()),
    }
}
