//! Radial Arms - tapered curved wedges around a center disc.

use super::{
    accent_gradient, at_least_one, body_gradient, highlight_gradient, layer_tone, min_len,
    tone_gradient, GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::color;
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{circle_path, ring_path, tapered_stroke, CapStyle, Point};
use crate::noise::fbm;
use crate::params::{AlgorithmParameters, RadialArmsParams};
use crate::seed::SeedStream;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = RadialArmsParams::derive(stream, &ctx.bias);
    build(&params, seed, ctx)
}

/// Centerline and half-widths of arm `i`.
fn arm_geometry(p: &RadialArmsParams, i: u32, seed: &str) -> (Vec<Point>, Vec<f64>) {
    let base = &p.base;
    let n = at_least_one(p.arm_count);
    let angle = p.twist + 360.0 * i as f64 / n as f64;
    let long = if p.alternate_lengths && i % 2 == 1 { 0.72 } else { 1.0 };
    let length = min_len(p.arm_length * long * base.scale);
    let start = min_len(p.center_radius * base.scale * 0.85).min(length * 0.5);
    let steps = base.segment_count.max(3) as usize + 3;

    let half_base = min_len(p.arm_base_width * base.scale) / 2.0;
    let half_tip = half_base * p.taper_ratio.clamp(0.0, 1.0);

    let mut centerline = Vec::with_capacity(steps + 1);
    let mut widths = Vec::with_capacity(steps + 1);
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        let wobble = fbm(t * base.noise_scale, i as f64 * 1.7, seed, 3);
        let bend = p.curvature * 40.0 * t * t + wobble * base.noise_amount * 20.0;
        centerline.push(CENTER.polar(start + (length - start) * t, angle + bend));
        let w = half_base + (half_tip - half_base) * t;
        widths.push(w * (1.0 + wobble * base.noise_amount));
    }
    (centerline, widths)
}

pub fn build(p: &RadialArmsParams, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let n = at_least_one(p.arm_count);
    let cap = if p.taper_ratio < 0.3 { CapStyle::Pointed } else { CapStyle::Round };

    let body = body_gradient(&mut b, palette, base);
    for i in 0..n {
        let (centerline, widths) = arm_geometry(p, i, seed);
        let angle = p.twist + 360.0 * i as f64 / n as f64;
        let tone = layer_tone(palette, if i % 2 == 0 { 0.0 } else { 0.6 });
        let grad = tone_gradient(&mut b, &color::lighten(&tone, 0.15), &color::darken(&tone, 0.2), angle);
        let mut attrs = Attrs::new().fill_ref(&grad);
        if base.outline {
            attrs = attrs.stroke(&palette.dark, base.stroke_width * 0.15);
        }
        b.path(&tapered_stroke(&centerline, &widths, cap, base.curve_tension), attrs);
    }

    let r = min_len(p.center_radius * base.scale);
    if p.center_ring {
        let ring = ring_path(CENTER, r, r * base.inner_ratio);
        b.path(&ring, Attrs::new().fill_ref(&body).even_odd());
        let dot = accent_gradient(&mut b, palette, base.gradient_angle + 90.0);
        b.path(&circle_path(CENTER, r * base.inner_ratio * 0.5), Attrs::new().fill_ref(&dot));
    } else {
        b.path(&circle_path(CENTER, r), Attrs::new().fill_ref(&body));
    }

    if base.use_highlight {
        let sheen = highlight_gradient(&mut b, base);
        b.path(&circle_path(CENTER, r), Attrs::new().fill_ref(&sheen));
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            even_odd: p.center_ring,
            symmetric: !p.alternate_lengths || n % 2 == 0,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::RadialArms(p.clone()),
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
    fn test_one_path_per_arm() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut s = create_stream("arms");
        let mut p = RadialArmsParams::derive(&mut s, &CategoryBias::default());
        p.arm_count = 7;
        p.base.use_highlight = false;
        let r = build(&p, "arms", &ctx(&palette));
        let extra = if p.center_ring { 2 } else { 1 };
        assert_eq!(r.svg.matches("<path").count(), 7 + extra);
    }

    #[test]
    fn test_zero_arms_clamped() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = RadialArmsParams::derive(&mut create_stream("zero"), &CategoryBias::default());
        p.arm_count = 0;
        p.arm_length = 0.0;
        p.center_radius = 0.0;
        let r = build(&p, "zero", &ctx(&palette));
        assert!(r.svg.contains("<path"));
        assert!(!r.svg.contains("NaN"));
    }

    #[test]
    fn test_arms_stay_on_canvas() {
        for i in 0..20 {
            let seed = format!("canvas-{}", i);
            let p = RadialArmsParams::derive(&mut create_stream(&seed), &CategoryBias::default());
            for arm in 0..p.arm_count {
                let (line, _) = arm_geometry(&p, arm, &seed);
                for pt in line {
                    assert!(pt.distance(CENTER) < 50.0);
                }
            }
        }
    }
}
