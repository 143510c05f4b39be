//! Monogram Blend - the brand initial set inside a badge, crossed by a
//! translucent accent ribbon.

use super::{
    accent_gradient, body_gradient, highlight_gradient, letterform_cutout::glyph_paths, min_len,
    tone_gradient, GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::color;
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{arc_points, circle_path, rounded_rect_path, tapered_stroke, CapStyle};
use crate::glyphs::primary_letter;
use crate::params::{AlgorithmParameters, BadgeShape, MonogramBlendParams};
use crate::seed::SeedStream;

const BADGE_RADIUS: f64 = 42.0;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = MonogramBlendParams::derive(stream, &ctx.bias, primary_letter(ctx.brand_name));
    build(&params, seed, ctx)
}

fn badge_path(shape: BadgeShape, r: f64) -> Option<String> {
    match shape {
        BadgeShape::Circle => Some(circle_path(CENTER, r)),
        BadgeShape::Squircle => Some(rounded_rect_path(CENTER.x - r, CENTER.y - r, r * 2.0, r * 2.0, r * 0.45)),
        BadgeShape::Open => None,
    }
}

pub fn build(p: &MonogramBlendParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 90.0);

    let r = min_len(BADGE_RADIUS * base.scale);
    let badge = badge_path(p.badge, r);
    // the glyph reads light on a filled badge, in body paint when open
    let glyph_fill = match &badge {
        Some(d) => {
            b.path(d, Attrs::new().fill_ref(&body));
            tone_gradient(&mut b, &palette.light, &color::lighten(&palette.light, 0.3), base.gradient_angle)
        }
        None => body.clone(),
    };

    let glyph_box = r * 1.15;
    let glyphs = glyph_paths(p.letter, glyph_box, p.stroke_weight, base.weight_contrast, base.curve_tension);
    for d in &glyphs {
        b.path(d, Attrs::new().fill_ref(&glyph_fill));
    }

    // ribbon crosses the lower half of the badge
    let sweep = p.ribbon_sweep.clamp(10.0, 180.0);
    let start = 90.0 - sweep / 2.0;
    let line: Vec<_> = arc_points(CENTER, r * 0.82, r * 0.82, start, start + sweep, 16)
        .into_iter()
        .map(|q| q.rotate_around(CENTER, p.ribbon_angle))
        .collect();
    let half = min_len(p.ribbon_thickness * base.scale) / 2.0;
    let last = (line.len().max(2) - 1) as f64;
    let widths: Vec<f64> = (0..line.len())
        .map(|i| half * (0.35 + 0.65 * (std::f64::consts::PI * i as f64 / last).sin()))
        .collect();
    let ribbon = tapered_stroke(&line, &widths, CapStyle::Pointed, base.curve_tension);
    b.path(&ribbon, Attrs::new().fill_ref(&accent).opacity(p.blend_opacity.clamp(0.1, 1.0)));

    if base.use_highlight {
        if let Some(d) = &badge {
            let sheen = highlight_gradient(&mut b, base);
            b.path(d, Attrs::new().fill_ref(&sheen));
        }
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            letter_based: true,
            layered: true,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::MonogramBlend(p.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::params::CategoryBias;
    use crate::seed::create_stream;

    fn ctx<'a>(palette: &'a Palette, name: &'a str) -> RenderContext<'a> {
        RenderContext { brand_name: name, palette, bias: CategoryBias::default() }
    }

    #[test]
    fn test_letter_from_name() {
        let palette = Palette::resolve("#3b82f6", None);
        let r = render(&mut create_stream("letter"), "letter", &ctx(&palette, "zenith labs"));
        match r.params {
            AlgorithmParameters::MonogramBlend(p) => assert_eq!(p.letter, 'Z'),
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_badge_shapes() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = MonogramBlendParams::derive(&mut create_stream("badge"), &CategoryBias::default(), 'T');
        p.base.use_highlight = false;
        // 'T' has two strokes, plus the ribbon
        p.badge = BadgeShape::Open;
        let open = build(&p, "badge", &ctx(&palette, "Tide"));
        assert_eq!(open.svg.matches("<path").count(), 3);

        p.badge = BadgeShape::Circle;
        let filled = build(&p, "badge", &ctx(&palette, "Tide"));
        assert_eq!(filled.svg.matches("<path").count(), 4);
        assert!(filled.geometry.gradient_count >= 3);
    }

    #[test]
    fn test_ribbon_is_translucent() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = MonogramBlendParams::derive(&mut create_stream("ribbon"), &CategoryBias::default(), 'R');
        p.blend_opacity = 0.6;
        let r = build(&p, "ribbon", &ctx(&palette, "Rook"));
        assert!(r.svg.contains("opacity=\"0.6\""));
    }
}
