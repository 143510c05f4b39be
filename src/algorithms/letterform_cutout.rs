//! Letterform Cutout - a frame holding the brand's initial.
//!
//! Cutout style: frame ring (even-odd) plus a stroked glyph skeleton clipped
//! to the frame interior. Negative-space style: a solid frame with the glyph
//! knocked out through a luminance mask.

use super::{
    accent_gradient, body_gradient, min_len, GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{
    circle_path, densify, regular_polygon_points, rounded_polygon_path, rounded_rect_path,
    tapered_stroke, CapStyle, PathBuilder, Point,
};
use crate::glyphs::{primary_letter, skeleton};
use crate::params::{AlgorithmParameters, CutoutStyle, FrameShape, LetterformCutoutParams};
use crate::seed::SeedStream;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = LetterformCutoutParams::derive(stream, primary_letter(ctx.brand_name));
    build(&params, seed, ctx)
}

/// Frame outline with half-extent `r`.
pub(crate) fn frame_path(shape: FrameShape, r: f64, corner: f64) -> String {
    let r = min_len(r);
    match shape {
        FrameShape::Circle => circle_path(CENTER, r),
        FrameShape::RoundedSquare => {
            rounded_rect_path(CENTER.x - r, CENTER.y - r, r * 2.0, r * 2.0, r * 0.28)
        }
        FrameShape::Hexagon => {
            rounded_polygon_path(&regular_polygon_points(CENTER, r, 6, 0.0), corner.max(1.0))
        }
        FrameShape::Shield => {
            let pts = [
                Point::new(CENTER.x - r, CENTER.y - r * 0.9),
                Point::new(CENTER.x + r, CENTER.y - r * 0.9),
                Point::new(CENTER.x + r, CENTER.y + r * 0.15),
                Point::new(CENTER.x, CENTER.y + r),
                Point::new(CENTER.x - r, CENTER.y + r * 0.15),
            ];
            rounded_polygon_path(&pts, corner.max(1.0))
        }
    }
}

/// Tapered outlines for every stroke of `letter` in a square box.
pub(crate) fn glyph_paths(letter: char, box_size: f64, weight: f64, contrast: f64, tension: f64) -> Vec<String> {
    let size = min_len(box_size);
    let origin = Point::new(CENTER.x - size / 2.0, CENTER.y - size / 2.0);
    let half = min_len(weight) / 2.0;
    skeleton(letter, origin, Point::new(size, size))
        .into_iter()
        .map(|stroke| {
            let line = densify(&stroke, size / 8.0);
            let n = line.len().max(2) as f64 - 1.0;
            let widths: Vec<f64> = (0..line.len())
                .map(|i| {
                    let t = i as f64 / n;
                    half * (1.0 - contrast * (std::f64::consts::PI * t).sin() * 0.5)
                })
                .collect();
            tapered_stroke(&line, &widths, CapStyle::Square, tension * 0.3)
        })
        .collect()
}

pub fn build(p: &LetterformCutoutParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 135.0);

    let r = min_len(42.0 * base.scale);
    let thickness = p.frame_thickness.min(r * 0.5).max(0.5);
    let corner = base.corner_radius;
    let glyph_box = r * 2.0 * p.glyph_scale;
    let glyphs = glyph_paths(p.letter, glyph_box, p.glyph_weight, base.weight_contrast, base.curve_tension);

    let mut flags = GeometryFlags {
        letter_based: true,
        symmetric: matches!(p.letter, 'A' | 'H' | 'I' | 'M' | 'O' | 'T' | 'U' | 'V' | 'W' | 'X' | 'Y'),
        ..Default::default()
    };

    match p.style {
        CutoutStyle::Cutout => {
            let inner = frame_path(p.frame, r - thickness, corner);
            let mut ring = PathBuilder::new();
            ring.append(&frame_path(p.frame, r, corner)).append(&inner);
            b.path(&ring.finish(), Attrs::new().fill_ref(&body).even_odd());

            let clip = b.clip_path(|c| {
                c.path(&inner, Attrs::new());
            });
            b.group("", Attrs::new().clip_ref(&clip), |g| {
                for d in &glyphs {
                    g.path(d, Attrs::new().fill_ref(&accent));
                }
            });
            flags.even_odd = true;
            flags.clipped = true;
        }
        CutoutStyle::NegativeSpace => {
            let mask = b.mask(|m| {
                m.rect(0.0, 0.0, 100.0, 100.0, Attrs::new().fill("#ffffff"));
                for d in &glyphs {
                    m.path(d, Attrs::new().fill("#000000"));
                }
            });
            b.path(&frame_path(p.frame, r, corner), Attrs::new().fill_ref(&body).mask_ref(&mask));
            let rim = frame_path(p.frame, r, corner);
            b.path(
                &rim,
                Attrs::new()
                    .fill("none")
                    .set("stroke", format!("url(#{})", accent))
                    .num("stroke-width", (thickness * 0.25).max(0.75)),
            );
            flags.masked = true;
        }
    }

    flags.gradient_count = b.gradient_count();
    Rendered {
        svg: b.build(),
        geometry: flags,
        params: AlgorithmParameters::LetterformCutout(p.clone()),
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
    fn test_empty_name_renders_fallback_glyph() {
        let palette = Palette::resolve("#000000", None);
        let r = render(&mut create_stream("empty"), "empty", &ctx(&palette, ""));
        match &r.params {
            AlgorithmParameters::LetterformCutout(p) => assert_eq!(p.letter, 'A'),
            other => panic!("unexpected params {:?}", other),
        }
        // 'A' has two strokes
        assert!(r.svg.matches("<path").count() >= 3);
    }

    #[test]
    fn test_styles() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = LetterformCutoutParams::derive(&mut create_stream("style"), 'H');
        p.style = CutoutStyle::Cutout;
        let cut = build(&p, "style", &ctx(&palette, "Harbor"));
        assert!(cut.svg.contains("<clipPath") && cut.geometry.clipped);
        assert!(cut.svg.contains("evenodd"));

        p.style = CutoutStyle::NegativeSpace;
        let neg = build(&p, "style", &ctx(&palette, "Harbor"));
        assert!(neg.svg.contains("<mask") && neg.geometry.masked);
    }

    #[test]
    fn test_every_frame_closes() {
        for shape in [FrameShape::Circle, FrameShape::RoundedSquare, FrameShape::Hexagon, FrameShape::Shield] {
            let d = frame_path(shape, 40.0, 4.0);
            assert!(d.starts_with('M') && d.ends_with('Z'), "{:?}", shape);
            let tiny = frame_path(shape, 0.0, 0.0);
            assert!(tiny.ends_with('Z'));
        }
    }

    #[test]
    fn test_glyph_paths_per_stroke() {
        assert_eq!(glyph_paths('T', 40.0, 5.0, 0.2, 0.5).len(), 2);
        assert_eq!(glyph_paths('O', 40.0, 5.0, 0.2, 0.5).len(), 1);
    }
}
