//! Abstract Monogram - two overlapping letterforms with weight contrast.

use super::{accent_gradient, body_gradient, min_len, GeometryFlags, RenderContext, Rendered, CENTER};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{densify, fmt_num, tapered_stroke, CapStyle, Point};
use crate::glyphs::{primary_letter, secondary_letter, skeleton};
use crate::params::{AbstractMonogramParams, AlgorithmParameters};
use crate::seed::SeedStream;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let name = ctx.brand_name;
    let params = AbstractMonogramParams::derive(stream, primary_letter(name), secondary_letter(name));
    build(&params, seed, ctx)
}

fn letter_outlines(letter: char, origin: Point, size: f64, weight: f64, contrast: f64, tension: f64) -> Vec<String> {
    let half = min_len(weight) / 2.0;
    skeleton(letter, origin, Point::new(size, size))
        .into_iter()
        .map(|stroke| {
            let line = densify(&stroke, size / 10.0);
            let last = (line.len().max(2) - 1) as f64;
            // thick-thin: strokes swell toward their middle
            let widths: Vec<f64> = (0..line.len())
                .map(|i| {
                    let t = i as f64 / last;
                    half * (1.0 - contrast + contrast * (std::f64::consts::PI * t).sin())
                })
                .collect();
            tapered_stroke(&line, &widths, CapStyle::Round, tension * 0.3)
        })
        .collect()
}

pub fn build(p: &AbstractMonogramParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 60.0);

    let size = min_len(50.0 * base.scale);
    let offset = p.letter_offset.min(90.0 - size).max(0.0);
    let span = size + offset;
    let first = Point::new(CENTER.x - span / 2.0, CENTER.y - span / 2.0);
    let second = Point::new(first.x + offset, first.y + offset);

    let contrast = p.contrast.clamp(0.0, 0.9);
    let front = letter_outlines(p.primary_letter, first, size, p.weight, contrast, base.curve_tension);
    let back = letter_outlines(p.secondary_letter, second, size, p.weight * 0.85, contrast, base.curve_tension);

    let transform = format!("translate(50 50) skewX({}) translate(-50 -50)", fmt_num(-p.slant));
    b.group(&transform, Attrs::new(), |g| {
        g.group("", Attrs::new().opacity(p.overlap_opacity), |layer| {
            for d in &back {
                layer.path(d, Attrs::new().fill_ref(&accent));
            }
        });
        for d in &front {
            g.path(d, Attrs::new().fill_ref(&body));
        }
    });

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            letter_based: true,
            layered: true,
            symmetric: false,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::AbstractMonogram(p.clone()),
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
    fn test_letters_from_name() {
        let palette = Palette::resolve("#3b82f6", None);
        let r = render(&mut create_stream("m"), "m", &ctx(&palette, "Blue Ocean"));
        match r.params {
            AlgorithmParameters::AbstractMonogram(p) => {
                assert_eq!(p.primary_letter, 'B');
                assert_eq!(p.secondary_letter, 'O');
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_non_alphabetic_name_falls_back() {
        let palette = Palette::resolve("#000000", None);
        let r = render(&mut create_stream("digits"), "digits", &ctx(&palette, "1234"));
        match r.params {
            AlgorithmParameters::AbstractMonogram(p) => {
                assert_eq!((p.primary_letter, p.secondary_letter), ('A', 'A'));
            }
            other => panic!("unexpected params {:?}", other),
        }
        assert!(r.svg.contains("<path"));
    }

    #[test]
    fn test_back_letter_is_translucent() {
        let palette = Palette::resolve("#3b82f6", None);
        let r = render(&mut create_stream("alpha"), "alpha", &ctx(&palette, "Kite"));
        assert!(r.svg.contains("<g opacity="));
        assert!(r.svg.contains("skewX("));
    }
}
