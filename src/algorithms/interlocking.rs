//! Interlocking Forms - rings, links, chains and weaves with true holes.
//!
//! Every loop is one path holding an outer and an inner subpath, filled with
//! the even-odd rule. The weave style redraws one crossing on top through a
//! clip path to fake an over/under pass.

use super::{
    accent_gradient, at_least_one, body_gradient, min_len, GeometryFlags, RenderContext, Rendered,
    CENTER,
};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{circle_path, ring_path, rounded_rect_path, PathBuilder, Point};
use crate::params::{AlgorithmParameters, InterlockStyle, InterlockingParams};
use crate::seed::SeedStream;

/// Largest half-extent of the composition.
const MAX_REACH: f64 = 44.0;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = InterlockingParams::derive(stream);
    build(&params, seed, ctx)
}

/// One closed loop in local coordinates before rotation.
struct Loop {
    center: Point,
    half_w: f64,
    half_h: f64,
}

impl Loop {
    fn path(&self, thickness: f64) -> String {
        let t = thickness.min(self.half_w.min(self.half_h) * 0.8);
        if (self.half_w - self.half_h).abs() < 1e-9 {
            return ring_path(self.center, self.half_w, self.half_w - t);
        }
        let outer = rounded_rect_path(
            self.center.x - self.half_w,
            self.center.y - self.half_h,
            self.half_w * 2.0,
            self.half_h * 2.0,
            self.half_w.min(self.half_h),
        );
        let (iw, ih) = (self.half_w - t, self.half_h - t);
        let inner = rounded_rect_path(
            self.center.x - iw,
            self.center.y - ih,
            iw * 2.0,
            ih * 2.0,
            iw.min(ih),
        );
        let mut pb = PathBuilder::new();
        pb.append(&outer).append(&inner);
        pb.finish()
    }
}

/// Loops for the style, centered on the canvas, unrotated.
fn loops(p: &InterlockingParams) -> Vec<Loop> {
    let n = at_least_one(p.element_count);
    let mut r = min_len(p.radius * p.base.scale);
    let step_of = |r: f64| 2.0 * r * (1.0 - p.overlap.clamp(0.0, 0.9));

    match p.style {
        InterlockStyle::Rings | InterlockStyle::Links | InterlockStyle::Chain => {
            let (hw_k, hh_k) = match p.style {
                InterlockStyle::Links => (1.25, 0.7),
                _ => (1.0, 1.0),
            };
            let reach = |r: f64| (n - 1) as f64 * step_of(r * hw_k) / 2.0 + r * hw_k;
            if reach(r) > MAX_REACH {
                r *= MAX_REACH / reach(r);
            }
            let step = step_of(r * hw_k);
            let start = CENTER.x - (n - 1) as f64 * step / 2.0;
            (0..n)
                .map(|i| {
                    let upright = p.style == InterlockStyle::Chain && i % 2 == 1;
                    let (hw, hh) = if p.style == InterlockStyle::Chain {
                        if upright { (r * 0.5, r * 0.8) } else { (r, r * 0.6) }
                    } else {
                        (r * hw_k, r * hh_k)
                    };
                    Loop {
                        center: Point::new(start + i as f64 * step, CENTER.y),
                        half_w: hw,
                        half_h: hh,
                    }
                })
                .collect()
        }
        InterlockStyle::Weave => {
            let count = n.max(3);
            let orbit = r * (1.0 - p.overlap.clamp(0.0, 0.9)) * 1.1;
            if orbit + r > MAX_REACH {
                let k = MAX_REACH / (orbit + r);
                r *= k;
            }
            let orbit = r * (1.0 - p.overlap.clamp(0.0, 0.9)) * 1.1;
            (0..count)
                .map(|i| Loop {
                    center: CENTER.polar(orbit, 360.0 * i as f64 / count as f64),
                    half_w: r,
                    half_h: r,
                })
                .collect()
        }
    }
}

pub fn build(p: &InterlockingParams, _seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 90.0);
    let items = loops(p);
    let thickness = min_len(p.thickness * base.scale);
    let rotation = if p.style == InterlockStyle::Weave { base.rotation } else { p.orientation };
    let transform = format!("rotate({} 50 50)", crate::geometry::fmt_num(rotation));

    // over/under region for the weave: a disc around the first crossing
    let clip = match (p.style, items.first(), items.last()) {
        (InterlockStyle::Weave, Some(first), Some(last)) if items.len() > 1 => {
            let crossing = first.center.lerp(last.center, 0.5);
            let reach = first.half_w * 0.9;
            Some(b.clip_path(|c| {
                c.path(&circle_path(crossing, reach), Attrs::new());
            }))
        }
        _ => None,
    };

    let fills: Vec<&String> = (0..items.len())
        .map(|i| if i % 2 == 0 { &body } else { &accent })
        .collect();
    b.group(&transform, Attrs::new(), |g| {
        for (item, fill) in items.iter().zip(&fills) {
            g.path(&item.path(thickness), Attrs::new().fill_ref(fill).even_odd());
        }
        if let (Some(clip), Some(first)) = (&clip, items.first()) {
            g.group("", Attrs::new().clip_ref(clip), |top| {
                top.path(&first.path(thickness), Attrs::new().fill_ref(&body).even_odd());
            });
        }
    });

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            even_odd: true,
            clipped: clip.is_some(),
            layered: items.len() > 1,
            symmetric: p.style != InterlockStyle::Chain,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::Interlocking(p.clone()),
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

    fn with_style(style: InterlockStyle) -> InterlockingParams {
        let mut p = InterlockingParams::derive(&mut create_stream("style"));
        p.style = style;
        p.element_count = 4;
        p.radius = 24.0;
        p.overlap = 0.25;
        p
    }

    #[test]
    fn test_every_loop_has_a_hole() {
        let palette = Palette::resolve("#3b82f6", None);
        for style in [InterlockStyle::Rings, InterlockStyle::Links, InterlockStyle::Chain] {
            let r = build(&with_style(style), "holes", &ctx(&palette));
            assert_eq!(r.svg.matches("evenodd").count(), 4, "{:?}", style);
            // outer + inner subpath per loop
            assert_eq!(r.svg.matches('M').count(), 8, "{:?}", style);
        }
    }

    #[test]
    fn test_weave_uses_clip() {
        let palette = Palette::resolve("#3b82f6", None);
        let r = build(&with_style(InterlockStyle::Weave), "weave", &ctx(&palette));
        assert!(r.svg.contains("<clipPath"));
        assert!(r.svg.contains("clip-path=\"url(#clip-2)\""));
        assert!(r.geometry.clipped);
    }

    #[test]
    fn test_loops_within_reach() {
        for style in [
            InterlockStyle::Rings,
            InterlockStyle::Links,
            InterlockStyle::Chain,
            InterlockStyle::Weave,
        ] {
            for item in loops(&with_style(style)) {
                let extent = (item.center.x - CENTER.x).abs() + item.half_w;
                assert!(extent <= MAX_REACH + 1e-6, "{:?} reach {}", style, extent);
            }
        }
    }
}
