//! Abstract Mark - an organic lobed blob shaped by fractal noise, with an
//! optional eye cut through it and an orbiting dot.

use super::{
    accent_gradient, at_least_one, body_gradient, fit_within, highlight_gradient, min_len,
    GeometryFlags, RenderContext, Rendered, CENTER,
};
use crate::document::{Attrs, Canvas, SvgBuilder};
use crate::geometry::{circle_path, smooth_closed_path, PathBuilder, Point};
use crate::noise::fbm;
use crate::params::{AbstractMarkParams, AlgorithmParameters};
use crate::seed::SeedStream;

const MAX_RADIUS: f64 = 44.0;
const SAMPLES_PER_LOBE: u32 = 6;

pub fn render(stream: &mut SeedStream, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let params = AbstractMarkParams::derive(stream, &ctx.bias);
    build(&params, seed, ctx)
}

/// Outline samples of the blob, already fitted to the canvas.
fn blob_points(p: &AbstractMarkParams, seed: &str) -> Vec<Point> {
    let base = &p.base;
    let lobes = at_least_one(p.lobe_count);
    let n = (lobes * SAMPLES_PER_LOBE).max(12);
    let r = min_len(p.blob_radius * base.scale);
    let wobble = p.wobble.clamp(0.0, 0.6);

    let mut pts: Vec<Point> = (0..n)
        .map(|i| {
            let a = base.rotation + 360.0 * i as f64 / n as f64;
            let rad = a.to_radians();
            // lobes from a cosine, irregularity from noise sampled on a circle
            let lobe = (rad * lobes as f64).cos() * wobble;
            let grain = fbm(
                rad.cos() * base.noise_scale + 7.0,
                rad.sin() * base.noise_scale + 7.0,
                seed,
                p.noise_octaves.max(1),
            );
            CENTER.polar(r * (1.0 + lobe + grain * wobble), a)
        })
        .collect();
    fit_within(&mut pts, CENTER, MAX_RADIUS);
    if base.mirror {
        for q in pts.iter_mut() {
            q.x = 2.0 * CENTER.x - q.x;
        }
    }
    pts
}

pub fn build(p: &AbstractMarkParams, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let base = &p.base;
    let palette = ctx.palette;
    let mut b = SvgBuilder::new();
    let body = body_gradient(&mut b, palette, base);
    let accent = accent_gradient(&mut b, palette, base.gradient_angle + 150.0);

    let pts = blob_points(p, seed);
    let outline = smooth_closed_path(&pts, base.curve_tension.max(0.5));
    let nearest = pts.iter().map(|q| q.distance(CENTER)).fold(f64::INFINITY, f64::min);
    let eye = if p.eye_radius > 0.0 {
        Some(p.eye_radius.min(nearest * 0.45).max(1.0))
    } else {
        None
    };
    let eye_center = CENTER.polar(nearest * 0.2 * base.asymmetry.min(1.0), base.rotation + 45.0);

    match eye {
        Some(er) => {
            let mut pb = PathBuilder::new();
            pb.append(&outline).append(&circle_path(eye_center, er));
            b.path(&pb.finish(), Attrs::new().fill_ref(&body).even_odd());
        }
        None => {
            b.path(&outline, Attrs::new().fill_ref(&body));
        }
    }

    if base.use_highlight {
        let sheen = highlight_gradient(&mut b, base);
        let mut inner = pts.clone();
        for q in inner.iter_mut() {
            *q = CENTER + (*q - CENTER) * 0.6 + Point::new(-4.0, -4.0);
        }
        b.path(&smooth_closed_path(&inner, base.curve_tension.max(0.5)), Attrs::new().fill_ref(&sheen));
    }

    let far = pts.iter().map(|q| q.distance(CENTER)).fold(0.0_f64, f64::max);
    let orbit_r = min_len(p.orbit_radius * base.scale);
    if p.orbit {
        let dist = (far + orbit_r * 0.4 + base.spacing * 0.5).min(50.0 - orbit_r - 1.0);
        let at = CENTER.polar(dist, p.orbit_angle);
        b.path(&circle_path(at, orbit_r), Attrs::new().fill_ref(&accent));
    } else if let Some(er) = eye {
        b.path(&circle_path(eye_center, er * 0.45), Attrs::new().fill_ref(&accent));
    } else {
        b.path(&circle_path(CENTER, orbit_r * 0.6), Attrs::new().fill_ref(&accent).opacity(0.85));
    }

    Rendered {
        svg: b.build(),
        geometry: GeometryFlags {
            even_odd: eye.is_some(),
            layered: base.use_highlight,
            gradient_count: b.gradient_count(),
            ..Default::default()
        },
        params: AlgorithmParameters::AbstractMark(p.clone()),
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
    fn test_blob_fits_canvas() {
        for i in 0..20 {
            let seed = format!("blob-{}", i);
            let p = AbstractMarkParams::derive(&mut create_stream(&seed), &CategoryBias::default());
            let pts = blob_points(&p, &seed);
            assert!(pts.iter().all(|q| q.distance(CENTER) <= MAX_RADIUS + 1e-9));
            assert!(pts.len() >= 12);
        }
    }

    #[test]
    fn test_eye_is_a_hole() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = AbstractMarkParams::derive(&mut create_stream("eye"), &CategoryBias::default());
        p.eye_radius = 8.0;
        let r = build(&p, "eye", &ctx(&palette));
        assert!(r.geometry.even_odd);
        assert!(r.svg.contains("evenodd"));

        p.eye_radius = 0.0;
        let r = build(&p, "eye", &ctx(&palette));
        assert!(!r.geometry.even_odd);
    }

    #[test]
    fn test_mirror_reflects_outline() {
        let mut p = AbstractMarkParams::derive(&mut create_stream("mirror"), &CategoryBias::default());
        p.base.mirror = false;
        let plain = blob_points(&p, "mirror");
        p.base.mirror = true;
        let flipped = blob_points(&p, "mirror");
        for (a, b) in plain.iter().zip(&flipped) {
            assert!((a.x + b.x - 100.0).abs() < 1e-9);
            assert_eq!(a.y, b.y);
        }
    }

    #[test]
    fn test_spacing_pushes_orbit_out() {
        let palette = Palette::resolve("#3b82f6", None);
        let mut p = AbstractMarkParams::derive(&mut create_stream("orbit"), &CategoryBias::default());
        p.orbit = true;
        p.blob_radius = 20.0;
        p.wobble = 0.05;
        p.orbit_radius = 4.0;
        p.base.scale = 0.75;
        p.base.spacing = 2.0;
        let near = build(&p, "orbit", &ctx(&palette));
        p.base.spacing = 8.0;
        let far = build(&p, "orbit", &ctx(&palette));
        assert_ne!(near.svg, far.svg);
    }

    #[test]
    fn test_noise_seed_changes_outline() {
        let p = AbstractMarkParams::derive(&mut create_stream("same"), &CategoryBias::default());
        assert_ne!(blob_points(&p, "one"), blob_points(&p, "two"));
    }
}
