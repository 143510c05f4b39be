//! Noise - Smooth 2D Variation
//!
//! Gradient noise on an integer lattice. Each lattice point draws its
//! gradient from a stream seeded with `"{seed}:{ix},{iy}"`, so the field is a
//! pure function of its inputs.

use crate::seed::create_stream;
use std::f64::consts::TAU;

fn lattice_gradient(ix: i64, iy: i64, seed: &str) -> (f64, f64) {
    let mut stream = create_stream(&format!("{}:{},{}", seed, ix, iy));
    let angle = stream.next_f64() * TAU;
    (angle.cos(), angle.sin())
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Gradient noise at (x, y). Output roughly in [-0.71, 0.71].
pub fn noise2d(x: f64, y: f64, seed: &str) -> f64 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let (ix, iy) = (x0 as i64, y0 as i64);
    let (fx, fy) = (x - x0, y - y0);

    let corner = |cx: i64, cy: i64, dx: f64, dy: f64| {
        let (gx, gy) = lattice_gradient(cx, cy, seed);
        gx * dx + gy * dy
    };

    let n00 = corner(ix, iy, fx, fy);
    // coordinates saturate at the i64 edges; neighbours wrap instead of overflowing
    let (jx, jy) = (ix.wrapping_add(1), iy.wrapping_add(1));
    let n10 = corner(jx, iy, fx - 1.0, fy);
    let n01 = corner(ix, jy, fx, fy - 1.0);
    let n11 = corner(jx, jy, fx - 1.0, fy - 1.0);

    let u = smoothstep(fx);
    let v = smoothstep(fy);
    lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
}

/// Fractal sum of `noise2d` octaves, normalized by total amplitude.
pub fn fbm(x: f64, y: f64, seed: &str, octaves: u32) -> f64 {
    let octaves = octaves.max(1);
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut norm = 0.0;

    for _ in 0..octaves {
        total += noise2d(x * frequency, y * frequency, seed) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / norm
}
