//! Geometry Primitives - Point Lists to Path Data
//!
//! Every function here is pure: identical points and parameters always
//! produce an identical path string.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Circle control-point ratio for a four-segment cubic approximation.
pub const KAPPA: f64 = 0.552_284_749_8;

/// Smallest radius or side length any primitive will emit.
pub const MIN_EXTENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `angle_deg` on a circle of `radius` around `self`.
    pub fn polar(self, radius: f64, angle_deg: f64) -> Self {
        let a = angle_deg.to_radians();
        Self::new(self.x + radius * a.cos(), self.y + radius * a.sin())
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Unit vector, or zero for a zero-length input.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < 1e-9 {
            Self::default()
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Left-hand perpendicular.
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn lerp(self, other: Point, t: f64) -> Self {
        self + (other - self) * t
    }

    pub fn rotate_around(self, center: Point, angle_deg: f64) -> Self {
        let a = angle_deg.to_radians();
        let (s, c) = a.sin_cos();
        let d = self - center;
        Self::new(center.x + d.x * c - d.y * s, center.y + d.x * s + d.y * c)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Incremental path-data writer.
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn cmd(&mut self, letter: char, coords: &[Point]) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(letter);
        for (i, p) in coords.iter().enumerate() {
            if i > 0 {
                self.d.push(' ');
            }
            self.d.push_str(&fmt_num(p.x));
            self.d.push(' ');
            self.d.push_str(&fmt_num(p.y));
        }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.cmd('M', &[p]);
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.cmd('L', &[p]);
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> &mut Self {
        self.cmd('C', &[c1, c2, p]);
        self
    }

    pub fn quad_to(&mut self, c: Point, p: Point) -> &mut Self {
        self.cmd('Q', &[c, p]);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.cmd('Z', &[]);
        self
    }

    /// Append another subpath verbatim.
    pub fn append(&mut self, d: &str) -> &mut Self {
        if !d.is_empty() {
            if !self.d.is_empty() {
                self.d.push(' ');
            }
            self.d.push_str(d);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn finish(&self) -> String {
        self.d.clone()
    }
}

/// End cap for open tapered strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapStyle {
    Round,
    Square,
    Pointed,
}

fn catmull_controls(p0: Point, p1: Point, p2: Point, p3: Point, tension: f64) -> (Point, Point) {
    let k = tension.clamp(0.0, 1.0) / 6.0;
    (p1 + (p2 - p0) * k, p2 - (p3 - p1) * k)
}

/// Emit cubic segments through `points[1..]`, assuming the pen is at
/// `points[0]`. End tangents are clamped to the end points.
fn catmull_open_segments(pb: &mut PathBuilder, points: &[Point], tension: f64) {
    let n = points.len();
    for i in 0..n.saturating_sub(1) {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        let (c1, c2) = catmull_controls(p0, p1, p2, p3, tension);
        pb.cubic_to(c1, c2, p2);
    }
}

/// Straight closed polygon.
pub fn polygon_path(points: &[Point]) -> String {
    let mut pb = PathBuilder::new();
    if let Some((first, rest)) = points.split_first() {
        pb.move_to(*first);
        for p in rest {
            pb.line_to(*p);
        }
        pb.close();
    }
    pb.finish()
}

/// Closed smooth curve through `points` (Catmull-Rom converted to cubics).
/// `tension` 0 gives straight edges, 1 the full Catmull-Rom curve.
pub fn smooth_closed_path(points: &[Point], tension: f64) -> String {
    let n = points.len();
    if n < 3 {
        return polygon_path(points);
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        let (c1, c2) = catmull_controls(p0, p1, p2, p3, tension);
        pb.cubic_to(c1, c2, p2);
    }
    pb.close();
    pb.finish()
}

fn tangent_at(points: &[Point], i: usize) -> Point {
    let n = points.len();
    let prev = points[i.saturating_sub(1)];
    let next = points[(i + 1).min(n - 1)];
    let t = (next - prev).normalized();
    if t == Point::default() {
        Point::new(1.0, 0.0)
    } else {
        t
    }
}

fn emit_cap(pb: &mut PathBuilder, from: Point, to: Point, center: Point, dir: Point, w: f64, cap: CapStyle) {
    match cap {
        CapStyle::Round => {
            let apex = center + dir * w;
            let side = (from - center).normalized();
            pb.cubic_to(from + dir * (w * KAPPA), apex + side * (w * KAPPA), apex);
            pb.cubic_to(apex - side * (w * KAPPA), to + dir * (w * KAPPA), to);
        }
        CapStyle::Square => {
            pb.line_to(from + dir * w);
            pb.line_to(to + dir * w);
            pb.line_to(to);
        }
        CapStyle::Pointed => {
            pb.line_to(center + dir * (w * 1.5));
            pb.line_to(to);
        }
    }
}

/// Closed outline of a variable-width stroke along `centerline`.
///
/// `half_widths` is read per point (the last value repeats if it is short).
/// Edges are offset along the local tangent's perpendicular and smoothed.
pub fn tapered_stroke(centerline: &[Point], half_widths: &[f64], cap: CapStyle, tension: f64) -> String {
    let n = centerline.len();
    let width_at = |i: usize| -> f64 {
        let w = half_widths
            .get(i)
            .or_else(|| half_widths.last())
            .copied()
            .unwrap_or(MIN_EXTENT);
        if w.is_finite() {
            w.max(0.0)
        } else {
            MIN_EXTENT
        }
    };

    match n {
        0 => return String::new(),
        1 => return circle_path(centerline[0], width_at(0)),
        _ => {}
    }

    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    for i in 0..n {
        let normal = tangent_at(centerline, i).perp();
        let w = width_at(i);
        left.push(centerline[i] + normal * w);
        right.push(centerline[i] - normal * w);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(left[0]);
    catmull_open_segments(&mut pb, &left, tension);

    let end_dir = tangent_at(centerline, n - 1);
    emit_cap(&mut pb, left[n - 1], right[n - 1], centerline[n - 1], end_dir, width_at(n - 1), cap);

    right.reverse();
    catmull_open_segments(&mut pb, &right, tension);

    let start_dir = -tangent_at(centerline, 0);
    emit_cap(&mut pb, right[n - 1], left[0], centerline[0], start_dir, width_at(0), cap);
    pb.close();
    pb.finish()
}

/// Ellipse as four cubic segments, optionally rotated.
pub fn ellipse_path(center: Point, rx: f64, ry: f64, rotation_deg: f64) -> String {
    let rx = clamp_extent(rx);
    let ry = clamp_extent(ry);
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let c = center;
    let r = |p: Point| p.rotate_around(c, rotation_deg);

    let right = Point::new(c.x + rx, c.y);
    let bottom = Point::new(c.x, c.y + ry);
    let left = Point::new(c.x - rx, c.y);
    let top = Point::new(c.x, c.y - ry);

    let mut pb = PathBuilder::new();
    pb.move_to(r(right));
    pb.cubic_to(r(Point::new(right.x, right.y + ky)), r(Point::new(bottom.x + kx, bottom.y)), r(bottom));
    pb.cubic_to(r(Point::new(bottom.x - kx, bottom.y)), r(Point::new(left.x, left.y + ky)), r(left));
    pb.cubic_to(r(Point::new(left.x, left.y - ky)), r(Point::new(top.x - kx, top.y)), r(top));
    pb.cubic_to(r(Point::new(top.x + kx, top.y)), r(Point::new(right.x, right.y - ky)), r(right));
    pb.close();
    pb.finish()
}

pub fn circle_path(center: Point, radius: f64) -> String {
    ellipse_path(center, radius, radius, 0.0)
}

/// Circle traced counter to `circle_path`.
fn reversed_circle_path(c: Point, radius: f64) -> String {
    let r = clamp_extent(radius);
    let k = r * KAPPA;
    let right = Point::new(c.x + r, c.y);
    let top = Point::new(c.x, c.y - r);
    let left = Point::new(c.x - r, c.y);
    let bottom = Point::new(c.x, c.y + r);

    let mut pb = PathBuilder::new();
    pb.move_to(right);
    pb.cubic_to(Point::new(right.x, right.y - k), Point::new(top.x + k, top.y), top);
    pb.cubic_to(Point::new(top.x - k, top.y), Point::new(left.x, left.y - k), left);
    pb.cubic_to(Point::new(left.x, left.y + k), Point::new(bottom.x - k, bottom.y), bottom);
    pb.cubic_to(Point::new(bottom.x + k, bottom.y), Point::new(right.x, right.y + k), right);
    pb.close();
    pb.finish()
}

/// Annulus as two opposite-wound subpaths; the hole shows under either fill rule.
pub fn ring_path(center: Point, outer: f64, inner: f64) -> String {
    let outer = clamp_extent(outer);
    let inner = clamp_extent(inner.min(outer - MIN_EXTENT));
    let mut pb = PathBuilder::new();
    pb.append(&circle_path(center, outer));
    pb.append(&reversed_circle_path(center, inner));
    pb.finish()
}

fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() {
        v.max(MIN_EXTENT)
    } else {
        MIN_EXTENT
    }
}

/// Closed polygon with each corner replaced by a cubic fillet.
///
/// The radius at each corner is clamped to half of the shorter adjacent edge.
pub fn rounded_polygon_path(points: &[Point], radius: f64) -> String {
    let n = points.len();
    if n < 3 || radius <= 0.0 || !radius.is_finite() {
        return polygon_path(points);
    }

    let mut entries = Vec::with_capacity(n);
    let mut exits = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let r = radius
            .min(cur.distance(prev) / 2.0)
            .min(cur.distance(next) / 2.0);
        entries.push(cur + (prev - cur).normalized() * r);
        exits.push(cur + (next - cur).normalized() * r);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(exits[0]);
    for k in 1..=n {
        let i = k % n;
        let corner = points[i];
        pb.line_to(entries[i]);
        pb.cubic_to(
            entries[i].lerp(corner, KAPPA),
            exits[i].lerp(corner, KAPPA),
            exits[i],
        );
    }
    pb.close();
    pb.finish()
}

/// Rectangle corner points, clockwise from the top-left.
pub fn rect_points(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
    let w = clamp_extent(w);
    let h = clamp_extent(h);
    vec![
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ]
}

/// Rounded rectangle; `radius` is clamped to half the shorter side.
pub fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: f64) -> String {
    let w = clamp_extent(w);
    let h = clamp_extent(h);
    rounded_polygon_path(&rect_points(x, y, w, h), radius.min(w.min(h) / 2.0))
}

/// Parallelogram whose top edge is shifted right by `tan(skew) * h`.
pub fn parallelogram_points(x: f64, y: f64, w: f64, h: f64, skew_deg: f64) -> Vec<Point> {
    let w = clamp_extent(w);
    let h = clamp_extent(h);
    let shift = skew_deg.to_radians().tan() * h;
    vec![
        Point::new(x + shift, y),
        Point::new(x + w + shift, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ]
}

pub fn rounded_parallelogram_path(x: f64, y: f64, w: f64, h: f64, skew_deg: f64, radius: f64) -> String {
    let pts = parallelogram_points(x, y, w, h, skew_deg);
    rounded_polygon_path(&pts, radius.min(clamp_extent(w).min(clamp_extent(h)) / 2.0))
}

/// Vertices of a regular polygon. `sides` below 3 is raised to 3.
pub fn regular_polygon_points(center: Point, radius: f64, sides: u32, rotation_deg: f64) -> Vec<Point> {
    let sides = sides.max(3);
    let radius = clamp_extent(radius);
    (0..sides)
        .map(|i| center.polar(radius, rotation_deg - 90.0 + 360.0 * i as f64 / sides as f64))
        .collect()
}

/// Alternating outer/inner vertices of a star.
pub fn star_points(center: Point, outer: f64, inner: f64, tips: u32, rotation_deg: f64) -> Vec<Point> {
    let tips = tips.max(3);
    let outer = clamp_extent(outer);
    let inner = clamp_extent(inner.min(outer));
    (0..tips * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            center.polar(r, rotation_deg - 90.0 + 180.0 * i as f64 / tips as f64)
        })
        .collect()
}

/// Samples along an elliptical arc from `start_deg` to `end_deg`, inclusive.
pub fn arc_points(center: Point, rx: f64, ry: f64, start_deg: f64, end_deg: f64, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let a = (start_deg + (end_deg - start_deg) * i as f64 / steps as f64).to_radians();
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

/// Insert points so no segment is longer than `max_len`.
pub fn densify(points: &[Point], max_len: f64) -> Vec<Point> {
    let max_len = clamp_extent(max_len);
    let mut out = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let pieces = (a.distance(b) / max_len).ceil().max(1.0) as usize;
        for k in 0..pieces {
            out.push(a.lerp(b, k as f64 / pieces as f64));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}
