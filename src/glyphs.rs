//! Glyph Skeletons - Stroke Centerlines for A-Z
//!
//! Each letter is a handful of strokes in a unit box (x right, y down).
//! Letter-based generators offset these centerlines into tapered outlines.
//! Names with no usable ASCII letter fall back to `'A'`.

use crate::geometry::{arc_points, Point};

/// Letter used when a name has no ASCII letter.
pub const FALLBACK_LETTER: char = 'A';

#[derive(Debug, Clone, Copy)]
enum Stroke {
    Poly(&'static [(f64, f64)]),
    /// Elliptical arc: center, radii, start and end angle in degrees.
    Arc((f64, f64), (f64, f64), f64, f64),
}

use Stroke::{Arc, Poly};

const BOWL_TOP: Stroke = Arc((0.5, 0.27), (0.32, 0.27), -90.0, 90.0);
const STEM_LEFT: Stroke = Poly(&[(0.15, 0.0), (0.15, 1.0)]);
const O_RING: Stroke = Arc((0.5, 0.5), (0.4, 0.5), 0.0, 360.0);

fn strokes(letter: char) -> &'static [Stroke] {
    match letter {
        'A' => &[Poly(&[(0.1, 1.0), (0.5, 0.0), (0.9, 1.0)]), Poly(&[(0.27, 0.62), (0.73, 0.62)])],
        'B' => &[
            STEM_LEFT,
            Poly(&[(0.15, 0.0), (0.5, 0.0)]),
            Arc((0.5, 0.25), (0.28, 0.25), -90.0, 90.0),
            Poly(&[(0.5, 0.5), (0.15, 0.5)]),
            Arc((0.52, 0.75), (0.32, 0.25), -90.0, 90.0),
            Poly(&[(0.52, 1.0), (0.15, 1.0)]),
        ],
        'C' => &[Arc((0.55, 0.5), (0.42, 0.5), -45.0, -315.0)],
        'D' => &[
            STEM_LEFT,
            Poly(&[(0.15, 0.0), (0.45, 0.0)]),
            Arc((0.45, 0.5), (0.42, 0.5), -90.0, 90.0),
            Poly(&[(0.45, 1.0), (0.15, 1.0)]),
        ],
        'E' => &[
            Poly(&[(0.8, 0.0), (0.15, 0.0), (0.15, 1.0), (0.8, 1.0)]),
            Poly(&[(0.15, 0.5), (0.65, 0.5)]),
        ],
        'F' => &[Poly(&[(0.8, 0.0), (0.15, 0.0), (0.15, 1.0)]), Poly(&[(0.15, 0.5), (0.65, 0.5)])],
        'G' => &[
            Arc((0.55, 0.5), (0.42, 0.5), -40.0, -360.0),
            Poly(&[(0.97, 0.5), (0.97, 0.75)]),
            Poly(&[(0.97, 0.52), (0.6, 0.52)]),
        ],
        'H' => &[
            STEM_LEFT,
            Poly(&[(0.85, 0.0), (0.85, 1.0)]),
            Poly(&[(0.15, 0.5), (0.85, 0.5)]),
        ],
        'I' => &[
            Poly(&[(0.5, 0.0), (0.5, 1.0)]),
            Poly(&[(0.3, 0.0), (0.7, 0.0)]),
            Poly(&[(0.3, 1.0), (0.7, 1.0)]),
        ],
        'J' => &[Poly(&[(0.75, 0.0), (0.75, 0.7)]), Arc((0.47, 0.7), (0.28, 0.3), 0.0, 180.0)],
        'K' => &[
            STEM_LEFT,
            Poly(&[(0.85, 0.0), (0.15, 0.6)]),
            Poly(&[(0.38, 0.42), (0.85, 1.0)]),
        ],
        'L' => &[Poly(&[(0.15, 0.0), (0.15, 1.0), (0.8, 1.0)])],
        'M' => &[Poly(&[(0.1, 1.0), (0.15, 0.0), (0.5, 0.65), (0.85, 0.0), (0.9, 1.0)])],
        'N' => &[Poly(&[(0.15, 1.0), (0.15, 0.0), (0.85, 1.0), (0.85, 0.0)])],
        'O' => &[O_RING],
        'P' => &[
            Poly(&[(0.15, 1.0), (0.15, 0.0), (0.5, 0.0)]),
            BOWL_TOP,
            Poly(&[(0.5, 0.54), (0.15, 0.54)]),
        ],
        'Q' => &[O_RING, Poly(&[(0.6, 0.7), (0.92, 1.0)])],
        'R' => &[
            Poly(&[(0.15, 1.0), (0.15, 0.0), (0.5, 0.0)]),
            BOWL_TOP,
            Poly(&[(0.5, 0.54), (0.15, 0.54)]),
            Poly(&[(0.45, 0.54), (0.85, 1.0)]),
        ],
        'S' => &[
            Arc((0.5, 0.27), (0.32, 0.27), -20.0, -270.0),
            Arc((0.5, 0.73), (0.32, 0.27), -90.0, 160.0),
        ],
        'T' => &[Poly(&[(0.1, 0.0), (0.9, 0.0)]), Poly(&[(0.5, 0.0), (0.5, 1.0)])],
        'U' => &[
            Poly(&[(0.15, 0.0), (0.15, 0.6)]),
            Arc((0.5, 0.6), (0.35, 0.4), 180.0, 0.0),
            Poly(&[(0.85, 0.6), (0.85, 0.0)]),
        ],
        'V' => &[Poly(&[(0.1, 0.0), (0.5, 1.0), (0.9, 0.0)])],
        'W' => &[Poly(&[(0.05, 0.0), (0.28, 1.0), (0.5, 0.35), (0.72, 1.0), (0.95, 0.0)])],
        'X' => &[Poly(&[(0.15, 0.0), (0.85, 1.0)]), Poly(&[(0.85, 0.0), (0.15, 1.0)])],
        'Y' => &[Poly(&[(0.1, 0.0), (0.5, 0.5), (0.9, 0.0)]), Poly(&[(0.5, 0.5), (0.5, 1.0)])],
        'Z' => &[Poly(&[(0.15, 0.0), (0.85, 0.0), (0.15, 1.0), (0.85, 1.0)])],
        _ => strokes(FALLBACK_LETTER),
    }
}

/// Stroke centerlines for `letter`, mapped into the box at `origin` with
/// `size` and sampled densely enough to offset smoothly.
///
/// Anything outside `A`-`Z` (after upper-casing) renders as `'A'`.
pub fn skeleton(letter: char, origin: Point, size: Point) -> Vec<Vec<Point>> {
    let letter = normalize_letter(letter);
    let map = |(x, y): (f64, f64)| Point::new(origin.x + x * size.x, origin.y + y * size.y);
    strokes(letter)
        .iter()
        .map(|stroke| match *stroke {
            Poly(pts) => pts.iter().copied().map(map).collect(),
            Arc(c, r, start, end) => {
                let steps = (((end - start).abs() / 22.5).ceil() as usize).max(2);
                arc_points(Point::new(c.0, c.1), r.0, r.1, start, end, steps)
                    .into_iter()
                    .map(|p| map((p.x, p.y)))
                    .collect()
            }
        })
        .collect()
}

/// Upper-case ASCII letter, or the fallback.
pub fn normalize_letter(letter: char) -> char {
    let up = letter.to_ascii_uppercase();
    if up.is_ascii_uppercase() {
        up
    } else {
        FALLBACK_LETTER
    }
}

/// First ASCII letter of the name, else `'A'`.
pub fn primary_letter(name: &str) -> char {
    name.chars()
        .find(char::is_ascii_alphabetic)
        .map(normalize_letter)
        .unwrap_or(FALLBACK_LETTER)
}

/// First letter of the second word, else the second ASCII letter, else the
/// primary letter.
pub fn secondary_letter(name: &str) -> char {
    let second_word = name
        .split_whitespace()
        .nth(1)
        .and_then(|w| w.chars().find(char::is_ascii_alphabetic));
    let second_letter = || name.chars().filter(char::is_ascii_alphabetic).nth(1);
    second_word
        .or_else(second_letter)
        .map(normalize_letter)
        .unwrap_or_else(|| primary_letter(name))
}
