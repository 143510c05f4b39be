//! Quality Scoring - Path Statistics Plus Parameter Heuristics
//!
//! Pure functions over a finished document and the parameters that built it.
//! Complexity dominates the composite; parameter fit and document structure
//! refine it. Every function is callable without a generator.

use serde::{Deserialize, Serialize};

use crate::params::AlgorithmParameters;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static SCORE_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_score_call_count() -> u32 {
    SCORE_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_score_call_count() {
    SCORE_CALL_COUNT.store(0, Ordering::SeqCst);
}

/// Command count at which the count term saturates.
pub const COMMAND_CEILING: f64 = 50.0;
/// Largest contribution of curve density to complexity.
pub const CURVE_BONUS: f64 = 0.3;

const COMPLEXITY_WEIGHT: f64 = 0.6;
const PARAMETER_WEIGHT: f64 = 0.3;
const STRUCTURE_WEIGHT: f64 = 0.1;

const SHAPE_TAGS: [&str; 8] = [
    "<path ", "<rect ", "<circle ", "<ellipse ", "<line ", "<polyline ", "<polygon ", "<text ",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    /// Composite in 0..=100.
    pub score: f64,
    pub complexity: f64,
    pub path_count: usize,
    pub curve_ratio: f64,
    pub parameter_score: f64,
    pub structure_score: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct PathStats {
    paths: usize,
    commands: usize,
    curves: usize,
}

/// Scan every ` d="..."` attribute for command letters.
fn path_stats(svg: &str) -> PathStats {
    let mut stats = PathStats::default();
    for chunk in svg.split(" d=\"").skip(1) {
        let data = chunk.split('"').next().unwrap_or("");
        stats.paths += 1;
        for ch in data.chars() {
            match ch.to_ascii_uppercase() {
                'C' | 'S' | 'Q' | 'T' => {
                    stats.commands += 1;
                    stats.curves += 1;
                }
                'M' | 'L' | 'H' | 'V' | 'A' | 'Z' => stats.commands += 1,
                _ => {}
            }
        }
    }
    stats
}

fn complexity_of(stats: PathStats) -> f64 {
    if stats.commands == 0 {
        return 0.0;
    }
    let count = (stats.commands as f64 / COMMAND_CEILING).min(1.0);
    let density = (stats.curves as f64 / stats.commands as f64).min(1.0);
    (count * (1.0 - CURVE_BONUS) + density * CURVE_BONUS).clamp(0.0, 1.0)
}

/// Path complexity in [0, 1] for any input string.
pub fn calculate_complexity(svg: &str) -> f64 {
    complexity_of(path_stats(svg))
}

/// 1 inside `[lo, hi]`, falling linearly to 0 at `falloff` outside it.
fn fit(value: f64, lo: f64, hi: f64, falloff: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let gap = if value < lo {
        lo - value
    } else if value > hi {
        value - hi
    } else {
        0.0
    };
    (1.0 - gap / falloff.max(f64::EPSILON)).clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Preference-range fit of the derived parameters, in [0, 1].
pub fn parameter_score(params: &AlgorithmParameters) -> f64 {
    let base = params.base();
    let mut fits = vec![fit(base.curve_tension, 0.35, 0.7, 0.3)];
    match params {
        AlgorithmParameters::RadialArms(p) => {
            fits.push(fit(p.taper_ratio, 0.25, 0.55, 0.3));
            fits.push(fit(p.arm_count as f64, 5.0, 9.0, 3.0));
            fits.push(fit(p.curvature.abs(), 0.1, 0.6, 0.3));
        }
        AlgorithmParameters::ParallelBars(p) => {
            fits.push(fit(p.bar_count as f64, 3.0, 5.0, 2.0));
            fits.push(fit(p.bar_gap / p.bar_thickness.max(f64::EPSILON), 0.25, 0.6, 0.3));
        }
        AlgorithmParameters::Interlocking(p) => {
            fits.push(fit(p.overlap, 0.3, 0.5, 0.2));
            fits.push(fit(p.thickness / p.radius.max(f64::EPSILON), 0.15, 0.35, 0.15));
        }
        AlgorithmParameters::LetterformCutout(p) => {
            fits.push(fit(p.glyph_scale, 0.5, 0.62, 0.15));
            fits.push(fit(p.glyph_weight, 4.0, 7.0, 2.0));
        }
        AlgorithmParameters::AbstractMonogram(p) => {
            fits.push(fit(p.letter_offset, 6.0, 12.0, 4.0));
            fits.push(fit(p.slant.abs(), 0.0, 8.0, 6.0));
        }
        AlgorithmParameters::LayeredDepth(p) => {
            fits.push(fit(p.layer_count as f64, 3.0, 4.0, 2.0));
            fits.push(fit(p.offset_distance, 3.0, 6.0, 2.0));
        }
        AlgorithmParameters::Swoosh(p) => {
            fits.push(fit(p.sweep, 150.0, 230.0, 60.0));
            fits.push(fit(p.flatten, 0.55, 0.8, 0.2));
        }
        AlgorithmParameters::GeometricForm(p) => {
            fits.push(fit(p.nested_count as f64, 2.0, 3.0, 2.0));
            fits.push(fit(p.inset_ratio, 0.6, 0.75, 0.15));
        }
        AlgorithmParameters::AbstractMark(p) => {
            fits.push(fit(p.lobe_count as f64, 4.0, 6.0, 2.0));
            fits.push(fit(p.wobble, 0.1, 0.22, 0.12));
        }
        AlgorithmParameters::MonogramBlend(p) => {
            fits.push(fit(p.stroke_weight, 4.0, 6.0, 2.0));
            fits.push(fit(p.blend_opacity, 0.6, 0.85, 0.3));
        }
    }
    mean(&fits)
}

/// Half for carrying a gradient, half for a sane element count.
fn structure_score(svg: &str) -> f64 {
    let gradient = if svg.contains("Gradient id=") { 0.5 } else { 0.0 };
    let elements: usize = SHAPE_TAGS.iter().map(|t| svg.matches(t).count()).sum();
    let count = if (2..=40).contains(&elements) { 0.5 } else { 0.0 };
    gradient + count
}

/// Composite 0..=100 score; complexity carries most of the weight.
pub fn calculate_quality_score(svg: &str, params: &AlgorithmParameters) -> QualityMetrics {
    #[cfg(feature = "test-hooks")]
    SCORE_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

    let stats = path_stats(svg);
    let complexity = complexity_of(stats);
    let parameter_score = parameter_score(params);
    let structure_score = structure_score(svg);
    let raw = COMPLEXITY_WEIGHT * complexity
        + PARAMETER_WEIGHT * parameter_score
        + STRUCTURE_WEIGHT * structure_score;

    QualityMetrics {
        score: (raw * 100.0).clamp(0.0, 100.0).round(),
        complexity,
        path_count: stats.paths,
        curve_ratio: if stats.commands == 0 {
            0.0
        } else {
            stats.curves as f64 / stats.commands as f64
        },
        parameter_score,
        structure_score,
    }
}

pub fn meets_quality_threshold(score: f64, threshold: f64) -> bool {
    score >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CategoryBias, RadialArmsParams};
    use crate::seed::create_stream;

    fn radial() -> RadialArmsParams {
        RadialArmsParams::derive(&mut create_stream("score"), &CategoryBias::default())
    }

    #[test]
    fn test_complexity_empty_and_garbage() {
        assert_eq!(calculate_complexity(""), 0.0);
        assert_eq!(calculate_complexity("no paths here CQCQ"), 0.0);
        assert_eq!(calculate_complexity(r#"<path d=""/>"#), 0.0);
    }

    #[test]
    fn test_complexity_ignores_ids() {
        // `id="..."` must not be read as path data
        let svg = r#"<linearGradient id="grad-0"></linearGradient><path d="M0 0 L1 1 Z"/>"#;
        let stats = path_stats(svg);
        assert_eq!(stats.paths, 1);
        assert_eq!(stats.commands, 3);
    }

    #[test]
    fn test_complexity_saturates() {
        let d = "C1 1 2 2 3 3 ".repeat(500);
        let svg = format!(r#"<path d="M0 0 {}Z"/>"#, d);
        let c = calculate_complexity(&svg);
        assert!(c <= 1.0 && c > 0.99);
    }

    #[test]
    fn test_curves_raise_complexity() {
        let lines = r#"<path d="M0 0 L1 1 L2 2 L3 3 Z"/>"#;
        let curves = r#"<path d="M0 0 C1 1 2 2 3 3 C1 1 2 2 3 3 C1 1 2 2 3 3 Z"/>"#;
        assert!(calculate_complexity(curves) > calculate_complexity(lines));
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit(0.4, 0.25, 0.55, 0.3), 1.0);
        assert!((fit(0.1, 0.25, 0.55, 0.3) - 0.5).abs() < 1e-9);
        assert_eq!(fit(5.0, 0.25, 0.55, 0.3), 0.0);
        assert_eq!(fit(f64::NAN, 0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_taper_preference() {
        let mut good = radial();
        good.taper_ratio = 0.4;
        let mut bad = good.clone();
        bad.taper_ratio = 0.95;
        let good = parameter_score(&AlgorithmParameters::RadialArms(good));
        let bad = parameter_score(&AlgorithmParameters::RadialArms(bad));
        assert!(good > bad);
    }

    #[test]
    fn test_score_bounds() {
        let params = AlgorithmParameters::RadialArms(radial());
        let long = "<path d=\"C\"/>".repeat(100);
        for svg in ["", "<svg></svg>", "d=\"\"", long.as_str()] {
            let q = calculate_quality_score(svg, &params);
            assert!((0.0..=100.0).contains(&q.score));
            assert!((0.0..=1.0).contains(&q.complexity));
        }
    }

    #[test]
    fn test_threshold() {
        assert!(meets_quality_threshold(80.0, 80.0));
        assert!(!meets_quality_threshold(79.0, 80.0));
    }
}
