//! Generator Algorithms - Dispatch and Candidate Selection
//!
//! Ten independent geometric strategies. Each module derives its parameter
//! set from a seed stream and builds one document from it. Two construction
//! patterns exist:
//! - direct: one draw per variant, emitted as-is
//! - candidate selection: up to `candidate_count` draws per variant, scored,
//!   best kept, early exit once the threshold is met

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::color::{self, Palette};
use crate::document::{GradientStop, SvgBuilder};
use crate::geometry::Point;
use crate::params::{AlgorithmParameters, BaseParameters, CategoryBias};
use crate::scoring::{calculate_quality_score, meets_quality_threshold, QualityMetrics};
use crate::seed::{create_stream, hash53_base36};

pub mod abstract_mark;
pub mod abstract_monogram;
pub mod geometric_form;
pub mod interlocking;
pub mod layered_depth;
pub mod letterform_cutout;
pub mod monogram_blend;
pub mod parallel_bars;
pub mod radial_arms;
pub mod swoosh;

/// Hard cap on candidates scored per variant.
pub const MAX_CANDIDATES: u32 = 5;

/// Canvas center; every generator authors around it.
pub const CENTER: Point = Point::new(50.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    RadialArms,
    ParallelBars,
    Interlocking,
    LetterformCutout,
    AbstractMonogram,
    LayeredDepth,
    Swoosh,
    GeometricForm,
    AbstractMark,
    MonogramBlend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    Direct,
    CandidateSelection,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::RadialArms,
        Algorithm::ParallelBars,
        Algorithm::Interlocking,
        Algorithm::LetterformCutout,
        Algorithm::AbstractMonogram,
        Algorithm::LayeredDepth,
        Algorithm::Swoosh,
        Algorithm::GeometricForm,
        Algorithm::AbstractMark,
        Algorithm::MonogramBlend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::RadialArms => "radial-arms",
            Self::ParallelBars => "parallel-bars",
            Self::Interlocking => "interlocking",
            Self::LetterformCutout => "letterform-cutout",
            Self::AbstractMonogram => "abstract-monogram",
            Self::LayeredDepth => "layered-depth",
            Self::Swoosh => "swoosh",
            Self::GeometricForm => "geometric-form",
            Self::AbstractMark => "abstract-mark",
            Self::MonogramBlend => "monogram-blend",
        }
    }

    pub fn pattern(self) -> Pattern {
        match self {
            Self::RadialArms | Self::GeometricForm | Self::AbstractMark | Self::MonogramBlend => {
                Pattern::CandidateSelection
            }
            Self::ParallelBars
            | Self::Interlocking
            | Self::LetterformCutout
            | Self::AbstractMonogram
            | Self::LayeredDepth
            | Self::Swoosh => Pattern::Direct,
        }
    }

    /// Built from a glyph skeleton of the brand's letters.
    pub fn is_letter_based(self) -> bool {
        matches!(
            self,
            Self::LetterformCutout | Self::AbstractMonogram | Self::MonogramBlend
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Geometry classification reported in logo metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryFlags {
    pub letter_based: bool,
    pub even_odd: bool,
    pub masked: bool,
    pub clipped: bool,
    pub layered: bool,
    pub symmetric: bool,
    pub gradient_count: usize,
}

/// Inputs shared by every build within one variant.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub brand_name: &'a str,
    pub palette: &'a Palette,
    pub bias: CategoryBias,
}

/// One finished build: document plus the parameters that produced it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub params: AlgorithmParameters,
    pub geometry: GeometryFlags,
}

/// Derive parameters from `seed` and build one document.
pub fn render(algorithm: Algorithm, seed: &str, ctx: &RenderContext<'_>) -> Rendered {
    let mut stream = create_stream(seed);
    match algorithm {
        Algorithm::RadialArms => radial_arms::render(&mut stream, seed, ctx),
        Algorithm::ParallelBars => parallel_bars::render(&mut stream, seed, ctx),
        Algorithm::Interlocking => interlocking::render(&mut stream, seed, ctx),
        Algorithm::LetterformCutout => letterform_cutout::render(&mut stream, seed, ctx),
        Algorithm::AbstractMonogram => abstract_monogram::render(&mut stream, seed, ctx),
        Algorithm::LayeredDepth => layered_depth::render(&mut stream, seed, ctx),
        Algorithm::Swoosh => swoosh::render(&mut stream, seed, ctx),
        Algorithm::GeometricForm => geometric_form::render(&mut stream, seed, ctx),
        Algorithm::AbstractMark => abstract_mark::render(&mut stream, seed, ctx),
        Algorithm::MonogramBlend => monogram_blend::render(&mut stream, seed, ctx),
    }
}

/// Seed string for variant index `v` (0-based).
pub fn variant_seed(seed: &str, algorithm: Algorithm, v: u32) -> String {
    format!("{}-{}-v{}", seed, algorithm.name(), v)
}

/// Seed string for candidate `c` of a variant, derived through the content
/// hash so neighbouring candidates share no prefix structure.
pub fn candidate_seed(variant_seed: &str, c: u32) -> String {
    format!("{}-c{}", variant_seed, hash53_base36(&format!("{}#{}", variant_seed, c)))
}

/// Selection knobs for the candidate pattern.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub candidate_count: u32,
    pub min_quality_score: f64,
}

/// Result of building one variant.
#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub rendered: Rendered,
    pub quality: Option<QualityMetrics>,
    pub candidates_evaluated: Option<u32>,
}

/// Build one variant under the algorithm's construction pattern.
pub fn build_variant(
    algorithm: Algorithm,
    variant_seed: &str,
    ctx: &RenderContext<'_>,
    selection: Selection,
) -> VariantOutcome {
    match algorithm.pattern() {
        Pattern::Direct => VariantOutcome {
            rendered: render(algorithm, variant_seed, ctx),
            quality: None,
            candidates_evaluated: None,
        },
        Pattern::CandidateSelection => select_best(algorithm, variant_seed, ctx, selection),
    }
}

fn select_best(
    algorithm: Algorithm,
    variant_seed: &str,
    ctx: &RenderContext<'_>,
    selection: Selection,
) -> VariantOutcome {
    let limit = selection.candidate_count.clamp(1, MAX_CANDIDATES);
    let score_one = |c: u32| {
        let rendered = render(algorithm, &candidate_seed(variant_seed, c), ctx);
        let quality = calculate_quality_score(&rendered.svg, &rendered.params);
        debug!(
            algorithm = %algorithm,
            candidate = c,
            score = quality.score,
            "candidate scored"
        );
        (rendered, quality)
    };

    let mut best = score_one(0);
    let mut evaluated = 1;
    while evaluated < limit && !meets_quality_threshold(best.1.score, selection.min_quality_score) {
        let next = score_one(evaluated);
        evaluated += 1;
        if next.1.score > best.1.score {
            best = next;
        }
    }

    VariantOutcome {
        rendered: best.0,
        quality: Some(best.1),
        candidates_evaluated: Some(evaluated),
    }
}

// --- Shared paint helpers ---

/// Body gradient: light tint of the primary through primary to accent.
pub(crate) fn body_gradient(b: &mut SvgBuilder, palette: &Palette, base: &BaseParameters) -> String {
    b.linear_gradient(
        base.gradient_angle,
        vec![
            GradientStop::new(0.0, &color::lighten(&palette.primary, base.gradient_spread * 0.5), 1.0),
            GradientStop::new(0.55, &palette.primary, 1.0),
            GradientStop::new(1.0, &palette.accent, 1.0),
        ],
    )
}

/// Two-tone gradient between arbitrary colors.
pub(crate) fn tone_gradient(b: &mut SvgBuilder, from: &str, to: &str, angle: f64) -> String {
    b.linear_gradient(
        angle,
        vec![GradientStop::new(0.0, from, 1.0), GradientStop::new(1.0, to, 1.0)],
    )
}

/// Accent gradient: accent to a darker accent.
pub(crate) fn accent_gradient(b: &mut SvgBuilder, palette: &Palette, angle: f64) -> String {
    tone_gradient(b, &palette.accent, &color::darken(&palette.accent, 0.25), angle)
}

/// Soft white sheen, fading out toward the edge.
pub(crate) fn highlight_gradient(b: &mut SvgBuilder, base: &BaseParameters) -> String {
    b.radial_gradient(
        0.35,
        0.3,
        0.65,
        vec![
            GradientStop::new(0.0, "#ffffff", base.highlight_opacity),
            GradientStop::new(1.0, "#ffffff", 0.0),
        ],
    )
}

/// Per-layer tone: shifts from primary toward accent with `t` in [0, 1].
pub(crate) fn layer_tone(palette: &Palette, t: f64) -> String {
    color::mix(&palette.primary, &palette.accent, t)
}

/// Scale `points` about `center` so none lies farther than `max_radius`.
pub(crate) fn fit_within(points: &mut [Point], center: Point, max_radius: f64) {
    let far = points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0_f64, f64::max);
    if far > max_radius && far > 0.0 {
        let k = max_radius / far;
        for p in points.iter_mut() {
            *p = center + (*p - center) * k;
        }
    }
}

/// Floor for counts derived from parameters.
pub(crate) fn at_least_one(n: u32) -> u32 {
    n.max(1)
}

/// Floor for lengths derived from parameters.
pub(crate) fn min_len(v: f64) -> f64 {
    if v.is_finite() {
        v.max(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(palette: &Palette) -> RenderContext<'_> {
        RenderContext {
            brand_name: "Acme",
            palette,
            bias: CategoryBias::default(),
        }
    }

    #[test]
    fn test_names_roundtrip() {
        for a in Algorithm::ALL {
            assert_eq!(a.name().parse::<Algorithm>(), Ok(a));
            assert_eq!(a.to_string(), a.name());
        }
        assert_eq!("Radial_Arms".parse::<Algorithm>(), Ok(Algorithm::RadialArms));
        assert!("spiral".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_pattern_split() {
        let candidates = Algorithm::ALL
            .iter()
            .filter(|a| a.pattern() == Pattern::CandidateSelection)
            .count();
        assert_eq!(candidates, 4);
        assert_eq!(Algorithm::ALL.len() - candidates, 6);
    }

    #[test]
    fn test_every_algorithm_renders_deterministically() {
        let palette = Palette::resolve("#3b82f6", None);
        for a in Algorithm::ALL {
            let seed = variant_seed("acme", a, 0);
            let first = render(a, &seed, &ctx(&palette));
            let second = render(a, &seed, &ctx(&palette));
            assert_eq!(first.svg, second.svg, "{} not deterministic", a);
            assert_eq!(first.params, second.params);
            assert_eq!(first.params.algorithm(), a);
        }
    }

    #[test]
    fn test_every_algorithm_has_two_gradients() {
        let palette = Palette::resolve("#10b981", Some("#f59e0b"));
        for a in Algorithm::ALL {
            for v in 0..6 {
                let r = render(a, &variant_seed("tone", a, v), &ctx(&palette));
                assert!(r.geometry.gradient_count >= 2, "{} v{} has flat fill", a, v);
                assert!(r.svg.matches("Gradient id=").count() >= 2);
                assert!(r.svg.contains(r#"viewBox="0 0 100 100""#));
            }
        }
    }

    #[test]
    fn test_letter_flag_matches_algorithm() {
        let palette = Palette::resolve("#000000", None);
        for a in Algorithm::ALL {
            let r = render(a, &variant_seed("", a, 0), &ctx(&palette));
            assert_eq!(r.geometry.letter_based, a.is_letter_based());
        }
    }

    #[test]
    fn test_selection_bounded() {
        let palette = Palette::resolve("#3b82f6", None);
        let impossible = Selection { candidate_count: 50, min_quality_score: 101.0 };
        let out = build_variant(Algorithm::RadialArms, "bounded", &ctx(&palette), impossible);
        assert_eq!(out.candidates_evaluated, Some(MAX_CANDIDATES));
        assert!(out.quality.is_some());

        let trivial = Selection { candidate_count: 5, min_quality_score: 0.0 };
        let out = build_variant(Algorithm::RadialArms, "bounded", &ctx(&palette), trivial);
        assert_eq!(out.candidates_evaluated, Some(1));
    }

    #[test]
    fn test_selection_keeps_best() {
        let palette = Palette::resolve("#3b82f6", None);
        let sel = Selection { candidate_count: 5, min_quality_score: 101.0 };
        let out = build_variant(Algorithm::AbstractMark, "best", &ctx(&palette), sel);
        let chosen = out.quality.map(|q| q.score).unwrap_or_default();
        for c in 0..MAX_CANDIDATES {
            let r = render(Algorithm::AbstractMark, &candidate_seed("best", c), &ctx(&palette));
            assert!(calculate_quality_score(&r.svg, &r.params).score <= chosen);
        }
    }

    #[test]
    fn test_direct_pattern_has_no_quality() {
        let palette = Palette::resolve("#3b82f6", None);
        let sel = Selection { candidate_count: 5, min_quality_score: 80.0 };
        let out = build_variant(Algorithm::ParallelBars, "direct", &ctx(&palette), sel);
        assert!(out.quality.is_none());
        assert!(out.candidates_evaluated.is_none());
    }

    #[test]
    fn test_fit_within() {
        let mut pts = vec![Point::new(150.0, 50.0), Point::new(50.0, 60.0)];
        fit_within(&mut pts, CENTER, 40.0);
        assert!((pts[0].distance(CENTER) - 40.0).abs() < 1e-9);
    }
}
