//! Parameter Derivation
//!
//! A shared `BaseParameters` substrate plus one parameter struct per
//! algorithm. Every struct embeds the base by value and is drawn entirely
//! from a `SeedStream`, so a seed string fully determines the parameters.

use serde::{Deserialize, Serialize};

use crate::algorithms::Algorithm;
use crate::seed::SeedStream;

/// Range-bounded parameters shared by every algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseParameters {
    pub stroke_width: f64,
    pub curve_tension: f64,
    pub segment_count: u32,
    pub opacity_falloff: f64,
    pub noise_amount: f64,
    pub noise_scale: f64,
    pub rotation: f64,
    pub scale: f64,
    pub corner_radius: f64,
    pub gradient_angle: f64,
    pub gradient_spread: f64,
    pub highlight_opacity: f64,
    pub shadow_opacity: f64,
    /// Gap kept between a mark and its satellite shapes.
    pub spacing: f64,
    pub asymmetry: f64,
    pub taper: f64,
    pub weight_contrast: f64,
    pub inner_ratio: f64,
    /// Horizontal wander of stacked elements.
    pub jitter: f64,
    pub balance: f64,
    pub outline: bool,
    pub use_highlight: bool,
    pub mirror: bool,
}

impl BaseParameters {
    pub fn derive(s: &mut SeedStream) -> Self {
        Self {
            stroke_width: s.range(1.5, 6.0),
            curve_tension: s.range(0.2, 0.9),
            segment_count: s.int_range(3, 12),
            opacity_falloff: s.range(0.05, 0.35),
            noise_amount: s.range(0.0, 0.3),
            noise_scale: s.range(0.5, 3.0),
            rotation: s.range(0.0, 360.0),
            scale: s.range(0.75, 0.95),
            corner_radius: s.range(0.0, 8.0),
            gradient_angle: s.range(0.0, 360.0),
            gradient_spread: s.range(0.1, 0.5),
            highlight_opacity: s.range(0.1, 0.45),
            shadow_opacity: s.range(0.1, 0.35),
            spacing: s.range(2.0, 8.0),
            asymmetry: s.range(0.0, 0.25),
            taper: s.range(0.2, 0.9),
            weight_contrast: s.range(0.0, 0.6),
            inner_ratio: s.range(0.3, 0.7),
            jitter: s.range(0.0, 1.5),
            balance: s.range(-0.1, 0.1),
            outline: s.chance(0.25),
            use_highlight: s.chance(0.6),
            mirror: s.chance(0.5),
        }
    }
}

/// Industry hint supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Finance,
    Health,
    Creative,
    Food,
    Education,
    Retail,
    General,
}

impl Category {
    /// Lenient keyword match; anything unrecognized is `General`.
    pub fn parse(input: Option<&str>) -> Self {
        let Some(raw) = input else { return Self::General };
        let lower = raw.to_ascii_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |keys: &[&str]| words.iter().any(|w| keys.iter().any(|k| w.starts_with(k)));
        if has(&["tech", "software", "saas", "ai", "data", "cloud"]) {
            Self::Technology
        } else if has(&["financ", "bank", "invest", "insur", "fintech"]) {
            Self::Finance
        } else if has(&["health", "medic", "care", "wellness", "fitness"]) {
            Self::Health
        } else if has(&["design", "creative", "art", "media", "studio", "music"]) {
            Self::Creative
        } else if has(&["food", "restaurant", "cafe", "coffee", "bakery"]) {
            Self::Food
        } else if has(&["edu", "school", "learn", "academy"]) {
            Self::Education
        } else if has(&["retail", "shop", "store", "commerce", "fashion"]) {
            Self::Retail
        } else {
            Self::General
        }
    }

    pub fn bias(self) -> CategoryBias {
        let (roundness, energy, density) = match self {
            Self::Technology => (-0.4, 0.5, 0.3),
            Self::Finance => (-0.3, -0.4, -0.1),
            Self::Health => (0.6, -0.2, -0.2),
            Self::Creative => (0.2, 0.7, 0.4),
            Self::Food => (0.5, 0.3, 0.0),
            Self::Education => (0.1, -0.1, 0.1),
            Self::Retail => (0.3, 0.4, 0.0),
            Self::General => (0.0, 0.0, 0.0),
        };
        CategoryBias { roundness, energy, density }
    }
}

/// Nudges applied to candidate-selection draws. Each value is in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryBias {
    pub roundness: f64,
    pub energy: f64,
    pub density: f64,
}

impl CategoryBias {
    /// Draw from [min, max] with the midpoint shifted by `weight * span / 4`.
    fn range(&self, s: &mut SeedStream, min: f64, max: f64, weight: f64) -> f64 {
        let shift = weight.clamp(-1.0, 1.0) * (max - min) / 4.0;
        (s.range(min, max) + shift).clamp(min, max)
    }

    fn int_range(&self, s: &mut SeedStream, min: u32, max: u32, weight: f64) -> u32 {
        let v = self.range(s, min as f64, max as f64 + 0.999, weight);
        (v.floor() as u32).clamp(min, max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarStyle {
    Bars,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterlockStyle {
    Rings,
    Links,
    Chain,
    Weave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutoutStyle {
    Cutout,
    NegativeSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameShape {
    Circle,
    RoundedSquare,
    Hexagon,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthStyle {
    Depth,
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerShape {
    Circle,
    Square,
    Hexagon,
    Blob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometricShape {
    Circle,
    Triangle,
    Square,
    Pentagon,
    Hexagon,
    Octagon,
    Diamond,
}

impl GeometricShape {
    /// Polygon side count; `None` for the circle.
    pub fn sides(self) -> Option<u32> {
        match self {
            Self::Circle => None,
            Self::Triangle => Some(3),
            Self::Square | Self::Diamond => Some(4),
            Self::Pentagon => Some(5),
            Self::Hexagon => Some(6),
            Self::Octagon => Some(8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeShape {
    Circle,
    Squircle,
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialArmsParams {
    pub base: BaseParameters,
    pub arm_count: u32,
    pub arm_length: f64,
    pub arm_base_width: f64,
    pub taper_ratio: f64,
    pub curvature: f64,
    pub center_radius: f64,
    pub twist: f64,
    pub alternate_lengths: bool,
    pub center_ring: bool,
}

impl RadialArmsParams {
    pub fn derive(s: &mut SeedStream, bias: &CategoryBias) -> Self {
        let base = BaseParameters::derive(s);
        Self {
            arm_count: bias.int_range(s, 3, 12, bias.density),
            arm_length: s.range(26.0, 42.0),
            arm_base_width: s.range(4.0, 10.0),
            taper_ratio: s.range(0.1, 0.8),
            curvature: bias.range(s, -0.8, 0.8, bias.energy),
            center_radius: s.range(5.0, 15.0),
            twist: s.range(0.0, 360.0),
            alternate_lengths: s.chance(0.35),
            center_ring: s.chance(0.4 + bias.roundness * 0.2),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelBarsParams {
    pub base: BaseParameters,
    pub style: BarStyle,
    pub bar_count: u32,
    pub bar_skew: f64,
    pub bar_thickness: f64,
    pub bar_gap: f64,
    pub stagger: f64,
    pub rounded: bool,
    pub ascending: bool,
}

impl ParallelBarsParams {
    pub fn derive(s: &mut SeedStream) -> Self {
        let base = BaseParameters::derive(s);
        Self {
            style: if s.chance(0.3) { BarStyle::Lines } else { BarStyle::Bars },
            bar_count: s.int_range(2, 6),
            bar_skew: s.range(-25.0, 25.0),
            bar_thickness: s.range(6.0, 14.0),
            bar_gap: s.range(2.0, 7.0),
            stagger: s.range(0.0, 0.4),
            rounded: s.chance(0.6),
            ascending: s.chance(0.5),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterlockingParams {
    pub base: BaseParameters,
    pub style: InterlockStyle,
    pub element_count: u32,
    pub radius: f64,
    pub thickness: f64,
    pub overlap: f64,
    pub orientation: f64,
}

impl InterlockingParams {
    pub fn derive(s: &mut SeedStream) -> Self {
        let base = BaseParameters::derive(s);
        let style = *s
            .pick(&[
                InterlockStyle::Rings,
                InterlockStyle::Links,
                InterlockStyle::Chain,
                InterlockStyle::Weave,
            ])
            .unwrap_or(&InterlockStyle::Rings);
        Self {
            style,
            element_count: s.int_range(2, 4),
            radius: s.range(14.0, 24.0),
            thickness: s.range(3.0, 8.0),
            overlap: s.range(0.25, 0.6),
            orientation: s.range(0.0, 180.0),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterformCutoutParams {
    pub base: BaseParameters,
    pub letter: char,
    pub style: CutoutStyle,
    pub frame: FrameShape,
    pub frame_thickness: f64,
    pub glyph_weight: f64,
    pub glyph_scale: f64,
}

impl LetterformCutoutParams {
    pub fn derive(s: &mut SeedStream, letter: char) -> Self {
        let base = BaseParameters::derive(s);
        let frame = *s
            .pick(&[
                FrameShape::Circle,
                FrameShape::RoundedSquare,
                FrameShape::Hexagon,
                FrameShape::Shield,
            ])
            .unwrap_or(&FrameShape::Circle);
        Self {
            letter,
            style: if s.chance(0.5) { CutoutStyle::NegativeSpace } else { CutoutStyle::Cutout },
            frame,
            frame_thickness: s.range(4.0, 10.0),
            glyph_weight: s.range(3.0, 8.0),
            glyph_scale: s.range(0.45, 0.65),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractMonogramParams {
    pub base: BaseParameters,
    pub primary_letter: char,
    pub secondary_letter: char,
    pub letter_offset: f64,
    pub weight: f64,
    pub overlap_opacity: f64,
    pub slant: f64,
    pub contrast: f64,
}

impl AbstractMonogramParams {
    pub fn derive(s: &mut SeedStream, primary_letter: char, secondary_letter: char) -> Self {
        let base = BaseParameters::derive(s);
        Self {
            primary_letter,
            secondary_letter,
            letter_offset: s.range(4.0, 14.0),
            weight: s.range(2.5, 6.0),
            overlap_opacity: s.range(0.6, 0.9),
            slant: s.range(-12.0, 12.0),
            contrast: s.range(0.0, 0.6),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeredDepthParams {
    pub base: BaseParameters,
    pub style: DepthStyle,
    pub shape: LayerShape,
    pub layer_count: u32,
    pub offset_angle: f64,
    pub offset_distance: f64,
    pub scale_step: f64,
    pub size: f64,
}

impl LayeredDepthParams {
    pub fn derive(s: &mut SeedStream) -> Self {
        let base = BaseParameters::derive(s);
        let shape = *s
            .pick(&[LayerShape::Circle, LayerShape::Square, LayerShape::Hexagon, LayerShape::Blob])
            .unwrap_or(&LayerShape::Circle);
        Self {
            style: if s.chance(0.5) { DepthStyle::Overlap } else { DepthStyle::Depth },
            shape,
            layer_count: s.int_range(2, 5),
            offset_angle: s.range(0.0, 360.0),
            offset_distance: s.range(2.0, 7.0),
            scale_step: s.range(0.0, 0.12),
            size: s.range(22.0, 34.0),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwooshParams {
    pub base: BaseParameters,
    pub swoosh_count: u32,
    pub sweep: f64,
    pub arc_radius: f64,
    pub thickness: f64,
    pub flatten: f64,
    pub start_angle: f64,
    pub sparkle: bool,
    pub sparkle_tips: u32,
    pub sparkle_size: f64,
}

impl SwooshParams {
    pub fn derive(s: &mut SeedStream) -> Self {
        let base = BaseParameters::derive(s);
        Self {
            swoosh_count: s.int_range(1, 3),
            sweep: s.range(120.0, 260.0),
            arc_radius: s.range(22.0, 36.0),
            thickness: s.range(4.0, 10.0),
            flatten: s.range(0.45, 0.9),
            start_angle: s.range(0.0, 360.0),
            sparkle: s.chance(0.5),
            sparkle_tips: s.int_range(4, 8),
            sparkle_size: s.range(6.0, 14.0),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometricFormParams {
    pub base: BaseParameters,
    pub shape: GeometricShape,
    pub nested_count: u32,
    pub inner_rotation: f64,
    pub inset_ratio: f64,
    pub accent_dot: bool,
    pub line_accents: u32,
}

impl GeometricFormParams {
    pub fn derive(s: &mut SeedStream, bias: &CategoryBias) -> Self {
        let base = BaseParameters::derive(s);
        // rounder categories lean toward fewer sides
        let shapes = [
            GeometricShape::Circle,
            GeometricShape::Hexagon,
            GeometricShape::Octagon,
            GeometricShape::Pentagon,
            GeometricShape::Square,
            GeometricShape::Diamond,
            GeometricShape::Triangle,
        ];
        let idx = bias.range(s, 0.0, shapes.len() as f64 - 0.001, -bias.roundness) as usize;
        Self {
            shape: shapes[idx.min(shapes.len() - 1)],
            nested_count: bias.int_range(s, 1, 4, bias.density),
            inner_rotation: s.range(0.0, 45.0),
            inset_ratio: s.range(0.55, 0.8),
            accent_dot: s.chance(0.4),
            line_accents: s.int_range(0, 4),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractMarkParams {
    pub base: BaseParameters,
    pub lobe_count: u32,
    pub blob_radius: f64,
    pub wobble: f64,
    pub noise_octaves: u32,
    pub eye_radius: f64,
    pub orbit: bool,
    pub orbit_angle: f64,
    pub orbit_radius: f64,
}

impl AbstractMarkParams {
    pub fn derive(s: &mut SeedStream, bias: &CategoryBias) -> Self {
        let base = BaseParameters::derive(s);
        Self {
            lobe_count: bias.int_range(s, 3, 7, bias.energy),
            blob_radius: s.range(26.0, 36.0),
            wobble: bias.range(s, 0.05, 0.3, bias.energy - bias.roundness),
            noise_octaves: s.int_range(2, 5),
            eye_radius: if s.chance(0.6) { s.range(4.0, 12.0) } else { 0.0 },
            orbit: s.chance(0.5),
            orbit_angle: s.range(0.0, 360.0),
            orbit_radius: s.range(4.0, 8.0),
            base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonogramBlendParams {
    pub base: BaseParameters,
    pub letter: char,
    pub badge: BadgeShape,
    pub stroke_weight: f64,
    pub ribbon_sweep: f64,
    pub ribbon_thickness: f64,
    pub ribbon_angle: f64,
    pub blend_opacity: f64,
}

impl MonogramBlendParams {
    pub fn derive(s: &mut SeedStream, bias: &CategoryBias, letter: char) -> Self {
        let base = BaseParameters::derive(s);
        let badge = *s
            .pick(&[BadgeShape::Circle, BadgeShape::Squircle, BadgeShape::Open])
            .unwrap_or(&BadgeShape::Circle);
        Self {
            letter,
            badge,
            stroke_weight: bias.range(s, 3.0, 7.0, -bias.energy),
            ribbon_sweep: bias.range(s, 40.0, 140.0, bias.energy),
            ribbon_thickness: s.range(2.0, 6.0),
            ribbon_angle: s.range(-40.0, 40.0),
            blend_opacity: s.range(0.5, 0.9),
            base,
        }
    }
}

/// Derived parameters of one variant, tagged by algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum AlgorithmParameters {
    RadialArms(RadialArmsParams),
    ParallelBars(ParallelBarsParams),
    Interlocking(InterlockingParams),
    LetterformCutout(LetterformCutoutParams),
    AbstractMonogram(AbstractMonogramParams),
    LayeredDepth(LayeredDepthParams),
    Swoosh(SwooshParams),
    GeometricForm(GeometricFormParams),
    AbstractMark(AbstractMarkParams),
    MonogramBlend(MonogramBlendParams),
}

impl AlgorithmParameters {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::RadialArms(_) => Algorithm::RadialArms,
            Self::ParallelBars(_) => Algorithm::ParallelBars,
            Self::Interlocking(_) => Algorithm::Interlocking,
            Self::LetterformCutout(_) => Algorithm::LetterformCutout,
            Self::AbstractMonogram(_) => Algorithm::AbstractMonogram,
            Self::LayeredDepth(_) => Algorithm::LayeredDepth,
            Self::Swoosh(_) => Algorithm::Swoosh,
            Self::GeometricForm(_) => Algorithm::GeometricForm,
            Self::AbstractMark(_) => Algorithm::AbstractMark,
            Self::MonogramBlend(_) => Algorithm::MonogramBlend,
        }
    }

    /// The shared substrate, always present.
    pub fn base(&self) -> &BaseParameters {
        match self {
            Self::RadialArms(p) => &p.base,
            Self::ParallelBars(p) => &p.base,
            Self::Interlocking(p) => &p.base,
            Self::LetterformCutout(p) => &p.base,
            Self::AbstractMonogram(p) => &p.base,
            Self::LayeredDepth(p) => &p.base,
            Self::Swoosh(p) => &p.base,
            Self::GeometricForm(p) => &p.base,
            Self::AbstractMark(p) => &p.base,
            Self::MonogramBlend(p) => &p.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::create_stream;

    #[test]
    fn test_base_deterministic() {
        let a = BaseParameters::derive(&mut create_stream("acme-x-v0"));
        let b = BaseParameters::derive(&mut create_stream("acme-x-v0"));
        assert_eq!(a, b);
        let c = BaseParameters::derive(&mut create_stream("acme-x-v1"));
        assert_ne!(a, c);
    }

    #[test]
    fn test_base_ranges() {
        for i in 0..200 {
            let p = BaseParameters::derive(&mut create_stream(&format!("range-{}", i)));
            assert!((1.5..6.0).contains(&p.stroke_width));
            assert!((0.2..0.9).contains(&p.curve_tension));
            assert!((3..=12).contains(&p.segment_count));
            assert!((2.0..8.0).contains(&p.spacing));
            assert!((0.0..1.5).contains(&p.jitter));
            assert!((0.2..0.9).contains(&p.taper));
            assert!((-0.1..0.1).contains(&p.balance));
        }
    }

    #[test]
    fn test_bias_stays_in_range() {
        let bias = CategoryBias { roundness: 1.0, energy: 1.0, density: 1.0 };
        for i in 0..200 {
            let p = RadialArmsParams::derive(&mut create_stream(&format!("bias-{}", i)), &bias);
            assert!((3..=12).contains(&p.arm_count));
            assert!((-0.8..=0.8).contains(&p.curvature));
            let g = GeometricFormParams::derive(&mut create_stream(&format!("geo-{}", i)), &bias);
            assert!((1..=4).contains(&g.nested_count));
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse(Some("SaaS platform")), Category::Technology);
        assert_eq!(Category::parse(Some("Healthcare")), Category::Health);
        assert_eq!(Category::parse(Some("coffee shop")), Category::Food);
        assert_eq!(Category::parse(Some("retail")), Category::Retail);
        assert_eq!(Category::parse(Some("")), Category::General);
        assert_eq!(Category::parse(None), Category::General);
        assert_eq!(Category::General.bias(), CategoryBias::default());
    }

    #[test]
    fn test_tagged_serialization() {
        let p = AlgorithmParameters::Swoosh(SwooshParams::derive(&mut create_stream("tag")));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["algorithm"], "swoosh");
        assert!(v["base"]["strokeWidth"].is_number());
        assert!(v["sweep"].is_number());
        assert_eq!(p.algorithm(), Algorithm::Swoosh);
    }

    #[test]
    fn test_letter_serializes_as_string() {
        let p = LetterformCutoutParams::derive(&mut create_stream("letter"), 'Q');
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["letter"], "Q");
    }
}
