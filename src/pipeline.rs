//! Generation Pipeline - Single Entry Point
//!
//! Every logo leaves through `LogoGenerator::generate`. Geometry is built
//! first, then hashed, then recorded in the ledger; the ledger is never
//! touched while a candidate is under construction.

use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::algorithms::{
    build_variant, variant_seed, Algorithm, GeometryFlags, RenderContext, Selection, VariantOutcome,
};
use crate::color::Palette;
use crate::config::GeneratorConfig;
use crate::hashing::{generate_hash, sha256_hex};
use crate::ledger::HashLedger;
use crate::params::{AlgorithmParameters, Category};
use crate::scoring::QualityMetrics;
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Caller input. Everything but the brand name and primary color is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoGenerationParams {
    pub brand_name: String,
    pub primary_color: String,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub variations: Option<u32>,
    /// Defaults to the brand name.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_quality_score: Option<f64>,
}

impl LogoGenerationParams {
    pub fn new(brand_name: impl Into<String>, primary_color: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            primary_color: primary_color.into(),
            ..Self::default()
        }
    }

    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent_color = Some(accent.into());
        self
    }

    pub fn with_variations(mut self, variations: u32) -> Self {
        self.variations = Some(variations);
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_quality_score(mut self, score: f64) -> Self {
        self.min_quality_score = Some(score);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoMeta {
    pub brand_name: String,
    /// Epoch milliseconds. Not part of the hash.
    pub generated_at: i64,
    /// Seed string the kept document was derived from.
    pub seed: String,
    pub geometry: GeometryFlags,
    pub palette: Palette,
    #[serde(default)]
    pub candidates_evaluated: Option<u32>,
    /// SHA-256 of the serialized document.
    pub svg_digest: String,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLogo {
    pub id: String,
    pub hash: String,
    pub algorithm: Algorithm,
    /// 1-based.
    pub variant: u32,
    pub svg: String,
    pub params: AlgorithmParameters,
    #[serde(default)]
    pub quality: Option<QualityMetrics>,
    pub meta: LogoMeta,
}

impl GeneratedLogo {
    /// `data:` URI embedding the document as base64.
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes())
        )
    }
}

/// Deterministic UUID for a logo hash.
fn logo_id(hash: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("logoforge:{}", hash).as_bytes()).to_string()
}

/// The generation pipeline - single entry point for logo production
pub struct LogoGenerator {
    config: GeneratorConfig,
    ledger: Option<HashLedger>,
}

impl LogoGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config, ledger: None }
    }

    /// Attach a dedup ledger; every produced logo is recorded in it.
    pub fn with_ledger(mut self, ledger: HashLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn ledger(&self) -> Option<&HashLedger> {
        self.ledger.as_ref()
    }

    /// Resolve `name` and generate.
    pub fn generate_named(
        &self,
        name: &str,
        params: &LogoGenerationParams,
    ) -> Result<Vec<GeneratedLogo>, GenerateError> {
        let algorithm = name
            .parse::<Algorithm>()
            .map_err(GenerateError::UnknownAlgorithm)?;
        self.generate(algorithm, params)
    }

    /// Produce exactly `variations` logos for `algorithm`, in variant order.
    pub fn generate(
        &self,
        algorithm: Algorithm,
        params: &LogoGenerationParams,
    ) -> Result<Vec<GeneratedLogo>, GenerateError> {
        let variations = params.variations.unwrap_or(self.config.default_variations);
        let seed = params.seed.clone().unwrap_or_else(|| params.brand_name.clone());
        let palette = Palette::resolve(&params.primary_color, params.accent_color.as_deref());
        let ctx = RenderContext {
            brand_name: &params.brand_name,
            palette: &palette,
            bias: Category::parse(params.category.as_deref()).bias(),
        };
        let selection = Selection {
            candidate_count: self.config.candidate_count,
            min_quality_score: params
                .min_quality_score
                .unwrap_or(self.config.min_quality_score),
        };

        let mut logos = Vec::with_capacity(variations as usize);
        for v in 0..variations {
            let logo = self.generate_variant(algorithm, v, &seed, &ctx, selection)?;
            if let Some(ledger) = &self.ledger {
                ledger.record_logo(&logo);
            }
            logos.push(logo);
        }

        info!(
            algorithm = %algorithm,
            brand = %params.brand_name,
            variations,
            "generated logos"
        );
        Ok(logos)
    }

    /// Run every algorithm in declaration order.
    pub fn generate_all(
        &self,
        params: &LogoGenerationParams,
    ) -> Result<Vec<GeneratedLogo>, GenerateError> {
        let mut all = Vec::new();
        for algorithm in Algorithm::ALL {
            all.extend(self.generate(algorithm, params)?);
        }
        Ok(all)
    }

    fn generate_variant(
        &self,
        algorithm: Algorithm,
        v: u32,
        seed: &str,
        ctx: &RenderContext<'_>,
        selection: Selection,
    ) -> Result<GeneratedLogo, GenerateError> {
        let rerolls = match (&self.ledger, self.config.avoid_repeats) {
            (Some(_), true) => self.config.max_rerolls,
            _ => 0,
        };

        let mut attempt = 0;
        loop {
            let salted = if attempt == 0 {
                seed.to_string()
            } else {
                format!("{}~r{}", seed, attempt)
            };
            let vseed = variant_seed(&salted, algorithm, v);
            let outcome = build_variant(algorithm, &vseed, ctx, selection);
            let logo = self.assemble(algorithm, v + 1, vseed, ctx, outcome)?;

            let repeated = self
                .ledger
                .as_ref()
                .map_or(false, |l| rerolls > 0 && l.is_duplicate(&logo.hash));
            if !repeated || attempt >= rerolls {
                return Ok(logo);
            }
            debug!(algorithm = %algorithm, variant = v + 1, attempt, "repeat hash, rerolling");
            attempt += 1;
        }
    }

    fn assemble(
        &self,
        algorithm: Algorithm,
        variant: u32,
        seed: String,
        ctx: &RenderContext<'_>,
        outcome: VariantOutcome,
    ) -> Result<GeneratedLogo, GenerateError> {
        let VariantOutcome { rendered, quality, candidates_evaluated } = outcome;
        let hash = generate_hash(
            ctx.brand_name,
            algorithm,
            variant,
            &rendered.params,
            &self.config.format_version,
        )?;

        Ok(GeneratedLogo {
            id: logo_id(&hash),
            meta: LogoMeta {
                brand_name: ctx.brand_name.to_string(),
                generated_at: Utc::now().timestamp_millis(),
                seed,
                geometry: rendered.geometry,
                palette: ctx.palette.clone(),
                candidates_evaluated,
                svg_digest: sha256_hex(rendered.svg.as_bytes()),
                engine_version: ENGINE_VERSION.to_string(),
            },
            hash,
            algorithm,
            variant,
            svg: rendered.svg,
            params: rendered.params,
            quality,
        })
    }
}

impl Default for LogoGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
