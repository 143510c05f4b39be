//! LogoForge Core - Deterministic Vector-Mark Generator
//!
//! # Guarantees
//! 1. Same inputs, same bytes: documents and hashes never depend on the clock
//! 2. Every requested variant is produced
//! 3. Candidate selection is bounded
//! 4. The ledger is advisory; its failures never reach the caller
//! 5. Definition ids are unique within one document only

pub mod seed;
pub mod noise;
pub mod geometry;
pub mod document;
pub mod color;
pub mod glyphs;
pub mod params;
pub mod algorithms;
pub mod scoring;
pub mod hashing;
pub mod ledger;
pub mod config;
pub mod pipeline;

pub use algorithms::{Algorithm, GeometryFlags, Pattern, MAX_CANDIDATES};
pub use color::Palette;
pub use config::{
    ConfigError, GeneratorConfig, DEFAULT_CANDIDATE_COUNT, DEFAULT_MIN_QUALITY_SCORE,
    FORMAT_VERSION, LEDGER_CAPACITY,
};
pub use document::SvgBuilder;
pub use hashing::{canonical_json, generate_hash, sha256_hex};
pub use ledger::{FileStorage, HashLedger, HashRecord, LedgerStorage, MemoryStorage, StorageError};
pub use params::{AlgorithmParameters, BaseParameters, Category};
pub use pipeline::{GenerateError, GeneratedLogo, LogoGenerationParams, LogoGenerator, LogoMeta};
pub use scoring::{calculate_complexity, calculate_quality_score, meets_quality_threshold, QualityMetrics};
pub use seed::{create_stream, SeedStream};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
