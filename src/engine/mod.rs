// ============================================================================
// Engine Module
// Conversion and rendering over injected, read-only unit data
// ============================================================================

mod conversion_engine;

pub mod factory;

pub use conversion_engine::ConversionEngine;
pub use factory::{create_from_config, ConversionEngineBuilder};
