//! Deterministic pricing core for prefabricated SIP panel houses.
//!
//! Data flows one way: relaxed request → normalizer → rule engine →
//! surcharge composer → result assembler. Every calculation reads only the
//! injected read-only tables and its own input, so concurrent calculations
//! need no coordination.

mod assembler;
pub mod domain;
mod engine;
pub mod import;
mod normalizer;
mod surcharge;
pub mod tables;
pub mod toolcall;

pub use domain::{
    AdditionalWorks, CostBreakdown, CustomWorkInput, CustomWorkItem, EstimateRequest,
    FloorCountParam, FloorKind, FloorSpec, HouseConfiguration, HouseShape, PriceParam,
};
pub use import::TableImportError;
pub use tables::{BaseRate, DeliveryFee, PricingTables, WorkEntry};

/// Terminal validation/pricing failure for one calculation. Never downgraded
/// to a default; the transport layer maps it to its own error shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("{field} {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unrecognized {field}: '{value}'")]
    InvalidEnum { field: &'static str, value: String },
    #[error("no delivery rate configured for city '{city}'")]
    UnknownCity { city: String },
    #[error("invalid custom work '{name}': {reason}")]
    InvalidLineItem { name: String, reason: String },
    #[error("missing required field '{field}'")]
    MissingRequiredField { field: &'static str },
}

impl CalculationError {
    /// Stable machine-readable code for transport-level error mapping. The
    /// conversational collaborator re-prompts on `missing_required_field`
    /// and `unknown_city` instead of guessing.
    pub fn code(&self) -> &'static str {
        match self {
            CalculationError::OutOfRange { .. } => "out_of_range",
            CalculationError::InvalidEnum { .. } => "invalid_enum",
            CalculationError::UnknownCity { .. } => "unknown_city",
            CalculationError::InvalidLineItem { .. } => "invalid_line_item",
            CalculationError::MissingRequiredField { .. } => "missing_required_field",
        }
    }

    pub fn should_reprompt(&self) -> bool {
        matches!(
            self,
            CalculationError::UnknownCity { .. } | CalculationError::MissingRequiredField { .. }
        )
    }
}

/// Facade composing the normalizer, rule engine, surcharge composer, and
/// result assembler over one set of pricing tables.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    tables: PricingTables,
}

impl CostCalculator {
    pub fn new(tables: PricingTables) -> Self {
        Self { tables }
    }

    /// Calculator loaded with the shipped reference calibration.
    pub fn standard() -> Self {
        Self::new(PricingTables::standard())
    }

    pub fn tables(&self) -> &PricingTables {
        &self.tables
    }

    /// Adapter-facing contract: prices one relaxed request end to end.
    pub fn calculate(&self, request: EstimateRequest) -> Result<CostBreakdown, CalculationError> {
        let config = normalizer::normalize(request, &self.tables)?;
        self.calculate_configured(&config)
    }

    /// Prices an already-normalized configuration.
    pub fn calculate_configured(
        &self,
        config: &HouseConfiguration,
    ) -> Result<CostBreakdown, CalculationError> {
        let quote = engine::price(config, &self.tables)?;
        let final_total = surcharge::apply(quote.total, config, &self.tables);
        Ok(assembler::assemble(quote, final_total))
    }
}
