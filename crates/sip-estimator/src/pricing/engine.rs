use super::domain::{AdditionalWorks, HouseConfiguration, HouseShape};
use super::tables::PricingTables;
use super::CalculationError;

/// Construction subtotal split, fixed by the commercial model: the house kit
/// is 71% of the pre-delivery subtotal, foundation 14%, assembly 15%.
const KIT_SHARE: f64 = 0.71;
const FOUNDATION_SHARE: f64 = 0.14;

/// Pre-surcharge pricing result handed to the surcharge composer and the
/// result assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PricedQuote {
    pub(crate) foundation_cost: i64,
    pub(crate) kit_cost: i64,
    pub(crate) assembly_cost: i64,
    pub(crate) delivery_cost: i64,
    pub(crate) custom_works_cost: i64,
    pub(crate) total: i64,
    pub(crate) price_per_sqm: i64,
}

/// Deterministic cost model: resolves the unit price from the rate table,
/// derives the 14/71/15 split, and adds delivery and additional works.
pub(crate) fn price(
    config: &HouseConfiguration,
    tables: &PricingTables,
) -> Result<PricedQuote, CalculationError> {
    let unit_price = unit_price(config, tables)?;

    let kit_cost = round_tenge(unit_price * config.area_m2);
    let subtotal = round_tenge(kit_cost as f64 / KIT_SHARE);
    let foundation_cost = round_tenge(subtotal as f64 * FOUNDATION_SHARE);
    // The rounding remainder lands in assembly so the three lines always sum
    // to the subtotal exactly.
    let assembly_cost = subtotal - kit_cost - foundation_cost;

    let delivery_cost = tables
        .delivery_fee(&config.delivery_city)
        .ok_or_else(|| CalculationError::UnknownCity {
            city: config.delivery_city.clone(),
        })?;

    let custom_works_cost = works_cost(&config.works, tables)?;

    let total = subtotal + delivery_cost + custom_works_cost;
    let price_per_sqm = round_tenge(total as f64 / config.area_m2);

    Ok(PricedQuote {
        foundation_cost,
        kit_cost,
        assembly_cost,
        delivery_cost,
        custom_works_cost,
        total,
        price_per_sqm,
    })
}

/// Tenge per m²: base rate for (floors, first-floor kind, roof type), the
/// complex-shape uplift, then the height premium for the tallest storey.
fn unit_price(
    config: &HouseConfiguration,
    tables: &PricingTables,
) -> Result<f64, CalculationError> {
    // The normalizer always emits at least one storey, but the
    // configuration is constructible by hand.
    let first_floor = config
        .floors
        .first()
        .ok_or(CalculationError::MissingRequiredField { field: "floors" })?
        .kind;
    let base = tables
        .base_rate(config.floor_count(), first_floor, &config.roof_type)
        .ok_or_else(|| CalculationError::InvalidEnum {
            field: "roof_type",
            value: config.roof_type.clone(),
        })? as f64;

    let shaped = match config.shape {
        HouseShape::Simple => base,
        HouseShape::Complex => base * (1.0 + tables.complex_shape_uplift),
    };

    Ok(shaped + height_premium(config, tables))
}

/// Premium per m² for storeys taller than the standard height, prorated per
/// centimetre of the tallest storey's excess.
fn height_premium(config: &HouseConfiguration, tables: &PricingTables) -> f64 {
    let tallest = config
        .floors
        .iter()
        .map(|floor| floor.height_m)
        .fold(0.0_f64, f64::max);

    let excess_m = tallest - tables.standard_floor_height_m;
    if excess_m <= 0.0 {
        return 0.0;
    }

    let excess_cm = (excess_m * 100.0).round();
    excess_cm * tables.height_premium_per_m2_per_cm as f64
}

fn works_cost(works: &AdditionalWorks, tables: &PricingTables) -> Result<i64, CalculationError> {
    match works {
        AdditionalWorks::Catalog(name) => {
            tables
                .work_fee(name)
                .ok_or_else(|| CalculationError::InvalidEnum {
                    field: "additional_works",
                    value: name.clone(),
                })
        }
        AdditionalWorks::Custom(items) => {
            let mut sum = 0_i64;
            for item in items {
                if item.price < 0 {
                    return Err(CalculationError::InvalidLineItem {
                        name: item.name.clone(),
                        reason: format!("negative price {}", item.price),
                    });
                }
                sum += item.price;
            }
            Ok(sum)
        }
    }
}

/// Half-away-from-zero rounding on non-negative amounts.
fn round_tenge(value: f64) -> i64 {
    value.round() as i64
}
