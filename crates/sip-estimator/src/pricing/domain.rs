use serde::{Deserialize, Serialize};

/// Hard bounds for the footprint area accepted by the calculator, in m².
pub const MIN_AREA_M2: f64 = 10.0;
pub const MAX_AREA_M2: f64 = 1500.0;

/// Default storey height applied when the caller omits one, in metres.
pub const DEFAULT_FLOOR_HEIGHT_M: f64 = 2.5;

/// Default SIP panel thickness applied when the caller omits one, in mm.
pub const DEFAULT_PANEL_THICKNESS_MM: u16 = 163;

/// Whether a storey is a full-height floor or an attic storey under the roof
/// slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorKind {
    Full,
    Attic,
}

impl FloorKind {
    /// Accepts the canonical token plus the localized labels the
    /// conversational adapter passes through verbatim.
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "full" | "полноценный" => Some(Self::Full),
            "attic" | "мансардный" => Some(Self::Attic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Attic => "attic",
        }
    }
}

/// Footprint complexity of the house plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseShape {
    Simple,
    Complex,
}

impl HouseShape {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "simple" | "простая форма" => Some(Self::Simple),
            "complex" | "сложная форма" => Some(Self::Complex),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}

/// One storey of the normalized configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSpec {
    pub kind: FloorKind,
    pub height_m: f64,
    pub panel_thickness_mm: u16,
}

/// A single operator-priced line item replacing the additional-works catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomWorkItem {
    pub name: String,
    /// Fee in whole tenge.
    pub price: i64,
}

/// Exactly one of the two variants is effective per calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdditionalWorks {
    /// Named entry resolved against the works catalog ("none" carries fee 0).
    Catalog(String),
    /// Ordered custom line items that fully replace the catalog entry.
    Custom(Vec<CustomWorkItem>),
}

/// Fully normalized description of one house to be priced. Constructed once
/// by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseConfiguration {
    pub area_m2: f64,
    /// One entry per storey, bounded by the requested floor count.
    pub floors: Vec<FloorSpec>,
    pub partition: String,
    pub ceiling: String,
    pub roof_type: String,
    pub shape: HouseShape,
    pub works: AdditionalWorks,
    pub delivery_city: String,
    pub vat_requested: bool,
    pub installment_requested: bool,
    /// Portion of the total the installment uplift applies to, in tenge.
    /// Zero means the uplift applies to the whole total.
    pub installment_amount: i64,
}

impl HouseConfiguration {
    pub fn floor_count(&self) -> u8 {
        self.floors.len() as u8
    }
}

/// Floor count as the adapter delivers it: either an integer or a localized
/// ordinal string such as "2 этажа" or "2 floors".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FloorCountParam {
    Count(u8),
    Ordinal(String),
}

/// Custom-work price as the adapter delivers it: a number or a digit string,
/// possibly with grouping spaces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceParam {
    Amount(f64),
    Text(String),
}

/// Custom-work line item before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomWorkInput {
    pub name: String,
    pub price: PriceParam,
}

/// Relaxed parameter set shared by the manual form and the conversational
/// adapter. Field names match the `calculate_sip_house_cost` tool contract.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub area: Option<f64>,
    pub floors: Option<FloorCountParam>,
    pub roof_type: Option<String>,
    pub first_floor_type: Option<String>,
    pub second_floor_type: Option<String>,
    pub third_floor_type: Option<String>,
    pub first_floor_height: Option<f64>,
    pub second_floor_height: Option<f64>,
    pub third_floor_height: Option<f64>,
    pub first_floor_thickness: Option<u16>,
    pub second_floor_thickness: Option<u16>,
    pub third_floor_thickness: Option<u16>,
    pub partition_type: Option<String>,
    pub ceiling: Option<String>,
    pub house_shape: Option<String>,
    pub additional_works: Option<String>,
    #[serde(default)]
    pub use_custom_works: bool,
    #[serde(default)]
    pub custom_works: Vec<CustomWorkInput>,
    pub city: Option<String>,
    #[serde(default)]
    pub has_vat: bool,
    #[serde(default)]
    pub has_installment: bool,
    pub installment_amount: Option<f64>,
}

/// Itemized result of one calculation. All amounts are whole tenge; the
/// itemized lines and `total` are pre-surcharge, `final_total` is the
/// payable amount after VAT/installment composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub foundation_cost: i64,
    pub kit_cost: i64,
    pub assembly_cost: i64,
    pub delivery_cost: i64,
    pub custom_works_cost: i64,
    pub total: i64,
    pub price_per_sqm: i64,
    pub final_total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_kind_accepts_localized_labels() {
        assert_eq!(FloorKind::parse(" Полноценный "), Some(FloorKind::Full));
        assert_eq!(FloorKind::parse("attic"), Some(FloorKind::Attic));
        assert_eq!(FloorKind::parse("basement"), None);
    }

    #[test]
    fn house_shape_accepts_localized_labels() {
        assert_eq!(HouseShape::parse("Сложная форма"), Some(HouseShape::Complex));
        assert_eq!(HouseShape::parse("SIMPLE"), Some(HouseShape::Simple));
        assert_eq!(HouseShape::parse("round"), None);
    }

    #[test]
    fn estimate_request_deserializes_relaxed_floor_count() {
        let numeric: EstimateRequest =
            serde_json::from_str(r#"{"area": 100, "floors": 2}"#).expect("numeric floors");
        assert_eq!(numeric.floors, Some(FloorCountParam::Count(2)));

        let ordinal: EstimateRequest =
            serde_json::from_str(r#"{"area": 100, "floors": "2 этажа"}"#).expect("ordinal floors");
        assert_eq!(
            ordinal.floors,
            Some(FloorCountParam::Ordinal("2 этажа".to_string()))
        );
    }

    #[test]
    fn custom_work_price_deserializes_from_number_or_text() {
        let raw = r#"{"useCustomWorks": true, "customWorks": [
            {"name": "well", "price": 120000},
            {"name": "fence", "price": "1 250 000"}
        ]}"#;
        let request: EstimateRequest = serde_json::from_str(raw).expect("custom works parse");
        assert_eq!(request.custom_works.len(), 2);
        assert_eq!(
            request.custom_works[1].price,
            PriceParam::Text("1 250 000".to_string())
        );
    }
}
