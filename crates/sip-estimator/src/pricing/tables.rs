use super::domain::FloorKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the unit-price rule table, keyed by floor count, first-floor
/// kind, and roof type. The complex-shape uplift and the height premium are
/// layered on top of the resolved rate by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRate {
    pub floors: u8,
    pub first_floor: FloorKind,
    pub roof_type: String,
    /// Tenge per m² of footprint.
    pub rate_per_m2: i64,
}

/// Flat delivery fee for one destination city. Aliases cover the localized
/// spellings the conversational adapter passes through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFee {
    pub city: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub fee: i64,
}

impl DeliveryFee {
    fn matches(&self, requested: &str) -> bool {
        let requested = requested.trim().to_lowercase();
        self.city.trim().to_lowercase() == requested
            || self
                .aliases
                .iter()
                .any(|alias| alias.trim().to_lowercase() == requested)
    }
}

/// Named additional-works package with a fixed fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub name: String,
    pub fee: i64,
}

/// The tunable pricing knobs of the estimator. Everything an operator may
/// recalibrate lives here as data; the engine contains no price constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTables {
    /// Date the calibration was published, surfaced alongside quotes.
    pub effective_from: NaiveDate,
    pub base_rates: Vec<BaseRate>,
    /// Relative uplift on the unit price for complex-plan houses (0.08 = +8%).
    pub complex_shape_uplift: f64,
    /// Tenge per m² added for every centimetre of storey height above the
    /// standard 2.5 m.
    pub height_premium_per_m2_per_cm: i64,
    /// Storey height at which the premium starts, in metres.
    pub standard_floor_height_m: f64,
    pub partitions: Vec<String>,
    pub default_partition: String,
    pub ceilings: Vec<String>,
    pub default_ceiling: String,
    pub additional_works: Vec<WorkEntry>,
    /// Catalog entry meaning "no additional works"; always fee 0.
    pub default_works: String,
    pub delivery_fees: Vec<DeliveryFee>,
    pub vat_rate: f64,
    pub installment_rate: f64,
}

fn key_eq(configured: &str, requested: &str) -> bool {
    configured.trim().eq_ignore_ascii_case(requested.trim())
}

impl PricingTables {
    /// Distinct roof types configured in the rate table, in first-seen order.
    pub fn roof_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for rate in &self.base_rates {
            if !seen.iter().any(|known| key_eq(known, &rate.roof_type)) {
                seen.push(&rate.roof_type);
            }
        }
        seen
    }

    pub fn base_rate(&self, floors: u8, first_floor: FloorKind, roof_type: &str) -> Option<i64> {
        self.base_rates
            .iter()
            .find(|rate| {
                rate.floors == floors
                    && rate.first_floor == first_floor
                    && key_eq(&rate.roof_type, roof_type)
            })
            .map(|rate| rate.rate_per_m2)
    }

    pub fn has_roof_type(&self, roof_type: &str) -> bool {
        self.base_rates
            .iter()
            .any(|rate| key_eq(&rate.roof_type, roof_type))
    }

    pub fn delivery_fee(&self, city: &str) -> Option<i64> {
        self.delivery_fees
            .iter()
            .find(|entry| entry.matches(city))
            .map(|entry| entry.fee)
    }

    pub fn work_fee(&self, name: &str) -> Option<i64> {
        self.additional_works
            .iter()
            .find(|entry| key_eq(&entry.name, name))
            .map(|entry| entry.fee)
    }

    pub fn has_partition(&self, name: &str) -> bool {
        self.partitions.iter().any(|known| key_eq(known, name))
    }

    pub fn has_ceiling(&self, name: &str) -> bool {
        self.ceilings.iter().any(|known| key_eq(known, name))
    }

    /// Reference calibration shipped with the estimator. Illustrative and
    /// replaceable; operators override it via CSV imports or their own
    /// serialized tables.
    pub fn standard() -> Self {
        Self {
            effective_from: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid calibration date"),
            base_rates: standard_base_rates(),
            complex_shape_uplift: 0.08,
            height_premium_per_m2_per_cm: 500,
            standard_floor_height_m: 2.5,
            partitions: vec![
                "profile + drywall + mineral wool 100mm".to_string(),
                "timber frame + drywall 100mm".to_string(),
                "sip panel 163mm".to_string(),
            ],
            default_partition: "profile + drywall + mineral wool 100mm".to_string(),
            ceilings: vec![
                "insulated ceiling, 145mm polystyrene".to_string(),
                "insulated ceiling, 195mm polystyrene".to_string(),
                "open beam ceiling".to_string(),
            ],
            default_ceiling: "insulated ceiling, 145mm polystyrene".to_string(),
            additional_works: vec![
                WorkEntry {
                    name: "none".to_string(),
                    fee: 0,
                },
                WorkEntry {
                    name: "interior plasterboard lining".to_string(),
                    fee: 850_000,
                },
                WorkEntry {
                    name: "exterior siding".to_string(),
                    fee: 1_200_000,
                },
                WorkEntry {
                    name: "soft roof covering".to_string(),
                    fee: 640_000,
                },
            ],
            default_works: "none".to_string(),
            // Factory city ships free but must still be listed: an unknown
            // city is a hard error, never a silent zero.
            delivery_fees: standard_delivery_fees(),
            vat_rate: 0.16,
            installment_rate: 0.17,
        }
    }
}

fn standard_delivery_fees() -> Vec<DeliveryFee> {
    let grid: [(&str, &str, i64); 10] = [
        ("Almaty", "Алматы", 0),
        ("Astana", "Астана", 300_000),
        ("Shymkent", "Шымкент", 160_000),
        ("Karaganda", "Караганда", 240_000),
        ("Taraz", "Тараз", 120_000),
        ("Aktobe", "Актобе", 420_000),
        ("Pavlodar", "Павлодар", 310_000),
        ("Oskemen", "Усть-Каменогорск", 280_000),
        ("Atyrau", "Атырау", 460_000),
        ("Kostanay", "Костанай", 330_000),
    ];

    grid.into_iter()
        .map(|(city, alias, fee)| DeliveryFee {
            city: city.to_string(),
            aliases: vec![alias.to_string()],
            fee,
        })
        .collect()
}

fn standard_base_rates() -> Vec<BaseRate> {
    let grid: [(u8, FloorKind, &str, i64); 18] = [
        (1, FloorKind::Full, "1-pitch", 135_000),
        (1, FloorKind::Full, "2-pitch", 140_000),
        (1, FloorKind::Full, "4-pitch", 150_000),
        (1, FloorKind::Attic, "1-pitch", 123_000),
        (1, FloorKind::Attic, "2-pitch", 128_000),
        (1, FloorKind::Attic, "4-pitch", 137_000),
        (2, FloorKind::Full, "1-pitch", 149_000),
        (2, FloorKind::Full, "2-pitch", 155_000),
        (2, FloorKind::Full, "4-pitch", 166_000),
        (2, FloorKind::Attic, "1-pitch", 138_000),
        (2, FloorKind::Attic, "2-pitch", 143_000),
        (2, FloorKind::Attic, "4-pitch", 153_000),
        (3, FloorKind::Full, "1-pitch", 159_000),
        (3, FloorKind::Full, "2-pitch", 166_000),
        (3, FloorKind::Full, "4-pitch", 178_000),
        (3, FloorKind::Attic, "1-pitch", 148_000),
        (3, FloorKind::Attic, "2-pitch", 154_000),
        (3, FloorKind::Attic, "4-pitch", 165_000),
    ];

    grid.into_iter()
        .map(|(floors, first_floor, roof_type, rate_per_m2)| BaseRate {
            floors,
            first_floor,
            roof_type: roof_type.to_string(),
            rate_per_m2,
        })
        .collect()
}
