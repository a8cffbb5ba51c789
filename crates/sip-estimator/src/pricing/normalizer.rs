use super::domain::{
    AdditionalWorks, CustomWorkInput, CustomWorkItem, EstimateRequest, FloorCountParam, FloorKind,
    FloorSpec, HouseConfiguration, HouseShape, PriceParam, DEFAULT_FLOOR_HEIGHT_M,
    DEFAULT_PANEL_THICKNESS_MM, MAX_AREA_M2, MIN_AREA_M2,
};
use super::tables::PricingTables;
use super::CalculationError;

/// Applies every documented default, validates against the injected tables,
/// and builds the immutable configuration the engine prices. Pure function
/// of its input and the tables; nothing downstream re-validates.
pub(crate) fn normalize(
    request: EstimateRequest,
    tables: &PricingTables,
) -> Result<HouseConfiguration, CalculationError> {
    let area_m2 = request
        .area
        .ok_or(CalculationError::MissingRequiredField { field: "area" })?;
    if !area_m2.is_finite() || !(MIN_AREA_M2..=MAX_AREA_M2).contains(&area_m2) {
        return Err(CalculationError::OutOfRange {
            field: "area",
            value: area_m2,
            min: MIN_AREA_M2,
            max: MAX_AREA_M2,
        });
    }

    let floor_count = floor_count(request.floors.as_ref())?;
    let floors = floor_specs(&request, floor_count)?;

    let roof_type = normalize_text(
        request.roof_type.as_deref(),
        "roof_type",
        None,
    )?;
    if !tables.has_roof_type(&roof_type) {
        return Err(CalculationError::InvalidEnum {
            field: "roof_type",
            value: roof_type,
        });
    }

    let partition = normalize_text(
        request.partition_type.as_deref(),
        "partition_type",
        Some(&tables.default_partition),
    )?;
    if !tables.has_partition(&partition) {
        return Err(CalculationError::InvalidEnum {
            field: "partition_type",
            value: partition,
        });
    }

    let ceiling = normalize_text(
        request.ceiling.as_deref(),
        "ceiling",
        Some(&tables.default_ceiling),
    )?;
    if !tables.has_ceiling(&ceiling) {
        return Err(CalculationError::InvalidEnum {
            field: "ceiling",
            value: ceiling,
        });
    }

    let shape = match request.house_shape.as_deref() {
        None => HouseShape::Simple,
        Some(raw) => {
            HouseShape::parse(raw).ok_or_else(|| CalculationError::InvalidEnum {
                field: "house_shape",
                value: raw.to_string(),
            })?
        }
    };

    let works = additional_works(&request, tables)?;

    let delivery_city = normalize_text(request.city.as_deref(), "city", None)?;
    if tables.delivery_fee(&delivery_city).is_none() {
        return Err(CalculationError::UnknownCity {
            city: delivery_city,
        });
    }

    let installment_amount = match request.installment_amount {
        None => 0,
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount.round() as i64,
        Some(amount) => {
            return Err(CalculationError::OutOfRange {
                field: "installment_amount",
                value: amount,
                min: 0.0,
                max: f64::MAX,
            })
        }
    };

    Ok(HouseConfiguration {
        area_m2,
        floors,
        partition,
        ceiling,
        roof_type,
        shape,
        works,
        delivery_city,
        vat_requested: request.has_vat,
        installment_requested: request.has_installment,
        installment_amount,
    })
}

fn floor_count(param: Option<&FloorCountParam>) -> Result<u8, CalculationError> {
    let param = param.ok_or(CalculationError::MissingRequiredField { field: "floors" })?;
    let count = match param {
        FloorCountParam::Count(count) => Some(*count),
        // The adapter may hand over a localized ordinal such as "2 этажа"
        // or "2 floors"; the leading integer is authoritative.
        FloorCountParam::Ordinal(raw) => leading_integer(raw),
    };

    match count {
        Some(count @ 1..=3) => Ok(count),
        _ => Err(CalculationError::InvalidEnum {
            field: "floors",
            value: match param {
                FloorCountParam::Count(count) => count.to_string(),
                FloorCountParam::Ordinal(raw) => raw.clone(),
            },
        }),
    }
}

fn leading_integer(raw: &str) -> Option<u8> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Per-storey fields for floors beyond the requested count are never read.
fn floor_specs(
    request: &EstimateRequest,
    floor_count: u8,
) -> Result<Vec<FloorSpec>, CalculationError> {
    let kinds = [
        (&request.first_floor_type, "first_floor_type"),
        (&request.second_floor_type, "second_floor_type"),
        (&request.third_floor_type, "third_floor_type"),
    ];
    let heights = [
        (&request.first_floor_height, "first_floor_height"),
        (&request.second_floor_height, "second_floor_height"),
        (&request.third_floor_height, "third_floor_height"),
    ];
    let thicknesses = [
        request.first_floor_thickness,
        request.second_floor_thickness,
        request.third_floor_thickness,
    ];

    let mut floors = Vec::with_capacity(floor_count as usize);
    for index in 0..floor_count as usize {
        let kind = match kinds[index].0.as_deref() {
            None => FloorKind::Full,
            Some(raw) => FloorKind::parse(raw).ok_or_else(|| CalculationError::InvalidEnum {
                field: kinds[index].1,
                value: raw.to_string(),
            })?,
        };

        let height_m = heights[index].0.unwrap_or(DEFAULT_FLOOR_HEIGHT_M);
        if !height_m.is_finite() || height_m <= 0.0 {
            return Err(CalculationError::OutOfRange {
                field: heights[index].1,
                value: height_m,
                min: 0.0,
                max: f64::MAX,
            });
        }

        floors.push(FloorSpec {
            kind,
            height_m,
            panel_thickness_mm: thicknesses[index].unwrap_or(DEFAULT_PANEL_THICKNESS_MM),
        });
    }

    Ok(floors)
}

fn additional_works(
    request: &EstimateRequest,
    tables: &PricingTables,
) -> Result<AdditionalWorks, CalculationError> {
    if request.use_custom_works {
        let items = request
            .custom_works
            .iter()
            .map(custom_work_item)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(AdditionalWorks::Custom(items));
    }

    let name = request
        .additional_works
        .clone()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| tables.default_works.clone());

    if tables.work_fee(&name).is_none() {
        return Err(CalculationError::InvalidEnum {
            field: "additional_works",
            value: name,
        });
    }

    Ok(AdditionalWorks::Catalog(name))
}

fn custom_work_item(input: &CustomWorkInput) -> Result<CustomWorkItem, CalculationError> {
    let price = match &input.price {
        PriceParam::Amount(amount) if amount.is_finite() => amount.round() as i64,
        PriceParam::Amount(_) => {
            return Err(CalculationError::InvalidLineItem {
                name: input.name.clone(),
                reason: "price is not a finite number".to_string(),
            })
        }
        PriceParam::Text(raw) => {
            let digits: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
            digits
                .parse::<i64>()
                .map_err(|_| CalculationError::InvalidLineItem {
                    name: input.name.clone(),
                    reason: format!("price '{raw}' is not a number"),
                })?
        }
    };

    if price < 0 {
        return Err(CalculationError::InvalidLineItem {
            name: input.name.clone(),
            reason: format!("negative price {price}"),
        });
    }

    Ok(CustomWorkItem {
        name: input.name.clone(),
        price,
    })
}

fn normalize_text(
    raw: Option<&str>,
    field: &'static str,
    default: Option<&str>,
) -> Result<String, CalculationError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => match default {
            Some(value) => Ok(value.to_string()),
            None => Err(CalculationError::MissingRequiredField { field }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EstimateRequest {
        EstimateRequest {
            area: Some(100.0),
            floors: Some(FloorCountParam::Count(1)),
            roof_type: Some("2-pitch".to_string()),
            first_floor_height: Some(2.5),
            city: Some("Astana".to_string()),
            ..EstimateRequest::default()
        }
    }

    #[test]
    fn fills_every_documented_default() {
        let tables = PricingTables::standard();
        let config = normalize(request(), &tables).expect("valid request normalizes");

        assert_eq!(config.floors.len(), 1);
        assert_eq!(config.floors[0].kind, FloorKind::Full);
        assert_eq!(config.floors[0].height_m, DEFAULT_FLOOR_HEIGHT_M);
        assert_eq!(config.floors[0].panel_thickness_mm, DEFAULT_PANEL_THICKNESS_MM);
        assert_eq!(config.partition, tables.default_partition);
        assert_eq!(config.ceiling, tables.default_ceiling);
        assert_eq!(config.shape, HouseShape::Simple);
        assert_eq!(config.works, AdditionalWorks::Catalog("none".to_string()));
        assert!(!config.vat_requested);
        assert!(!config.installment_requested);
        assert_eq!(config.installment_amount, 0);
    }

    #[test]
    fn rejects_area_outside_supported_range() {
        let tables = PricingTables::standard();
        for bad in [9.9, 1500.1, f64::NAN] {
            let mut raw = request();
            raw.area = Some(bad);
            assert!(matches!(
                normalize(raw, &tables),
                Err(CalculationError::OutOfRange { field: "area", .. })
            ));
        }
    }

    #[test]
    fn missing_required_fields_are_reported_by_name() {
        let tables = PricingTables::standard();
        let cases: [(fn(&mut EstimateRequest), &str); 4] = [
            (|raw| raw.area = None, "area"),
            (|raw| raw.floors = None, "floors"),
            (|raw| raw.roof_type = None, "roof_type"),
            (|raw| raw.city = None, "city"),
        ];
        for (strip, expected) in cases {
            let mut raw = request();
            strip(&mut raw);
            match normalize(raw, &tables) {
                Err(CalculationError::MissingRequiredField { field }) => {
                    assert_eq!(field, expected)
                }
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parses_localized_ordinal_floor_counts() {
        let tables = PricingTables::standard();
        for raw_floors in ["2 этажа", "2 floors", " 2 "] {
            let mut raw = request();
            raw.floors = Some(FloorCountParam::Ordinal(raw_floors.to_string()));
            raw.second_floor_height = Some(2.5);
            let config = normalize(raw, &tables).expect("ordinal parses");
            assert_eq!(config.floor_count(), 2);
        }
    }

    #[test]
    fn rejects_unsupported_floor_counts() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.floors = Some(FloorCountParam::Count(4));
        assert!(matches!(
            normalize(raw, &tables),
            Err(CalculationError::InvalidEnum { field: "floors", .. })
        ));

        let mut raw = request();
        raw.floors = Some(FloorCountParam::Ordinal("many".to_string()));
        assert!(matches!(
            normalize(raw, &tables),
            Err(CalculationError::InvalidEnum { field: "floors", .. })
        ));
    }

    #[test]
    fn fields_beyond_floor_count_are_ignored() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.third_floor_type = Some("basement".to_string());
        raw.third_floor_height = Some(-4.0);
        let config = normalize(raw, &tables).expect("extra floor fields are not read");
        assert_eq!(config.floor_count(), 1);
    }

    #[test]
    fn unknown_catalog_values_are_invalid_enums() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.roof_type = Some("flat".to_string());
        assert!(matches!(
            normalize(raw, &tables),
            Err(CalculationError::InvalidEnum {
                field: "roof_type",
                ..
            })
        ));

        let mut raw = request();
        raw.additional_works = Some("gold plating".to_string());
        assert!(matches!(
            normalize(raw, &tables),
            Err(CalculationError::InvalidEnum {
                field: "additional_works",
                ..
            })
        ));
    }

    #[test]
    fn unknown_city_is_a_hard_error() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.city = Some("Atlantis".to_string());
        match normalize(raw, &tables) {
            Err(CalculationError::UnknownCity { city }) => assert_eq!(city, "Atlantis"),
            other => panic!("expected unknown city, got {other:?}"),
        }
    }

    #[test]
    fn custom_works_replace_the_catalog_entry() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.use_custom_works = true;
        raw.additional_works = Some("exterior siding".to_string());
        raw.custom_works = vec![CustomWorkInput {
            name: "well drilling".to_string(),
            price: PriceParam::Text("1 250 000".to_string()),
        }];
        let config = normalize(raw, &tables).expect("custom works normalize");
        assert_eq!(
            config.works,
            AdditionalWorks::Custom(vec![CustomWorkItem {
                name: "well drilling".to_string(),
                price: 1_250_000,
            }])
        );
    }

    #[test]
    fn negative_custom_work_price_is_rejected() {
        let tables = PricingTables::standard();
        let mut raw = request();
        raw.use_custom_works = true;
        raw.custom_works = vec![CustomWorkInput {
            name: "rebate".to_string(),
            price: PriceParam::Amount(-5_000.0),
        }];
        assert!(matches!(
            normalize(raw, &tables),
            Err(CalculationError::InvalidLineItem { .. })
        ));
    }
}
