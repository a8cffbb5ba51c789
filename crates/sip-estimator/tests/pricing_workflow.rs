//! Integration specifications for the pricing workflow, exercised through
//! the public `CostCalculator` facade so normalization, the rule engine,
//! surcharge composition, and result assembly are validated together.

mod common {
    use sip_estimator::pricing::EstimateRequest;

    /// The reference calibration scenario: 100 m², one full storey, 2-pitch
    /// roof, simple shape, delivery to a city with a 300,000 flat fee.
    pub(super) fn reference_request() -> EstimateRequest {
        serde_json::from_value(serde_json::json!({
            "area": 100,
            "floors": 1,
            "firstFloorType": "full",
            "roofType": "2-pitch",
            "firstFloorHeight": 2.5,
            "houseShape": "simple",
            "city": "Astana",
        }))
        .expect("reference request deserializes")
    }
}

use common::reference_request;
use sip_estimator::pricing::{CalculationError, CostCalculator, EstimateRequest, FloorCountParam};

#[test]
fn reference_scenario_produces_the_documented_breakdown() {
    let calculator = CostCalculator::standard();
    let breakdown = calculator
        .calculate(reference_request())
        .expect("reference scenario calculates");

    assert_eq!(breakdown.kit_cost, 14_000_000);
    assert_eq!(breakdown.foundation_cost, 2_760_563);
    assert_eq!(breakdown.assembly_cost, 2_957_747);
    assert_eq!(breakdown.delivery_cost, 300_000);
    assert_eq!(breakdown.custom_works_cost, 0);
    assert_eq!(breakdown.total, 20_018_310);
    assert_eq!(breakdown.price_per_sqm, 200_183);
    // No surcharges requested, so the payable total equals the itemized one.
    assert_eq!(breakdown.final_total, 20_018_310);
}

#[test]
fn vat_uplifts_only_the_final_total() {
    let calculator = CostCalculator::standard();
    let mut request = reference_request();
    request.has_vat = true;

    let breakdown = calculator.calculate(request).expect("vat scenario calculates");

    assert_eq!(breakdown.final_total, 23_221_240);
    // Itemized lines stay pre-surcharge.
    assert_eq!(breakdown.total, 20_018_310);
    assert_eq!(breakdown.kit_cost, 14_000_000);
    assert_eq!(breakdown.price_per_sqm, 200_183);
}

#[test]
fn installment_with_amount_uplifts_that_amount_only() {
    let calculator = CostCalculator::standard();
    let mut request = reference_request();
    request.has_installment = true;
    request.installment_amount = Some(5_000_000.0);

    let breakdown = calculator
        .calculate(request)
        .expect("installment scenario calculates");
    assert_eq!(breakdown.final_total, 20_018_310 + 850_000);
}

#[test]
fn combined_surcharges_apply_vat_first() {
    let calculator = CostCalculator::standard();
    let mut request = reference_request();
    request.has_vat = true;
    request.has_installment = true;
    request.installment_amount = Some(5_000_000.0);

    let breakdown = calculator
        .calculate(request)
        .expect("combined scenario calculates");

    let vat_first = (20_018_310_f64 * 1.16 + 5_000_000.0 * 0.17).round() as i64;
    let installment_first = ((20_018_310_f64 + 5_000_000.0 * 0.17) * 1.16).round() as i64;
    assert_eq!(breakdown.final_total, vat_first);
    assert_ne!(breakdown.final_total, installment_first);
}

#[test]
fn repeated_calculations_are_byte_identical() {
    let calculator = CostCalculator::standard();
    let first = calculator
        .calculate(reference_request())
        .expect("first calculation");
    let second = calculator
        .calculate(reference_request())
        .expect("second calculation");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).expect("first serializes"),
        serde_json::to_vec(&second).expect("second serializes")
    );
}

#[test]
fn ordinal_floor_strings_price_like_their_integer_form() {
    let calculator = CostCalculator::standard();
    let mut ordinal = reference_request();
    ordinal.floors = Some(FloorCountParam::Ordinal("1 этаж".to_string()));

    let from_integer = calculator
        .calculate(reference_request())
        .expect("integer floors calculate");
    let from_ordinal = calculator
        .calculate(ordinal)
        .expect("ordinal floors calculate");
    assert_eq!(from_integer, from_ordinal);
}

#[test]
fn unknown_city_yields_no_partial_breakdown() {
    let calculator = CostCalculator::standard();
    let mut request = reference_request();
    request.city = Some("Atlantis".to_string());

    match calculator.calculate(request) {
        Err(CalculationError::UnknownCity { city }) => assert_eq!(city, "Atlantis"),
        other => panic!("expected UnknownCity, got {other:?}"),
    }
}

#[test]
fn empty_request_reports_the_first_missing_field() {
    let calculator = CostCalculator::standard();
    match calculator.calculate(EstimateRequest::default()) {
        Err(CalculationError::MissingRequiredField { field }) => assert_eq!(field, "area"),
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn custom_works_replace_the_catalog_fee_entirely() {
    let calculator = CostCalculator::standard();
    let mut request = reference_request();
    // The catalog selection must be ignored once custom works are in play.
    request.additional_works = Some("exterior siding".to_string());
    request.use_custom_works = true;
    request.custom_works = serde_json::from_value(serde_json::json!([
        {"name": "well drilling", "price": "1 250 000"},
        {"name": "septic tank", "price": 780000}
    ]))
    .expect("custom works deserialize");

    let breakdown = calculator
        .calculate(request)
        .expect("custom works calculate");
    assert_eq!(breakdown.custom_works_cost, 2_030_000);
    assert_eq!(breakdown.total, 20_018_310 + 2_030_000);
}

#[test]
fn subtotal_split_holds_for_every_floor_and_roof_combination() {
    let calculator = CostCalculator::standard();
    let roofs = ["1-pitch", "2-pitch", "4-pitch"];

    for floors in 1..=3u8 {
        for roof in roofs {
            let mut request = reference_request();
            request.floors = Some(FloorCountParam::Count(floors));
            request.roof_type = Some(roof.to_string());

            let breakdown = calculator
                .calculate(request)
                .expect("combination calculates");
            let subtotal =
                breakdown.foundation_cost + breakdown.kit_cost + breakdown.assembly_cost;
            assert_eq!(breakdown.total, subtotal + breakdown.delivery_cost);

            let subtotal_f = subtotal as f64;
            for (share, amount) in [
                (0.14, breakdown.foundation_cost),
                (0.71, breakdown.kit_cost),
                (0.15, breakdown.assembly_cost),
            ] {
                assert!(
                    (amount as f64 - subtotal_f * share).abs() <= 1.0,
                    "share {share} off for {floors} floors / {roof}"
                );
            }
        }
    }
}
