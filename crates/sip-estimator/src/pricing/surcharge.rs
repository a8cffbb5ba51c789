use super::domain::HouseConfiguration;
use super::tables::PricingTables;

/// Applies the commercial surcharges to the pre-surcharge total. The order
/// is fixed: VAT first, then installment; rounding happens once at the end
/// so the two uplifts never compound rounding error. Itemized lines are
/// untouched; callers display them pre-surcharge next to the grand total.
pub(crate) fn apply(
    pre_surcharge_total: i64,
    config: &HouseConfiguration,
    tables: &PricingTables,
) -> i64 {
    let mut total = pre_surcharge_total as f64;

    if config.vat_requested {
        total *= 1.0 + tables.vat_rate;
    }

    if config.installment_requested {
        if config.installment_amount > 0 {
            total += config.installment_amount as f64 * tables.installment_rate;
        } else {
            total *= 1.0 + tables.installment_rate;
        }
    }

    total.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::domain::{
        AdditionalWorks, FloorKind, FloorSpec, HouseConfiguration, HouseShape,
    };

    fn config(vat: bool, installment: bool, amount: i64) -> HouseConfiguration {
        HouseConfiguration {
            area_m2: 100.0,
            floors: vec![FloorSpec {
                kind: FloorKind::Full,
                height_m: 2.5,
                panel_thickness_mm: 163,
            }],
            partition: String::new(),
            ceiling: String::new(),
            roof_type: "2-pitch".to_string(),
            shape: HouseShape::Simple,
            works: AdditionalWorks::Catalog("none".to_string()),
            delivery_city: "Astana".to_string(),
            vat_requested: vat,
            installment_requested: installment,
            installment_amount: amount,
        }
    }

    #[test]
    fn no_surcharges_leaves_the_total_untouched() {
        let tables = PricingTables::standard();
        assert_eq!(apply(20_018_310, &config(false, false, 0), &tables), 20_018_310);
    }

    #[test]
    fn vat_only_multiplies_and_rounds_once() {
        let tables = PricingTables::standard();
        // 20,018,310 × 1.16 = 23,221,239.6
        assert_eq!(apply(20_018_310, &config(true, false, 0), &tables), 23_221_240);
    }

    #[test]
    fn installment_with_amount_uplifts_only_that_amount() {
        let tables = PricingTables::standard();
        // 20,018,310 + 5,000,000 × 0.17
        assert_eq!(
            apply(20_018_310, &config(false, true, 5_000_000), &tables),
            20_868_310
        );
    }

    #[test]
    fn installment_without_amount_uplifts_the_whole_total() {
        let tables = PricingTables::standard();
        assert_eq!(
            apply(20_018_310, &config(false, true, 0), &tables),
            (20_018_310_f64 * 1.17).round() as i64
        );
    }

    #[test]
    fn vat_applies_before_the_installment_amount() {
        let tables = PricingTables::standard();
        let total = 20_018_310;
        let amount = 5_000_000;
        let composed = apply(total, &config(true, true, amount), &tables);

        let vat_first = (total as f64 * 1.16 + amount as f64 * 0.17).round() as i64;
        let installment_first = ((total as f64 + amount as f64 * 0.17) * 1.16).round() as i64;

        assert_eq!(composed, vat_first);
        assert_ne!(composed, installment_first);
    }
}
