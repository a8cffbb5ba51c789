use super::domain::CostBreakdown;
use super::engine::PricedQuote;

/// Shapes the internal computation state into the stable output contract.
/// Every field is a whole tenge amount and always present; `delivery_cost`
/// and `custom_works_cost` are 0 when inapplicable, never absent, so
/// consumers never branch on missing keys.
pub(crate) fn assemble(quote: PricedQuote, final_total: i64) -> CostBreakdown {
    let PricedQuote {
        foundation_cost,
        kit_cost,
        assembly_cost,
        delivery_cost,
        custom_works_cost,
        total,
        price_per_sqm,
    } = quote;

    CostBreakdown {
        foundation_cost,
        kit_cost,
        assembly_cost,
        delivery_cost,
        custom_works_cost,
        total,
        price_per_sqm,
        final_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_serializes_as_a_plain_integer() {
        let breakdown = assemble(
            PricedQuote {
                foundation_cost: 2_760_563,
                kit_cost: 14_000_000,
                assembly_cost: 2_957_747,
                delivery_cost: 0,
                custom_works_cost: 0,
                total: 19_718_310,
                price_per_sqm: 197_183,
            },
            19_718_310,
        );

        let value = serde_json::to_value(breakdown).expect("breakdown serializes");
        let object = value.as_object().expect("breakdown is an object");
        assert_eq!(object.len(), 8);
        for (field, amount) in object {
            assert!(amount.is_i64(), "{field} is not a plain integer: {amount}");
        }
        assert_eq!(object["delivery_cost"], 0);
        assert_eq!(object["custom_works_cost"], 0);
    }
}
