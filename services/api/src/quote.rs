use crate::cli::CatalogArgs;
use crate::infra::{build_tables, TableOverrideArgs};
use clap::Args;
use sip_estimator::config::AppConfig;
use sip_estimator::error::AppError;
use sip_estimator::pricing::toolcall::format_amount;
use sip_estimator::pricing::{
    CostBreakdown, CostCalculator, CustomWorkInput, EstimateRequest, FloorCountParam, PriceParam,
    PricingTables,
};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Footprint area in m² (10 to 1500)
    #[arg(long)]
    pub(crate) area: f64,
    /// Number of storeys: 1, 2, or 3 (ordinals like "2 этажа" also work)
    #[arg(long)]
    pub(crate) floors: String,
    /// Roof type from the configured catalog, e.g. "2-pitch"
    #[arg(long)]
    pub(crate) roof_type: String,
    /// Delivery city from the configured table
    #[arg(long)]
    pub(crate) city: String,
    /// First storey kind: "full" (default) or "attic"
    #[arg(long)]
    pub(crate) first_floor_type: Option<String>,
    /// First storey height in metres (defaults to 2.5)
    #[arg(long)]
    pub(crate) first_floor_height: Option<f64>,
    /// Second storey height in metres
    #[arg(long)]
    pub(crate) second_floor_height: Option<f64>,
    /// Third storey height in metres
    #[arg(long)]
    pub(crate) third_floor_height: Option<f64>,
    /// Plan complexity: "simple" (default) or "complex"
    #[arg(long)]
    pub(crate) house_shape: Option<String>,
    /// Named additional-works package from the catalog
    #[arg(long)]
    pub(crate) additional_works: Option<String>,
    /// Custom work line item as name=price; repeatable, replaces the catalog
    /// selection entirely
    #[arg(long = "custom-work", value_parser = parse_custom_work)]
    pub(crate) custom_works: Vec<CustomWorkInput>,
    /// Quote with VAT
    #[arg(long)]
    pub(crate) with_vat: bool,
    /// Quote with installment terms
    #[arg(long)]
    pub(crate) with_installment: bool,
    /// Portion of the total paid in installments
    #[arg(long)]
    pub(crate) installment_amount: Option<f64>,
    #[command(flatten)]
    pub(crate) tables: TableOverrideArgs,
}

fn parse_custom_work(raw: &str) -> Result<CustomWorkInput, String> {
    let (name, price) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=price, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("custom work in '{raw}' has no name"));
    }
    Ok(CustomWorkInput {
        name: name.trim().to_string(),
        price: PriceParam::Text(price.trim().to_string()),
    })
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tables = build_tables(&args.tables, &config.tables)?;
    let calculator = CostCalculator::new(tables);

    let use_custom_works = !args.custom_works.is_empty();
    let request = EstimateRequest {
        area: Some(args.area),
        floors: Some(FloorCountParam::Ordinal(args.floors.clone())),
        roof_type: Some(args.roof_type.clone()),
        first_floor_type: args.first_floor_type.clone(),
        first_floor_height: args.first_floor_height,
        second_floor_height: args.second_floor_height,
        third_floor_height: args.third_floor_height,
        house_shape: args.house_shape.clone(),
        additional_works: args.additional_works.clone(),
        use_custom_works,
        custom_works: args.custom_works.clone(),
        city: Some(args.city.clone()),
        has_vat: args.with_vat,
        has_installment: args.with_installment,
        installment_amount: args.installment_amount,
        ..EstimateRequest::default()
    };

    let breakdown = calculator.calculate(request)?;
    render_estimate(&args, calculator.tables(), &breakdown);
    Ok(())
}

fn render_estimate(args: &EstimateArgs, tables: &PricingTables, breakdown: &CostBreakdown) {
    println!(
        "SIP house cost estimate (tables effective {})",
        tables.effective_from
    );
    println!(
        "Configuration: {} m² | {} | roof {} | delivery to {}",
        args.area, args.floors, args.roof_type, args.city
    );

    println!("\nItemized (before surcharges)");
    println!(
        "- Foundation: {} ₸",
        format_amount(breakdown.foundation_cost)
    );
    println!("- House kit: {} ₸", format_amount(breakdown.kit_cost));
    println!("- Assembly: {} ₸", format_amount(breakdown.assembly_cost));
    println!("- Delivery: {} ₸", format_amount(breakdown.delivery_cost));
    println!(
        "- Additional works: {} ₸",
        format_amount(breakdown.custom_works_cost)
    );
    println!("Total: {} ₸", format_amount(breakdown.total));
    println!("Price per m²: {} ₸", format_amount(breakdown.price_per_sqm));

    if args.with_vat || args.with_installment {
        let mut terms = Vec::new();
        if args.with_vat {
            terms.push("VAT".to_string());
        }
        if args.with_installment {
            match args.installment_amount {
                Some(amount) if amount > 0.0 => terms.push(format!(
                    "installment on {} ₸",
                    format_amount(amount.round() as i64)
                )),
                _ => terms.push("installment on the whole total".to_string()),
            }
        }
        println!(
            "\nPayable total ({}): {} ₸",
            terms.join(", "),
            format_amount(breakdown.final_total)
        );
    } else {
        println!("\nPayable total: {} ₸", format_amount(breakdown.final_total));
    }
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tables = build_tables(&args.tables, &config.tables)?;

    println!("Pricing catalogs (effective {})", tables.effective_from);

    println!("\nRoof types");
    for roof in tables.roof_types() {
        println!("- {roof}");
    }

    println!("\nHouse shapes");
    println!("- simple");
    println!(
        "- complex (+{:.0}% on the unit price)",
        tables.complex_shape_uplift * 100.0
    );

    println!("\nPartitions (default: {})", tables.default_partition);
    for partition in &tables.partitions {
        println!("- {partition}");
    }

    println!("\nCeilings (default: {})", tables.default_ceiling);
    for ceiling in &tables.ceilings {
        println!("- {ceiling}");
    }

    println!("\nAdditional works");
    for entry in &tables.additional_works {
        println!("- {}: {} ₸", entry.name, format_amount(entry.fee));
    }

    println!("\nDelivery cities");
    for entry in &tables.delivery_fees {
        println!("- {}: {} ₸", entry.city, format_amount(entry.fee));
    }

    Ok(())
}
