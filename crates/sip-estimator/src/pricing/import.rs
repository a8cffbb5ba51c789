//! CSV import for operator-maintained pricing data. Delivery fees and base
//! rates arrive as spreadsheet exports; everything else ships in the
//! serialized tables.

use super::domain::FloorKind;
use super::tables::{BaseRate, DeliveryFee, PricingTables};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum TableImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    NegativeFee { city: String, fee: i64 },
    InvalidRate { roof_type: String, detail: String },
    Empty,
}

impl std::fmt::Display for TableImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableImportError::Io(err) => write!(f, "failed to read table export: {}", err),
            TableImportError::Csv(err) => write!(f, "invalid table CSV data: {}", err),
            TableImportError::NegativeFee { city, fee } => {
                write!(f, "delivery fee for '{}' is negative ({})", city, fee)
            }
            TableImportError::InvalidRate { roof_type, detail } => {
                write!(f, "invalid base rate row for '{}': {}", roof_type, detail)
            }
            TableImportError::Empty => write!(f, "table export contains no rows"),
        }
    }
}

impl std::error::Error for TableImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableImportError::Io(err) => Some(err),
            TableImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TableImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TableImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct DeliveryRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Aliases", default)]
    aliases: String,
    #[serde(rename = "Fee")]
    fee: i64,
}

#[derive(Debug, Deserialize)]
struct BaseRateRow {
    #[serde(rename = "Floors")]
    floors: u8,
    #[serde(rename = "FirstFloor")]
    first_floor: String,
    #[serde(rename = "RoofType")]
    roof_type: String,
    #[serde(rename = "RatePerM2")]
    rate_per_m2: i64,
}

/// Loads a `City,Aliases,Fee` export. Aliases are `|`-separated and may be
/// empty.
pub fn delivery_fees_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<DeliveryFee>, TableImportError> {
    let file = std::fs::File::open(path)?;
    delivery_fees_from_reader(file)
}

pub fn delivery_fees_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<DeliveryFee>, TableImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut fees = Vec::new();
    for row in csv_reader.deserialize::<DeliveryRow>() {
        let row = row?;
        if row.fee < 0 {
            return Err(TableImportError::NegativeFee {
                city: row.city,
                fee: row.fee,
            });
        }
        let aliases = row
            .aliases
            .split('|')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(str::to_string)
            .collect();
        fees.push(DeliveryFee {
            city: row.city,
            aliases,
            fee: row.fee,
        });
    }

    if fees.is_empty() {
        return Err(TableImportError::Empty);
    }
    Ok(fees)
}

/// Loads a `Floors,FirstFloor,RoofType,RatePerM2` export.
pub fn base_rates_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BaseRate>, TableImportError> {
    let file = std::fs::File::open(path)?;
    base_rates_from_reader(file)
}

pub fn base_rates_from_reader<R: Read>(reader: R) -> Result<Vec<BaseRate>, TableImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rates = Vec::new();
    for row in csv_reader.deserialize::<BaseRateRow>() {
        let row = row?;
        let first_floor =
            FloorKind::parse(&row.first_floor).ok_or_else(|| TableImportError::InvalidRate {
                roof_type: row.roof_type.clone(),
                detail: format!("unknown first-floor kind '{}'", row.first_floor),
            })?;
        if !(1..=3).contains(&row.floors) {
            return Err(TableImportError::InvalidRate {
                roof_type: row.roof_type,
                detail: format!("floor count {} outside 1..=3", row.floors),
            });
        }
        if row.rate_per_m2 <= 0 {
            return Err(TableImportError::InvalidRate {
                roof_type: row.roof_type,
                detail: format!("non-positive rate {}", row.rate_per_m2),
            });
        }
        rates.push(BaseRate {
            floors: row.floors,
            first_floor,
            roof_type: row.roof_type,
            rate_per_m2: row.rate_per_m2,
        });
    }

    if rates.is_empty() {
        return Err(TableImportError::Empty);
    }
    Ok(rates)
}

impl PricingTables {
    /// Replaces the delivery table with a CSV export.
    pub fn with_delivery_fees_from_path<P: AsRef<Path>>(
        mut self,
        path: P,
    ) -> Result<Self, TableImportError> {
        self.delivery_fees = delivery_fees_from_path(path)?;
        Ok(self)
    }

    /// Replaces the rate table with a CSV export.
    pub fn with_base_rates_from_path<P: AsRef<Path>>(
        mut self,
        path: P,
    ) -> Result<Self, TableImportError> {
        self.base_rates = base_rates_from_path(path)?;
        Ok(self)
    }
}
