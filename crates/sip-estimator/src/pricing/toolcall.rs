//! Narrow contract consumed by the conversational adapter. The adapter runs
//! the language-model dialogue elsewhere; this module only defines the
//! function it may call and turns raw tool arguments into the formatted
//! payload the assistant is instructed to quote verbatim.

use super::domain::{CostBreakdown, EstimateRequest};
use super::{CalculationError, CostCalculator};
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "calculate_sip_house_cost";

const RESULT_INSTRUCTION: &str =
    "Use only these figures. Do not recompute, alter, or round them; the formatted values are ready for display.";

#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("malformed tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

/// Function definition advertised to the language model, in the OpenAI
/// tool-calling schema.
pub fn tool_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": TOOL_NAME,
            "description": "Exact cost calculation for a SIP panel house. Pass the simple parameters only (area, floors, first floor type and height, roof type, house shape, additional works, city, VAT/installment flags).",
            "parameters": {
                "type": "object",
                "properties": {
                    "area": {
                        "type": "number",
                        "description": "Footprint area in m², between 10 and 1500"
                    },
                    "floors": {
                        "type": "integer",
                        "description": "Number of storeys: 1, 2, or 3"
                    },
                    "firstFloorType": {
                        "type": "string",
                        "description": "First storey kind: 'full' (default) or 'attic'"
                    },
                    "roofType": {
                        "type": "string",
                        "description": "Roof type, e.g. '1-pitch', '2-pitch', '4-pitch'"
                    },
                    "firstFloorHeight": {
                        "type": "number",
                        "description": "First storey height in metres (default 2.5)"
                    },
                    "houseShape": {
                        "type": "string",
                        "description": "Plan complexity: 'simple' or 'complex'"
                    },
                    "additionalWorks": {
                        "type": "string",
                        "description": "Named additional-works package, e.g. 'none', 'interior plasterboard lining'"
                    },
                    "city": {
                        "type": "string",
                        "description": "Delivery city, e.g. 'Almaty', 'Astana', 'Shymkent'"
                    },
                    "hasVat": {
                        "type": "boolean",
                        "description": "Quote prices with VAT (+16%)"
                    },
                    "hasInstallment": {
                        "type": "boolean",
                        "description": "Quote with installment terms (+17%)"
                    },
                    "installmentAmount": {
                        "type": "number",
                        "description": "Portion of the total paid in installments; omit to apply the uplift to the whole total"
                    }
                },
                "required": ["area", "floors", "roofType", "firstFloorHeight", "city"]
            }
        }
    })
}

/// Dispatches one tool call against the calculator. `arguments` is the raw
/// JSON object the model produced.
pub fn dispatch(
    calculator: &CostCalculator,
    name: &str,
    arguments: &Value,
) -> Result<Value, ToolCallError> {
    if name != TOOL_NAME {
        return Err(ToolCallError::UnknownTool(name.to_string()));
    }

    let request: EstimateRequest = serde_json::from_value(arguments.clone())?;
    let breakdown = calculator.calculate(request)?;
    Ok(result_payload(&breakdown))
}

/// The payload handed back through the tool-call protocol: figures
/// pre-formatted for display, raw integers for precision, and the standing
/// instruction not to recompute anything.
fn result_payload(breakdown: &CostBreakdown) -> Value {
    json!({
        "total": format_amount(breakdown.total),
        "finalTotal": format_amount(breakdown.final_total),
        "pricePerM2": format_amount(breakdown.price_per_sqm),
        "foundation": format_amount(breakdown.foundation_cost),
        "houseKit": format_amount(breakdown.kit_cost),
        "assembly": format_amount(breakdown.assembly_cost),
        "deliveryCost": format_amount(breakdown.delivery_cost),
        "customWorksCost": format_amount(breakdown.custom_works_cost),
        "_raw": {
            "total": breakdown.total,
            "finalTotal": breakdown.final_total,
            "pricePerM2": breakdown.price_per_sqm,
            "foundation": breakdown.foundation_cost,
            "houseKit": breakdown.kit_cost,
            "assembly": breakdown.assembly_cost,
            "deliveryCost": breakdown.delivery_cost,
            "customWorksCost": breakdown.custom_works_cost,
        },
        "_instruction": RESULT_INSTRUCTION,
    })
}

/// Groups digits in threes with spaces, the way the quotes are displayed
/// ("9 091 170").
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;

    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
