// Decodes the language model's JSON envelope into a typed intent
use crate::model::PurchaseLineRequest;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Substituted when the envelope decodes but carries no `message`.
pub const DEFAULT_MESSAGE: &str = "Estamos procesando su solicitud.";
/// Substituted when the model output is not a JSON object at all.
pub const UNPARSABLE_MESSAGE: &str =
    "No pudimos entender su solicitud. Por favor, intente reformularla.";

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    InfoRequest { keywords: Vec<String> },
    InfoRequestByCode { codes: HashSet<String> },
    Purchase { items: Vec<PurchaseLineRequest> },
    Unknown { raw_text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIntent {
    pub intent: Intent,
    pub message: String,
}

impl ParsedIntent {
    fn unparsable(raw: &str) -> Self {
        Self {
            intent: Intent::Unknown {
                raw_text: raw.to_string(),
            },
            message: UNPARSABLE_MESSAGE.to_string(),
        }
    }
}

pub trait EnvelopeParser {
    /// Total: malformed model output becomes `Intent::Unknown`, never an error.
    fn parse(&self, raw: &str) -> ParsedIntent;
}

pub struct IntentParser;

impl IntentParser {
    pub fn new() -> Self {
        Self
    }
}

impl EnvelopeParser for IntentParser {
    fn parse(&self, raw: &str) -> ParsedIntent {
        let envelope = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("Model output is JSON but not an object ({}): {}", json_kind(&other), raw);
                return ParsedIntent::unparsable(raw);
            }
            Err(e) => {
                warn!("Failed to parse model output as JSON: {} | raw: {}", e, raw);
                return ParsedIntent::unparsable(raw);
            }
        };

        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        let intent = match envelope.get("requestType").and_then(Value::as_str) {
            Some("request_info") => info_request(&envelope),
            Some("purchase") => Intent::Purchase {
                items: purchase_items(&envelope),
            },
            other => {
                debug!("Unrecognised requestType {:?}", other);
                Intent::Unknown {
                    raw_text: raw.to_string(),
                }
            }
        };

        ParsedIntent { intent, message }
    }
}

fn info_request(envelope: &Map<String, Value>) -> Intent {
    // Codes cannot over-match, so a non-empty code set wins over keywords.
    if let Some(Value::Array(values)) = envelope.get("productCodes") {
        let codes: HashSet<String> = values
            .iter()
            .filter_map(scalar_text)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();
        if !codes.is_empty() || envelope.get("productKeywords").is_none() {
            return Intent::InfoRequestByCode { codes };
        }
    }

    let keywords = match envelope.get("productKeywords") {
        Some(Value::Array(values)) => values.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };
    Intent::InfoRequest { keywords }
}

fn purchase_items(envelope: &Map<String, Value>) -> Vec<PurchaseLineRequest> {
    let Some(Value::Array(values)) = envelope.get("items") else {
        return Vec::new();
    };

    values
        .iter()
        .filter_map(|item| {
            let parsed = purchase_line(item);
            if parsed.is_none() {
                debug!("Dropping malformed purchase item: {}", item);
            }
            parsed
        })
        .collect()
}

fn purchase_line(item: &Value) -> Option<PurchaseLineRequest> {
    let object = item.as_object()?;
    let name = object.get("name").and_then(scalar_text)?;
    if name.trim().is_empty() {
        return None;
    }
    let quantity = object.get("quantity").and_then(positive_quantity)?;
    Some(PurchaseLineRequest { name, quantity })
}

/// Accepts `10`, `10.0` and `"10"`; anything non-positive or fractional is rejected.
fn positive_quantity(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => v,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 0.0 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    if n == 0 {
        return None;
    }
    u32::try_from(n).ok()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
