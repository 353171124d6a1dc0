// Builds the outward-facing result from a parsed intent
use crate::matcher::Matcher;
use crate::model::{CatalogEntry, PurchaseLineRequest};
use crate::parser::{Intent, ParsedIntent};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Info,
    Purchase,
    Unknown,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Info => "request_info",
            PayloadKind::Purchase => "purchase",
            PayloadKind::Unknown => "unknown",
        }
    }
}

/// Serialized as `{"type": ..., "response": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "response")]
pub enum Payload {
    #[serde(rename = "request_info")]
    Info(Vec<CatalogEntry>),
    #[serde(rename = "purchase")]
    Purchase(Vec<PurchaseLineRequest>),
    #[serde(rename = "unknown")]
    Unknown(String),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Info(_) => PayloadKind::Info,
            Payload::Purchase(_) => PayloadKind::Purchase,
            Payload::Unknown(_) => PayloadKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedResult {
    #[serde(rename = "client")]
    pub client_identifier: String,
    #[serde(rename = "responseMessage")]
    pub message: String,
    #[serde(rename = "information")]
    pub payload: Payload,
}

impl ResolvedResult {
    pub fn payload_kind(&self) -> PayloadKind {
        self.payload.kind()
    }
}

pub struct ResponseAssembler<M: Matcher> {
    matcher: M,
}

impl<M: Matcher> ResponseAssembler<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Pure: info intents are resolved against `catalog`, purchases and
    /// unknown text pass through untouched.
    pub fn assemble(
        &self,
        parsed: ParsedIntent,
        client_identifier: &str,
        catalog: &[CatalogEntry],
    ) -> ResolvedResult {
        let payload = match parsed.intent {
            Intent::InfoRequest { keywords } => {
                Payload::Info(self.matcher.match_by_keywords(&keywords, catalog))
            }
            Intent::InfoRequestByCode { codes } => {
                Payload::Info(self.matcher.match_by_codes(&codes, catalog))
            }
            Intent::Purchase { items } => Payload::Purchase(items),
            Intent::Unknown { raw_text } => Payload::Unknown(raw_text),
        };

        ResolvedResult {
            client_identifier: client_identifier.to_string(),
            message: parsed.message,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CatalogMatcher;
    use crate::parser::intent_parser::UNPARSABLE_MESSAGE;
    use crate::parser::{EnvelopeParser, IntentParser};
    use crate::storage::catalog::fixture_entries;
    use serde_json::json;

    fn resolve(raw: &str, catalog: &[CatalogEntry]) -> ResolvedResult {
        let parsed = IntentParser::new().parse(raw);
        ResponseAssembler::new(CatalogMatcher::new()).assemble(parsed, "CLI-002", catalog)
    }

    #[test]
    fn keyword_request_resolves_to_full_entries() {
        let catalog = fixture_entries();
        let result = resolve(
            r#"{"requestType":"request_info","productKeywords":["1/4x2"],"message":"Buscando"}"#,
            &catalog,
        );
        assert_eq!(result.client_identifier, "CLI-002");
        assert_eq!(result.message, "Buscando");
        assert_eq!(result.payload_kind(), PayloadKind::Info);
        let Payload::Info(entries) = &result.payload else {
            panic!("expected info payload");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "P-001");
        assert_eq!(entries[0].stock_quantity, 1200);
        assert_eq!(entries[0].unit_price, 0.45);
    }

    #[test]
    fn code_request_resolves_exact_entries() {
        let catalog = fixture_entries();
        let result = resolve(
            r#"{"requestType":"request_info","productCodes":["V-004","T-006"]}"#,
            &catalog,
        );
        let Payload::Info(entries) = &result.payload else {
            panic!("expected info payload");
        };
        let codes: Vec<&str> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["T-006", "V-004"]);
    }

    #[test]
    fn empty_code_list_resolves_by_keywords() {
        let result = resolve(
            r#"{"requestType":"request_info","productCodes":[],"productKeywords":["1/4x2"]}"#,
            &fixture_entries(),
        );
        let Payload::Info(entries) = &result.payload else {
            panic!("expected info payload");
        };
        let codes: Vec<&str> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["P-001"]);
    }

    #[test]
    fn info_request_without_matches_is_empty_info() {
        let result = resolve(
            r#"{"requestType":"request_info","productKeywords":["nonexistent"]}"#,
            &fixture_entries(),
        );
        assert_eq!(result.payload, Payload::Info(vec![]));
    }

    #[test]
    fn info_request_against_empty_catalog() {
        let result = resolve(r#"{"requestType":"request_info","productKeywords":["perno"]}"#, &[]);
        assert_eq!(result.payload, Payload::Info(vec![]));
    }

    #[test]
    fn purchase_items_pass_through() {
        let result = resolve(
            r#"{"requestType":"purchase","items":[{"name":"perno","quantity":10},{"name":"tuerca"}]}"#,
            &fixture_entries(),
        );
        assert_eq!(result.payload_kind(), PayloadKind::Purchase);
        assert_eq!(
            result.payload,
            Payload::Purchase(vec![PurchaseLineRequest {
                name: "perno".to_string(),
                quantity: 10
            }])
        );
    }

    #[test]
    fn unparsable_text_is_carried_as_raw() {
        let raw = "Lo siento, no entiendo.";
        let result = resolve(raw, &fixture_entries());
        assert_eq!(result.payload_kind(), PayloadKind::Unknown);
        assert_eq!(result.payload, Payload::Unknown(raw.to_string()));
        assert_eq!(result.message, UNPARSABLE_MESSAGE);
    }

    #[test]
    fn serializes_to_wire_shape() {
        let result = resolve(
            r#"{"requestType":"purchase","message":"Procesando","items":[{"name":"perno","quantity":10}]}"#,
            &fixture_entries(),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "client": "CLI-002",
                "responseMessage": "Procesando",
                "information": {
                    "type": "purchase",
                    "response": [{"name": "perno", "quantity": 10}]
                }
            })
        );
    }

    #[test]
    fn info_entries_serialize_with_catalog_field_names() {
        let result = resolve(
            r#"{"requestType":"request_info","productCodes":["V-005"]}"#,
            &fixture_entries(),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["information"]["type"], "request_info");
        let entry = &value["information"]["response"][0];
        assert_eq!(entry["codigoProducto"], "V-005");
        assert_eq!(entry["nombreProducto"], "Volanda Plana M8 Inoxidable");
        assert_eq!(entry["cantidadStock"], 1500);
    }

    #[test]
    fn unknown_serializes_raw_string() {
        let value = serde_json::to_value(resolve("hola", &[])).unwrap();
        assert_eq!(value["information"], json!({"type": "unknown", "response": "hola"}));
    }

    #[test]
    fn kind_names_match_wire_tags() {
        assert_eq!(PayloadKind::Info.as_str(), "request_info");
        assert_eq!(PayloadKind::Purchase.as_str(), "purchase");
        assert_eq!(PayloadKind::Unknown.as_str(), "unknown");
    }
}
