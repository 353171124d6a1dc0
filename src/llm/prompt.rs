// Prompt text sent alongside each user request
use crate::config::MatchMode;
use crate::model::Client;
use crate::storage::Catalog;

const PREAMBLE: &str = "You are the sales assistant of a hardware store that sells bolts (perno), \
nuts (tuerca) and washers (volanda). Classify the customer's request and answer ONLY with a JSON \
object, no surrounding text.";

const KEYWORD_INSTRUCTIONS: &str = r#"For questions about prices or stock, answer:
{
  "requestType": "request_info",
  "productKeywords": ["keyword1", "keyword2"],
  "message": "A short natural sentence saying the information is being retrieved"
}
In productKeywords include every identifying term of each requested product:
- sizes, written with and without spaces (e.g. "1/4x2", "1/4 x 2", "M8", "3/8")
- product types (e.g. "hexagonal", "plana", "presion", "presión")
- materials when mentioned
Prefer several short variations over one long phrase."#;

const PURCHASE_INSTRUCTIONS: &str = r#"For purchase requests, answer:
{
  "requestType": "purchase",
  "items": [{"name": "product name", "quantity": 10}],
  "message": "A short natural sentence saying the purchase is being processed"
}"#;

/// System message for one request. Lists codes only in `MatchMode::Codes`.
pub fn build_system_prompt(catalog: &Catalog, mode: MatchMode) -> String {
    let info_instructions = match mode {
        MatchMode::Keywords => KEYWORD_INSTRUCTIONS.to_string(),
        MatchMode::Codes => code_instructions(catalog),
    };
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        PREAMBLE,
        info_instructions,
        PURCHASE_INSTRUCTIONS,
        product_context(catalog)
    )
}

fn code_instructions(catalog: &Catalog) -> String {
    let mut text = String::from(
        r#"For questions about prices or stock, answer:
{
  "requestType": "request_info",
  "productCodes": ["P-001"],
  "message": "A short natural sentence saying the information is being retrieved"
}
Only use codes from this list:
"#,
    );
    for entry in catalog.entries() {
        text.push_str(&format!("{} = {}\n", entry.code, entry.display_name));
    }
    text
}

/// "Products available: perno (6 items), tuerca (6 items), "
pub fn product_context(catalog: &Catalog) -> String {
    let mut context = String::from("Products available: ");
    for (category, count) in catalog.categories_summary() {
        context.push_str(&format!("{} ({} items), ", category, count));
    }
    context
}

pub fn build_user_prompt(client: &Client, message: &str) -> String {
    format!(
        "Client Information: Code: {}, Name: {}, Address: {}, District: {}, City: {}, Phone: {}, Email: {}\n\nUser request: {}",
        client.code,
        client.full_name,
        client.address,
        client.district,
        client.city,
        client.phone,
        client.email,
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::catalog::fixture_entries;
    use crate::storage::clients::fixture_clients;

    #[test]
    fn product_context_counts_categories() {
        let catalog = Catalog::new(fixture_entries());
        assert_eq!(
            product_context(&catalog),
            "Products available: perno (6 items), tuerca (6 items), volanda (6 items), "
        );
    }

    #[test]
    fn keyword_prompt_asks_for_keywords() {
        let prompt = build_system_prompt(&Catalog::new(fixture_entries()), MatchMode::Keywords);
        assert!(prompt.contains("productKeywords"));
        assert!(!prompt.contains("productCodes"));
        assert!(prompt.contains("\"purchase\""));
    }

    #[test]
    fn code_prompt_lists_every_code() {
        let catalog = Catalog::new(fixture_entries());
        let prompt = build_system_prompt(&catalog, MatchMode::Codes);
        assert!(prompt.contains("productCodes"));
        for entry in catalog.entries() {
            assert!(prompt.contains(&entry.code));
        }
    }

    #[test]
    fn user_prompt_carries_client_context() {
        let clients = fixture_clients();
        let client = clients.find_by_code("CLI-002").unwrap();
        let prompt = build_user_prompt(client, "precio de volanda plana M8");
        assert!(prompt.starts_with("Client Information: Code: CLI-002"));
        assert!(prompt.ends_with("User request: precio de volanda plana M8"));
    }
}
