// Operator commands typed on the console alongside chat requests
use crate::model::ChatRequest;
use crate::storage::{load_catalog, CatalogStore, ClientDirectory, SqliteStorage};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const HELP_TEXT: &str = "Available commands:\n\
    /help - command list\n\
    /clients - list every client\n\
    /client <code> - show a client record\n\
    /district <name> - clients of a district\n\
    /city <name> - clients of a city\n\
    /category <name> - list products of a category\n\
    /purchases [client code] - completed purchases, optionally of one client\n\
    /purchase <code> - one completed purchase\n\
    /reload - re-read the catalog files\n\
    <client code>: <message> - ask the assistant";

pub struct CommandContext {
    pub catalog: Arc<CatalogStore>,
    pub catalog_files: Vec<String>,
    pub clients: Arc<ClientDirectory>,
    pub storage: Arc<Mutex<SqliteStorage>>,
}

/// Splits `CLI-001: precio de la volanda M8` into a chat request.
pub fn parse_request_line(line: &str) -> Option<ChatRequest> {
    let (client, message) = line.split_once(':')?;
    let client = client.trim();
    let message = message.trim();
    if client.is_empty() || message.is_empty() {
        return None;
    }
    Some(ChatRequest {
        message: message.to_string(),
        client_code: client.to_string(),
    })
}

/// Handles a `/command` line and returns the text to print.
pub async fn handle_command(command_text: &str, ctx: &CommandContext) -> String {
    info!("Handling command: {}", command_text);
    let mut parts = command_text.trim().splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/help" => HELP_TEXT.to_string(),
        "/clients" => to_json(ctx.clients.all()),
        "/district" => to_json(&ctx.clients.find_by_district(arg)),
        "/city" => to_json(&ctx.clients.find_by_city(arg)),
        "/client" => match ctx.clients.find_by_code(arg) {
            Some(client) => to_json(client),
            None => format!("Client not found: {}", arg),
        },
        "/category" => {
            let products = ctx.catalog.snapshot().find_by_category(arg);
            if products.is_empty() {
                format!("No products in category '{}'", arg)
            } else {
                to_json(&products)
            }
        }
        "/purchases" => {
            let storage = ctx.storage.lock().await;
            let found = if arg.is_empty() {
                storage.find_all_purchases()
            } else {
                storage.find_purchases_by_client(arg)
            };
            match found {
                Ok(purchases) => to_json(&purchases),
                Err(e) => {
                    warn!("/purchases error: {:?}", e);
                    format!("Error: {}", e)
                }
            }
        }
        "/purchase" => match ctx.storage.lock().await.find_purchase_by_code(arg) {
            Ok(Some(purchase)) => to_json(&purchase),
            Ok(None) => format!("Purchase not found: {}", arg),
            Err(e) => {
                warn!("/purchase error: {:?}", e);
                format!("Error: {}", e)
            }
        },
        "/reload" => match load_catalog(&ctx.catalog_files) {
            Ok(catalog) => {
                let count = catalog.len();
                ctx.catalog.replace(catalog);
                info!("Catalog reloaded with {} products", count);
                format!("Catalog reloaded: {} products", count)
            }
            Err(e) => {
                warn!("/reload failed, keeping previous catalog: {}", e);
                format!("Reload failed: {}", e)
            }
        },
        _ => "Unknown command. Type /help for a list of commands.".to_string(),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Serialization error: {}", e))
}
