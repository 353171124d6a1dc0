mod assembler;
mod commands;
mod config;
mod llm;
mod matcher;
mod model;
mod normalizer;
mod parser;
mod service;
mod storage;

use commands::{handle_command, parse_request_line, CommandContext, HELP_TEXT};
use config::load_config;
use futures::future::join_all;
use llm::OpenAiChatClient;
use model::{AssistantError, ChatRequest, CompletedPurchase};
use service::AssistantService;
use std::sync::Arc;
use storage::{load_catalog, read_json_file, CatalogStore, ClientDirectory, SqliteStorage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, batch_file) = parse_args(&args);

    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let catalog = match load_catalog(&config.catalog_files) {
        Ok(c) => c,
        Err(e) => {
            error!("Catalog load error: {}", e);
            return;
        }
    };
    info!("Catalog ready with {} products", catalog.len());
    let catalog = Arc::new(CatalogStore::new(catalog));

    let clients = match ClientDirectory::load(&config.clients_file) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Client load error: {}", e);
            return;
        }
    };
    info!("Loaded {} clients", clients.all().len());

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };
    if let Some(seed_file) = &config.purchases_seed_file {
        match read_json_file::<CompletedPurchase>(seed_file) {
            Ok(purchases) => {
                if let Err(e) = storage.seed_if_empty(&purchases) {
                    warn!("Purchase seed failed: {}", e);
                }
            }
            Err(e) => warn!("Purchase seed file unreadable: {}", e),
        }
    }
    let storage = Arc::new(Mutex::new(storage));

    let model = match OpenAiChatClient::new(config.llm.clone()) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            error!("Failed to create language model client: {}", e);
            return;
        }
    };

    let service = AssistantService::new(catalog.clone(), clients.clone(), model, config.match_mode);
    let ctx = CommandContext {
        catalog,
        catalog_files: config.catalog_files.clone(),
        clients,
        storage,
    };

    match batch_file {
        Some(path) => run_batch(&path, &service).await,
        None => run_console(&service, &ctx).await,
    }
}

/// `[config.json] [--batch <file>]`
fn parse_args(args: &[String]) -> (String, Option<String>) {
    let mut config_path = "config.json".to_string();
    let mut batch_file = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--batch" {
            batch_file = iter.next().cloned();
        } else {
            config_path = arg.clone();
        }
    }
    (config_path, batch_file)
}

/// Processes every request line of the file concurrently against the same snapshot.
async fn run_batch(path: &str, service: &AssistantService) {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to read batch file {}: {}", path, e);
            return;
        }
    };

    let requests: Vec<ChatRequest> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_request_line(line);
            if parsed.is_none() {
                warn!("Skipping malformed batch line: {}", line);
            }
            parsed
        })
        .collect();
    info!("Processing {} batch requests", requests.len());

    let results = join_all(requests.iter().map(|req| service.chat(req))).await;
    for result in results {
        println!("{}", render(result));
    }
}

async fn run_console(service: &AssistantService, ctx: &CommandContext) {
    println!("{}", HELP_TEXT);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('/') {
            println!("{}", handle_command(line, ctx).await);
            continue;
        }
        match parse_request_line(line) {
            Some(request) => println!("{}", render(service.chat(&request).await)),
            None => println!("Expected '<client code>: <message>'. Type /help for commands."),
        }
    }
    info!("Input closed, shutting down.");
}

fn render(result: Result<assembler::ResolvedResult, AssistantError>) -> String {
    match result {
        Ok(resolved) => serde_json::to_string_pretty(&resolved)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string()),
        Err(e) => {
            warn!("Request failed: {}", e);
            serde_json::json!({ "error": e.to_string() }).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_args() {
        assert_eq!(parse_args(&[]), ("config.json".to_string(), None));
    }

    #[test]
    fn batch_and_config_args() {
        let (config, batch) = parse_args(&args(&["--batch", "requests.txt", "prod.json"]));
        assert_eq!(config, "prod.json");
        assert_eq!(batch.as_deref(), Some("requests.txt"));
    }

    #[test]
    fn errors_render_as_json() {
        let out = render(Err(AssistantError::ClientNotFound("CLI-999".to_string())));
        assert_eq!(out, r#"{"error":"client not found: CLI-999"}"#);
    }
}
