// Core structs: CatalogEntry, Client, CompletedPurchase, errors
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sellable item. Field names on disk and on the wire follow the store's
/// JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "codigoProducto")]
    pub code: String,
    #[serde(rename = "tipoProducto")]
    pub category: String,
    #[serde(rename = "nombreProducto")]
    pub display_name: String,
    #[serde(rename = "cantidadStock")]
    pub stock_quantity: u32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    #[serde(rename = "precioXMayor")]
    pub wholesale_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "codigoCliente")]
    pub code: String,
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "distrito")]
    pub district: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
}

/// A purchase line extracted from the model output. Not validated against stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLineRequest {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedProduct {
    #[serde(rename = "codigoProducto")]
    pub product_code: String,
    #[serde(rename = "nombreProducto")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precioUnitario")]
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedPurchase {
    #[serde(rename = "codigoCompra")]
    pub code: String,
    #[serde(rename = "codigoCliente")]
    pub client_code: String,
    #[serde(rename = "nombreCliente")]
    pub client_name: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "productos")]
    pub items: Vec<PurchasedProduct>,
    #[serde(rename = "montoTotal")]
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "codigoCliente")]
    pub client_code: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("language model API key must be configured (set OPENAI_API_KEY)")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("language model returned no response choices")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("user message cannot be empty")]
    EmptyMessage,
    #[error("client code cannot be empty")]
    MissingClient,
    #[error("client not found: {0}")]
    ClientNotFound(String),
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),
}
