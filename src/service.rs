// Request pipeline: validate -> prompt -> model -> parse -> assemble
use crate::assembler::{ResolvedResult, ResponseAssembler};
use crate::config::MatchMode;
use crate::llm::prompt::{build_system_prompt, build_user_prompt};
use crate::llm::LanguageModel;
use crate::matcher::CatalogMatcher;
use crate::model::{AssistantError, ChatRequest};
use crate::parser::{EnvelopeParser, IntentParser};
use crate::storage::{CatalogStore, ClientDirectory};
use std::sync::Arc;
use tracing::info;

pub struct AssistantService {
    catalog: Arc<CatalogStore>,
    clients: Arc<ClientDirectory>,
    model: Arc<dyn LanguageModel>,
    mode: MatchMode,
    parser: IntentParser,
    assembler: ResponseAssembler<CatalogMatcher>,
}

impl AssistantService {
    pub fn new(
        catalog: Arc<CatalogStore>,
        clients: Arc<ClientDirectory>,
        model: Arc<dyn LanguageModel>,
        mode: MatchMode,
    ) -> Self {
        Self {
            catalog,
            clients,
            model,
            mode,
            parser: IntentParser::new(),
            assembler: ResponseAssembler::new(CatalogMatcher::new()),
        }
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ResolvedResult, AssistantError> {
        if request.message.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        if request.client_code.trim().is_empty() {
            return Err(AssistantError::MissingClient);
        }
        let client = self
            .clients
            .find_by_code(&request.client_code)
            .ok_or_else(|| AssistantError::ClientNotFound(request.client_code.clone()))?;

        // One snapshot for the whole request; a concurrent reload does not affect it.
        let catalog = self.catalog.snapshot();
        let system = build_system_prompt(&catalog, self.mode);
        let user = build_user_prompt(client, &request.message);

        let raw = self.model.complete(&system, &user).await?;
        let parsed = self.parser.parse(&raw);
        let result = self.assembler.assemble(parsed, &client.code, catalog.entries());

        info!(
            "Resolved request for {} as {}",
            result.client_identifier,
            result.payload_kind().as_str()
        );
        Ok(result)
    }
}
