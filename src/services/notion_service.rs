//! Notion API client: creates a page in the destination database and
//! appends any blocks beyond the per-request child limit.

use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ContentBlock, Document, PageId, TextRun, MAX_CHILDREN_PER_REQUEST},
};

pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Clone)]
pub struct NotionService {
    http: Client,
    base_url: String,
    token: SecretString,
    title_property: String,
}

impl NotionService {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(
            config.notion_token.clone(),
            &config.notion_api_base,
            &config.notion_title_property,
        )
    }

    pub fn with_base_url(token: SecretString, base_url: &str, title_property: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            title_property: title_property.to_string(),
        }
    }

    /// Body of the page-creation request carrying at most the first
    /// [`MAX_CHILDREN_PER_REQUEST`] blocks.
    pub fn build_page_request(&self, document: &Document, database_id: &str) -> Value {
        let title: Vec<Value> = TextRun::split(&document.title, None)
            .iter()
            .map(TextRun::to_notion)
            .collect();

        let children: Vec<Value> = document
            .blocks
            .iter()
            .take(MAX_CHILDREN_PER_REQUEST)
            .map(ContentBlock::to_notion)
            .collect();

        let mut properties = serde_json::Map::new();
        properties.insert(self.title_property.clone(), json!({ "title": title }));

        json!({
            "parent": { "type": "database_id", "database_id": database_id },
            "properties": properties,
            "children": children,
        })
    }

    /// Create the page and return its id. Single attempt, no retry.
    pub async fn publish(&self, document: &Document, database_id: &str) -> AppResult<PageId> {
        let body = self.build_page_request(document, database_id);
        let response = self
            .authorized(self.http.post(format!("{}/pages", self.base_url)))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Notion create page request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Notion create page error {status}: {error_text}"
            )));
        }

        let created: CreatedPage = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Notion page response: {e}"))
        })?;
        let page_id = PageId(created.id);

        for batch in document
            .blocks
            .get(MAX_CHILDREN_PER_REQUEST..)
            .unwrap_or(&[])
            .chunks(MAX_CHILDREN_PER_REQUEST)
        {
            self.append_children(&page_id, batch).await?;
        }

        tracing::info!(
            page_id = %page_id,
            blocks = document.blocks.len(),
            "Created Notion page"
        );
        Ok(page_id)
    }

    async fn append_children(&self, page_id: &PageId, blocks: &[ContentBlock]) -> AppResult<()> {
        let children: Vec<Value> = blocks.iter().map(ContentBlock::to_notion).collect();
        let response = self
            .authorized(
                self.http
                    .patch(format!("{}/blocks/{}/children", self.base_url, page_id)),
            )
            .json(&json!({ "children": children }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Notion append request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Notion append children error {status}: {error_text}"
            )));
        }

        Ok(())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.token.expose_secret())
            .header("Notion-Version", NOTION_VERSION)
    }
}
