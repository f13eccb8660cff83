//! Policy Q&A tool and the in-memory policy document library

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Tool, ToolError};

pub const POLICY_TOOL_NAME: &str = "Policy_Analyzer";

/// A stored policy document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub doc_id: String,
    pub title: String,
    #[serde(skip_serializing)]
    pub content: Vec<u8>,
    pub metadata: Map<String, Value>,
    pub word_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Acknowledgement returned after an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub doc_id: String,
    pub status: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySummary {
    pub doc_id: String,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub word_count: usize,
    pub metadata: Map<String, Value>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAnswer {
    pub answer: String,
    pub confidence: f32,
    pub citations: Vec<String>,
    pub relevant_policies: Vec<String>,
}

/// Content-addressed policy store, kept in upload order.
///
/// Documents are recorded as-is; nothing is parsed or embedded.
#[derive(Debug, Default)]
pub struct PolicyLibrary {
    documents: RwLock<Vec<PolicyDocument>>,
}

impl PolicyLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for `content`: first 16 hex chars of its SHA-256
    pub fn document_id(content: &[u8]) -> String {
        let digest = Sha256::digest(content);
        digest.iter().take(8).map(|b| format!("{:02x}", b)).collect()
    }

    /// Record a document. Re-uploading identical content returns the existing entry.
    ///
    /// Any bytes are accepted (PDF, DOCX, text). Words are only counted for UTF-8 text.
    pub async fn process_document(
        &self,
        title: &str,
        content: &[u8],
        metadata: Map<String, Value>,
    ) -> Result<ProcessedDocument, ToolError> {
        let text = std::str::from_utf8(content).ok();
        let blank = match text {
            Some(text) => text.trim().is_empty(),
            None => content.is_empty(),
        };
        if blank {
            return Err(ToolError::InvalidInput("document is empty".to_string()));
        }

        let doc_id = Self::document_id(content);
        let word_count = text.map_or(0, |t| t.split_whitespace().count());

        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| d.doc_id == doc_id) {
            tracing::debug!(%doc_id, "Policy document already stored");
        } else {
            documents.push(PolicyDocument {
                doc_id: doc_id.clone(),
                title: title.to_string(),
                content: content.to_vec(),
                metadata,
                word_count,
                uploaded_at: Utc::now(),
            });
            tracing::info!(%doc_id, title, word_count, "Stored policy document");
        }

        Ok(ProcessedDocument {
            doc_id,
            status: "processed".to_string(),
            word_count,
        })
    }

    /// Placeholder summary plus stored metadata, or None for an unknown id
    pub async fn summary(&self, doc_id: &str) -> Option<PolicySummary> {
        let documents = self.documents.read().await;
        documents.iter().find(|d| d.doc_id == doc_id).map(|d| PolicySummary {
            doc_id: d.doc_id.clone(),
            title: d.title.clone(),
            summary: "Policy summary placeholder".to_string(),
            key_points: Vec::new(),
            word_count: d.word_count,
            metadata: d.metadata.clone(),
            uploaded_at: d.uploaded_at,
        })
    }

    /// Titles in upload order
    pub async fn titles(&self) -> Vec<String> {
        self.documents.read().await.iter().map(|d| d.title.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

/// Placeholder policy analyst over the library
#[derive(Debug, Clone)]
pub struct PolicyAgent {
    library: Arc<PolicyLibrary>,
}

impl PolicyAgent {
    pub fn new(library: Arc<PolicyLibrary>) -> Self {
        Self { library }
    }

    pub async fn answer_question(&self, question: &str) -> Result<PolicyAnswer, ToolError> {
        if question.trim().is_empty() {
            return Err(ToolError::InvalidInput("question is empty".to_string()));
        }

        Ok(PolicyAnswer {
            answer: "Policy answer placeholder".to_string(),
            confidence: 0.8,
            citations: Vec::new(),
            relevant_policies: self.library.titles().await,
        })
    }
}

#[async_trait]
impl Tool for PolicyAgent {
    fn name(&self) -> &str {
        POLICY_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Analyzes compliance policies and answers questions"
    }

    async fn invoke(&self, input: &str) -> Result<Value, ToolError> {
        let answer = self.answer_question(input).await?;
        serde_json::to_value(answer).map_err(|e| ToolError::Failed(e.to_string()))
    }
}
