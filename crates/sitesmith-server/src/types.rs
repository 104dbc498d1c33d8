//! Request and response types for the API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sitesmith_core::{GenerationRequest, SiteSpec};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub existing_spec: Option<SiteSpec>,
    #[serde(default)]
    pub existing_pages: Option<BTreeMap<String, String>>,
}

impl GenerateRequest {
    pub fn into_generation_request(self) -> Result<GenerationRequest, AppError> {
        if self.prompt.trim().is_empty() {
            return Err(AppError::BadRequest("prompt must not be empty".to_string()));
        }
        Ok(GenerationRequest {
            user_request: self.prompt,
            existing_spec: self.existing_spec,
            existing_pages: self.existing_pages,
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
