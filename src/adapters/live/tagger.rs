//! Live adapter for the `Tagger` port using the UDPipe 2 REST API.

use std::error::Error;

use reqwest::Client;
use serde::Deserialize;

use crate::ports::tagger::{TagFuture, TagRequest, TagResponse, Tagger};

/// Tagger that posts pre-tokenized tables to a UDPipe-compatible service.
pub struct UdpipeTagger {
    client: Client,
    base_url: String,
}

impl UdpipeTagger {
    /// Creates a tagger for the service rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into() }
    }

    fn process_url(&self) -> String {
        format!("{}/process", self.base_url.trim_end_matches('/'))
    }
}

/// Successful response body of the `process` endpoint.
#[derive(Deserialize)]
struct ProcessResponse {
    result: String,
}

impl UdpipeTagger {
    async fn process(
        &self,
        request: TagRequest,
    ) -> Result<TagResponse, Box<dyn Error + Send + Sync>> {
        // Input is already tokenized; ask for tagging and parsing only.
        let form = [
            ("model", request.model.as_str()),
            ("input", "conllu"),
            ("tagger", ""),
            ("parser", ""),
            ("data", request.table.as_str()),
        ];

        let response = self
            .client
            .post(self.process_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| format!("tagging request failed: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read tagging response: {e}"))?;

        if !status.is_success() {
            return Err(format!("tagging service error ({}): {body}", status.as_u16()).into());
        }

        let parsed: ProcessResponse = serde_json::from_str(&body)
            .map_err(|e| format!("failed to parse tagging response: {e}"))?;
        Ok(TagResponse { table: parsed.result })
    }
}

impl Tagger for UdpipeTagger {
    fn tag(&self, request: &TagRequest) -> TagFuture<'_> {
        Box::pin(self.process(request.clone()))
    }
}
