use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::client::{BoxFuture, KnowledgeBaseApi};
use super::error::{ApiError, ApiResult};
use super::types::{
    DocumentRecord, DocumentStatusReport, FeedbackRequest, FeedbackResponse, Paginated,
    ReprocessAck, SendMessageRequest, SendMessageResponse, UploadRequest,
};
use crate::documents::models::Tag;
use crate::session::SessionContext;

/// reqwest-backed implementation of the API client. Every request carries
/// the session's bearer token; nothing here retries or refreshes — a 401 is
/// surfaced like any other API error for the auth layer to act on.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    context: SessionContext,
}

impl HttpApiClient {
    pub fn new(context: SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            context,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.context.api_base(), path)
    }

    fn token(&self) -> String {
        self.context.bearer_token().to_string()
    }
}

/// Decode a response body, mapping non-2xx statuses to `ApiError::Api`
/// with the server's `detail` message when one is present.
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "An error occurred".to_string());
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(response.json::<T>().await?)
}

async fn expect_success(response: reqwest::Response) -> ApiResult<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail: "An error occurred".to_string(),
        });
    }
    Ok(())
}

impl KnowledgeBaseApi for HttpApiClient {
    fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> BoxFuture<'static, ApiResult<SendMessageResponse>> {
        let http = self.http.clone();
        let url = self.url("/chat/messages");
        let token = self.token();

        Box::pin(async move {
            debug!(conversation_id = %request.conversation_id, "POST /chat/messages");
            let response = http
                .post(url)
                .bearer_auth(token)
                .json(&request)
                .send()
                .await?;
            decode(response).await
        })
    }

    fn submit_feedback(
        &self,
        request: FeedbackRequest,
    ) -> BoxFuture<'static, ApiResult<FeedbackResponse>> {
        let http = self.http.clone();
        let url = self.url("/chat/feedback");
        let token = self.token();

        Box::pin(async move {
            debug!(message_id = %request.message_id, "POST /chat/feedback");
            let response = http
                .post(url)
                .bearer_auth(token)
                .json(&request)
                .send()
                .await?;
            decode(response).await
        })
    }

    fn upload_document(
        &self,
        request: UploadRequest,
    ) -> BoxFuture<'static, ApiResult<DocumentRecord>> {
        let http = self.http.clone();
        let url = self.url("/documents");
        let token = self.token();

        Box::pin(async move {
            debug!(file_name = %request.file_name, size = request.bytes.len(), "POST /documents");

            let file_part = Part::bytes(request.bytes)
                .file_name(request.file_name)
                .mime_str(&request.mime_type)?;
            let mut form = Form::new().part("file", file_part);

            if let Some(title) = request.title {
                form = form.text("title", title);
            }
            if let Some(description) = request.description {
                form = form.text("description", description);
            }
            if !request.tag_ids.is_empty() {
                form = form.text("tags", request.tag_ids.join(","));
            }

            let response = http
                .post(url)
                .bearer_auth(token)
                .multipart(form)
                .send()
                .await?;
            decode(response).await
        })
    }

    fn reprocess_document(&self, id: &str) -> BoxFuture<'static, ApiResult<ReprocessAck>> {
        let http = self.http.clone();
        let url = self.url(&format!("/documents/{id}/reprocess"));
        let token = self.token();

        Box::pin(async move {
            let response = http.post(url).bearer_auth(token).send().await?;
            decode(response).await
        })
    }

    fn document_status(&self, id: &str) -> BoxFuture<'static, ApiResult<DocumentStatusReport>> {
        let http = self.http.clone();
        let url = self.url(&format!("/documents/{id}/status"));
        let token = self.token();

        Box::pin(async move {
            let response = http.get(url).bearer_auth(token).send().await?;
            decode(response).await
        })
    }

    fn list_documents(&self) -> BoxFuture<'static, ApiResult<Vec<DocumentRecord>>> {
        let http = self.http.clone();
        let url = self.url("/documents");
        let token = self.token();

        Box::pin(async move {
            let response = http.get(url).bearer_auth(token).send().await?;
            let page: Paginated<DocumentRecord> = decode(response).await?;
            Ok(page.items)
        })
    }

    fn list_tags(&self) -> BoxFuture<'static, ApiResult<Vec<Tag>>> {
        let http = self.http.clone();
        let url = self.url("/tags");
        let token = self.token();

        Box::pin(async move {
            let response = http.get(url).bearer_auth(token).send().await?;
            let page: Paginated<Tag> = decode(response).await?;
            Ok(page.items)
        })
    }

    fn delete_document(&self, id: &str) -> BoxFuture<'static, ApiResult<()>> {
        let http = self.http.clone();
        let url = self.url(&format!("/documents/{id}"));
        let token = self.token();

        Box::pin(async move {
            let response = http.delete(url).bearer_auth(token).send().await?;
            expect_success(response).await
        })
    }
}
