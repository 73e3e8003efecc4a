//! Document upload handler.
//!
//! ```text
//! POST /documents/upload {"filename":"notes.txt","text":"..."}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DocumentUpload, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    json_body, map_document_validation_error, missing_field_error,
};

/// Request body for `POST /documents/upload`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UploadRequest {
    #[schema(example = "supplier-notes.txt")]
    pub filename: Option<String>,
    /// Defaults to `text/plain`.
    pub content_type: Option<String>,
    pub text: Option<String>,
}

/// Confirmation of a stored and embedded upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "File uploaded and embedded")]
    pub message: String,
    pub doc_id: i32,
    pub chunks: usize,
}

/// Store a text document and embed it for the caller's chatbot context.
#[utoipa::path(
    post,
    path = "/documents/upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Document stored", body = UploadResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Embedding provider unavailable", body = Error)
    ),
    tags = ["documents"],
    operation_id = "uploadDocument",
    security(("bearer" = []))
)]
#[post("/upload")]
pub async fn upload_document(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: Result<web::Json<UploadRequest>, actix_web::Error>,
) -> ApiResult<web::Json<UploadResponse>> {
    let request = json_body(payload)?;
    let filename = request
        .filename
        .ok_or_else(|| missing_field_error("filename"))?;
    let text = request.text.ok_or_else(|| missing_field_error("text"))?;
    let upload = DocumentUpload::try_from_parts(&filename, request.content_type.as_deref(), text)
        .map_err(map_document_validation_error)?;
    let receipt = state.documents.upload(caller.user(), upload).await?;
    Ok(web::Json(UploadResponse {
        message: "File uploaded and embedded".to_owned(),
        doc_id: receipt.document_id.get(),
        chunks: receipt.chunks,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockDocumentsCommand;
    use crate::domain::{DocumentId, UploadReceipt};
    use crate::inbound::http::test_utils::{app_with_state, fixture_bearer};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn upload(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            app_with_state(state).service(web::scope("/documents").service(upload_document)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/documents/upload")
            .insert_header(fixture_bearer())
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn upload_reports_document_and_chunks() {
        let mut documents = MockDocumentsCommand::new();
        documents
            .expect_upload()
            .withf(|caller, upload| {
                caller.user_id.get() == 1
                    && upload.filename() == "notes.txt"
                    && upload.content_type() == "text/plain"
            })
            .times(1)
            .return_once(|_, _| {
                Ok(UploadReceipt {
                    document_id: DocumentId::new(4),
                    chunks: 3,
                })
            });
        let state = HttpState {
            documents: Arc::new(documents),
            ..HttpState::fixtures()
        };

        let (status, body) = upload(
            state,
            json!({"filename": " notes.txt ", "text": "Suppliers ship on Mondays."}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "File uploaded and embedded", "doc_id": 4, "chunks": 3})
        );
    }

    #[rstest]
    #[case(json!({"text": "body"}), "filename")]
    #[case(json!({"filename": "  ", "text": "body"}), "filename")]
    #[case(json!({"filename": "a.txt"}), "text")]
    #[case(json!({"filename": "a.txt", "text": " \n "}), "text")]
    #[actix_web::test]
    async fn incomplete_uploads_are_rejected(#[case] body: Value, #[case] field: &str) {
        let mut documents = MockDocumentsCommand::new();
        documents.expect_upload().never();
        let state = HttpState {
            documents: Arc::new(documents),
            ..HttpState::fixtures()
        };

        let (status, body) = upload(state, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }
}
