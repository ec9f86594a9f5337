use actix_web::{delete, get, post, web, HttpMessage, HttpRequest, HttpResponse};
use futures::StreamExt;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::domain::UploadedDocument,
    models::dto::request::{ChatRequest, SubmitAnswerRequest, UploadDocumentParams},
    models::dto::response::{DeleteSessionResponse, DocumentListResponse, SessionResponse},
    services::study_view::render,
};

const PDF_MIME: &str = "application/pdf";

#[post("/api/sessions")]
pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.study_service.create_session().await?;
    Ok(HttpResponse::Created().json(SessionResponse {
        session_id: session.id,
        view: render(&session.state),
    }))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.get_view(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/api/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.study_service.delete_session(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteSessionResponse {
        message: format!("Session '{}' deleted", id),
    }))
}

/// Reads the raw body, stopping as soon as it grows past `limit`.
async fn read_upload(
    mut payload: web::Payload,
    name: &str,
    limit: usize,
) -> Result<Vec<u8>, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|e| AppError::ValidationError(format!("Upload interrupted: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "'{}' exceeds {} bytes",
                name, limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.to_vec())
}

#[post("/api/sessions/{id}/documents")]
pub async fn upload_document(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    query: web::Query<UploadDocumentParams>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    params.validate()?;

    let content_type = req.content_type();
    if !params.has_pdf_extension() || !(content_type.is_empty() || content_type == PDF_MIME) {
        return Err(AppError::ValidationError(format!(
            "'{}' is not a PDF document",
            params.name
        )));
    }

    let body = read_upload(payload, &params.name, state.config.max_upload_bytes).await?;
    if body.is_empty() {
        return Err(AppError::ValidationError(format!(
            "'{}' is empty",
            params.name
        )));
    }

    let documents = state
        .study_service
        .add_document(&id, UploadedDocument::new(params.name, body))
        .await?;
    Ok(HttpResponse::Created().json(DocumentListResponse { documents }))
}

#[delete("/api/sessions/{id}/documents")]
pub async fn clear_documents(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.study_service.clear_documents(&id).await?;
    Ok(HttpResponse::Ok().json(DocumentListResponse {
        documents: Vec::new(),
    }))
}

#[post("/api/sessions/{id}/syllabus")]
pub async fn generate_syllabus(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.generate_syllabus(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/answers")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let view = state.study_service.submit_answer(&id, request.answer).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/retry")]
pub async fn retry_topic(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.retry(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/advance")]
pub async fn advance_topic(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.advance(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/simplify")]
pub async fn simplify_topic(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let response = state.study_service.simplify(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/sessions/{id}/chat")]
pub async fn ask_tutor(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let view = state.study_service.ask_tutor(&id, request.message).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/checklist")]
pub async fn generate_checklist(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.generate_checklist(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/final-exam")]
pub async fn draw_final_exam(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.study_service.draw_final_exam(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/final-exam/answer")]
pub async fn submit_final_exam(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let view = state
        .study_service
        .submit_final_exam(&id, request.answer)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::handlers::configure;
    use crate::services::ingestion_service::LopdfExtractor;
    use crate::services::model_service::MockChatModel;
    use actix_web::{http::StatusCode, test, App};

    fn state() -> AppState {
        AppState::with_components(
            Config::test_config(),
            Arc::new(MockChatModel::new()),
            Arc::new(LopdfExtractor),
        )
    }

    async fn new_session_id(state: &AppState) -> Uuid {
        state
            .study_service
            .create_session()
            .await
            .expect("session created")
            .id
    }

    #[actix_web::test]
    async fn test_create_session_returns_empty_view() {
        let app =
            test::init_service(App::new().app_data(web::Data::new(state())).configure(configure))
                .await;

        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["view"]["phase"], "no_syllabus");
        assert_eq!(body["view"]["topics_loaded"], 0);
    }

    #[actix_web::test]
    async fn test_unknown_session_is_404() {
        let app =
            test::init_service(App::new().app_data(web::Data::new(state())).configure(configure))
                .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_pdf_upload_is_rejected() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/documents?name=notas.txt", id))
            .insert_header(("content-type", "text/plain"))
            .set_payload("hola")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_upload_needs_pdf_name_and_pdf_mime() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        for (name, mime) in [("notas.txt", "application/pdf"), ("tema.pdf", "text/plain")] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/sessions/{}/documents?name={}", id, name))
                .insert_header(("content-type", mime))
                .set_payload("%PDF-1.5")
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} as {}", name, mime);
        }
    }

    #[actix_web::test]
    async fn test_oversized_upload_gets_json_error() {
        let mut config = Config::test_config();
        config.max_upload_bytes = 8;
        let state = AppState::with_components(
            config,
            Arc::new(MockChatModel::new()),
            Arc::new(LopdfExtractor),
        );
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/documents?name=grande.pdf", id))
            .insert_header(("content-type", "application/pdf"))
            .set_payload(vec![b'x'; 4096])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["code"], 413);
    }

    #[actix_web::test]
    async fn test_empty_upload_is_rejected() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/documents?name=tema.pdf", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_answer_without_syllabus_is_conflict() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/answers", id))
            .set_json(serde_json::json!({ "answer": "respuesta" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_blank_answer_is_bad_request() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/answers", id))
            .set_json(serde_json::json!({ "answer": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_session_then_missing() {
        let state = state();
        let id = new_session_id(&state).await;
        let app =
            test::init_service(App::new().app_data(web::Data::new(state)).configure(configure))
                .await;

        let uri = format!("/api/sessions/{}", id);
        let resp =
            test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
