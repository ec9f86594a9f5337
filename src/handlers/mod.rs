pub mod health_handler;
pub mod session_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live};
pub use session_handler::{
    advance_topic, ask_tutor, clear_documents, create_session, delete_session, draw_final_exam,
    generate_checklist, generate_syllabus, get_session, retry_topic, simplify_topic,
    submit_answer, submit_final_exam, upload_document,
};

/// Registers every route; `main` and the HTTP tests share it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(create_session)
        .service(get_session)
        .service(delete_session)
        .service(upload_document)
        .service(clear_documents)
        .service(generate_syllabus)
        .service(submit_answer)
        .service(retry_topic)
        .service(advance_topic)
        .service(simplify_topic)
        .service(ask_tutor)
        .service(generate_checklist)
        .service(draw_final_exam)
        .service(submit_final_exam);
}
