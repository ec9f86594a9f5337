pub mod grading_service;
pub mod ingestion_service;
pub mod model_service;
pub mod study_navigator;
pub mod study_service;
pub mod study_view;
pub mod syllabus_service;
pub mod tutor_service;
