use std::sync::Arc;

use crate::{
    config::Config,
    repositories::InMemorySessionRepository,
    services::{
        grading_service::GradingService,
        ingestion_service::{IngestionService, LopdfExtractor, PageTextExtractor},
        model_service::{ChatModel, OpenAiChatModel},
        study_navigator::StudyRules,
        study_service::StudyService,
        syllabus_service::SyllabusService,
        tutor_service::TutorService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub study_service: Arc<StudyService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(&config));
        Self::with_components(config, model, Arc::new(LopdfExtractor))
    }

    /// Wires the services around a given model and PDF extractor.
    pub fn with_components(
        config: Config,
        model: Arc<dyn ChatModel>,
        extractor: Arc<dyn PageTextExtractor>,
    ) -> Self {
        let ingestion = IngestionService::new(extractor, config.tag_documents);
        let syllabus = SyllabusService::new(
            model.clone(),
            ingestion,
            config.syllabus_char_budget,
            config.generation_temperature,
        );
        let grading = GradingService::new(model.clone(), config.grading_temperature);
        let tutor = TutorService::new(model);

        let study_service = Arc::new(StudyService::new(
            Arc::new(InMemorySessionRepository::new()),
            syllabus,
            grading,
            tutor,
            StudyRules::from_config(&config),
            config.session_idle_minutes,
        ));

        Self {
            study_service,
            config: Arc::new(config),
        }
    }
}
