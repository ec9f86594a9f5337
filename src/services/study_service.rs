use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{StudySession, Topic, UploadedDocument},
    models::dto::response::{SimplifiedExplanationResponse, StudyView},
    repositories::SessionRepository,
    services::{
        grading_service::GradingService,
        study_navigator::{handle, NavigationError, StudyAction, StudyRules},
        study_view::render,
        syllabus_service::SyllabusService,
        tutor_service::TutorService,
    },
};

/// Runs each user action against a session: model calls first, then the pure
/// navigator, then the store.
pub struct StudyService {
    sessions: Arc<dyn SessionRepository>,
    syllabus: SyllabusService,
    grading: GradingService,
    tutor: TutorService,
    rules: StudyRules,
    session_idle: Duration,
}

impl StudyService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        syllabus: SyllabusService,
        grading: GradingService,
        tutor: TutorService,
        rules: StudyRules,
        session_idle_minutes: i64,
    ) -> Self {
        Self {
            sessions,
            syllabus,
            grading,
            tutor,
            rules,
            session_idle: Duration::minutes(session_idle_minutes),
        }
    }

    async fn load(&self, id: &Uuid) -> AppResult<StudySession> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    fn apply(&self, session: &mut StudySession, action: StudyAction) -> AppResult<()> {
        let name = action.name();
        let next = handle(session.state.clone(), action, &self.rules).map_err(|e| {
            log::info!("Session {} rejected {}: {}", session.id, name, e);
            e
        })?;
        log::debug!(
            "Session {} {}: {:?} -> {:?}",
            session.id,
            name,
            session.state.phase,
            next.phase
        );
        session.state = next;
        Ok(())
    }

    fn current_topic(session: &StudySession) -> AppResult<Topic> {
        session
            .state
            .current_topic()
            .cloned()
            .ok_or_else(|| NavigationError::NoSyllabus.into())
    }

    /// Records a side-channel failure so the view shows it, then hands the error back.
    async fn fail_side_channel(&self, mut session: StudySession, err: AppError) -> AppError {
        log::warn!("Session {} side channel failed: {}", session.id, err);
        if self
            .apply(&mut session, StudyAction::SideChannelFailed(err.to_string()))
            .is_ok()
        {
            if let Err(save_err) = self.sessions.update(session).await {
                log::error!("Could not record side channel failure: {}", save_err);
            }
        }
        err
    }

    pub async fn create_session(&self) -> AppResult<StudySession> {
        let purged = self.sessions.purge_idle(Utc::now() - self.session_idle).await?;
        if purged > 0 {
            log::info!("Purged {} idle sessions", purged);
        }

        let session = self.sessions.create(StudySession::new()).await?;
        log::info!("Created session {}", session.id);
        Ok(session)
    }

    pub async fn get_view(&self, id: &Uuid) -> AppResult<StudyView> {
        let session = self.load(id).await?;
        Ok(render(&session.state))
    }

    pub async fn delete_session(&self, id: &Uuid) -> AppResult<()> {
        if !self.sessions.delete(id).await? {
            return Err(AppError::NotFound(format!("Session with id '{}' not found", id)));
        }
        log::info!("Deleted session {}", id);
        Ok(())
    }

    pub async fn add_document(
        &self,
        id: &Uuid,
        document: UploadedDocument,
    ) -> AppResult<Vec<UploadedDocument>> {
        let mut session = self.load(id).await?;
        log::info!(
            "Session {} staged '{}' ({} bytes)",
            id,
            document.name,
            document.size_bytes
        );
        session.documents.push(document);
        let session = self.sessions.update(session).await?;
        Ok(session.documents)
    }

    pub async fn clear_documents(&self, id: &Uuid) -> AppResult<()> {
        let mut session = self.load(id).await?;
        session.documents.clear();
        self.sessions.update(session).await?;
        Ok(())
    }

    /// Replaces the syllabus. Generation problems leave an empty syllabus plus an error
    /// in the view rather than failing the request.
    pub async fn generate_syllabus(&self, id: &Uuid) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        if session.documents.is_empty() {
            return Err(AppError::ValidationError(
                "Upload at least one PDF before generating a syllabus".to_string(),
            ));
        }

        self.apply(&mut session, StudyAction::GenerationStarted)?;

        let action = match self.syllabus.generate(session.documents.clone()).await {
            Ok(topics) => StudyAction::SyllabusReplaced(topics),
            Err(e) => {
                log::warn!("Session {} syllabus generation failed: {}", id, e);
                StudyAction::GenerationFailed(format!("Error con la IA: {}", e))
            }
        };
        self.apply(&mut session, action)?;

        let session = self.sessions.update(session).await?;
        Ok(render(&session.state))
    }

    /// Grades on a local copy and saves once, so a request dropped mid-call leaves the
    /// stored session where it was.
    pub async fn submit_answer(&self, id: &Uuid, answer: String) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        self.apply(&mut session, StudyAction::AnswerSubmitted(answer.clone()))?;
        let topic = Self::current_topic(&session)?;

        let outcome = self.grading.grade(&topic, &answer).await;
        let action = match outcome.error {
            None => StudyAction::AnswerGraded(outcome.feedback),
            Some(reason) => StudyAction::GradingFailed(reason),
        };
        self.apply(&mut session, action)?;

        let session = self.sessions.update(session).await?;
        Ok(render(&session.state))
    }

    pub async fn retry(&self, id: &Uuid) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        self.apply(&mut session, StudyAction::Retry)?;
        let session = self.sessions.update(session).await?;
        Ok(render(&session.state))
    }

    pub async fn advance(&self, id: &Uuid) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        self.apply(&mut session, StudyAction::Advance)?;
        let session = self.sessions.update(session).await?;
        log::info!(
            "Session {} advanced to topic {}",
            id,
            session.state.current_index
        );
        Ok(render(&session.state))
    }

    pub async fn simplify(&self, id: &Uuid) -> AppResult<SimplifiedExplanationResponse> {
        let session = self.load(id).await?;
        let topic = Self::current_topic(&session)?;
        let topic_index = session.state.current_index;

        match self.tutor.simplify(&topic).await {
            Ok(text) => Ok(SimplifiedExplanationResponse { topic_index, text }),
            Err(e) => Err(self.fail_side_channel(session, e).await),
        }
    }

    pub async fn ask_tutor(&self, id: &Uuid, message: String) -> AppResult<StudyView> {
        let loaded = self.load(id).await?;
        let topic = Self::current_topic(&loaded)?;
        let mut session = loaded.clone();
        self.apply(&mut session, StudyAction::ChatAsked(message.clone()))?;

        match self.tutor.answer_question(&topic, &message).await {
            Ok(reply) => {
                self.apply(&mut session, StudyAction::ChatAnswered(reply))?;
                let session = self.sessions.update(session).await?;
                Ok(render(&session.state))
            }
            Err(e) => Err(self.fail_side_channel(loaded, e).await),
        }
    }

    pub async fn generate_checklist(&self, id: &Uuid) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        let topic = Self::current_topic(&session)?;
        let topic_index = session.state.current_index;

        match self.tutor.checklist(&topic).await {
            Ok(checklist) => {
                self.apply(
                    &mut session,
                    StudyAction::ChecklistGenerated {
                        topic_index,
                        checklist,
                    },
                )?;
                let session = self.sessions.update(session).await?;
                Ok(render(&session.state))
            }
            Err(e) => Err(self.fail_side_channel(session, e).await),
        }
    }

    pub async fn draw_final_exam(&self, id: &Uuid) -> AppResult<StudyView> {
        let mut session = self.load(id).await?;
        let total = session.state.syllabus.len();
        if total == 0 {
            return Err(NavigationError::NoSyllabus.into());
        }

        let topic_index = rand::rng().random_range(0..total);
        self.apply(&mut session, StudyAction::FinalExamDrawn { topic_index })?;
        let session = self.sessions.update(session).await?;
        log::info!("Session {} drew final exam topic {}", id, topic_index);
        Ok(render(&session.state))
    }

    pub async fn submit_final_exam(&self, id: &Uuid, answer: String) -> AppResult<StudyView> {
        let loaded = self.load(id).await?;
        let mut session = loaded.clone();
        self.apply(&mut session, StudyAction::FinalExamSubmitted(answer.clone()))?;

        let (prompt, topic) = session
            .state
            .final_exam
            .as_ref()
            .and_then(|exam| {
                session
                    .state
                    .syllabus
                    .get(exam.topic_index)
                    .map(|topic| (exam.prompt.clone(), topic.clone()))
            })
            .ok_or(AppError::from(NavigationError::NoFinalExam))?;

        match self.tutor.grade_final_exam(&prompt, &answer, &topic).await {
            Ok(verdict) => {
                self.apply(&mut session, StudyAction::FinalExamGraded(verdict))?;
                let session = self.sessions.update(session).await?;
                Ok(render(&session.state))
            }
            Err(e) => Err(self.fail_side_channel(loaded, e).await),
        }
    }
}
