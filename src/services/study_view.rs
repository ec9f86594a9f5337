use crate::models::domain::{Phase, StudyState};
use crate::models::dto::response::{FinalExamView, ProgressView, StudyView, TopicView};

/// Query side of the study loop: describes what to show, changes nothing.
pub fn render(state: &StudyState) -> StudyView {
    let total = state.syllabus.len();
    let topic = state.current_topic();

    let progress = topic.map(|_| {
        let position = state.current_index + 1;
        ProgressView {
            position,
            total,
            fraction: position as f32 / total as f32,
            label: format!("Tema {} de {}", position, total),
        }
    });

    let final_exam = state.final_exam.as_ref().and_then(|exam| {
        state.syllabus.get(exam.topic_index).map(|t| FinalExamView {
            prompt: exam.prompt.clone(),
            topic_title: t.title.clone(),
            answer: exam.answer.clone(),
            verdict: exam.verdict.clone(),
        })
    });

    StudyView {
        phase: state.phase,
        topics_loaded: total,
        progress,
        topic: topic.map(|t| TopicView {
            index: state.current_index,
            title: t.title.clone(),
            explanation: t.explanation.clone(),
            questions: t.questions.to_vec(),
        }),
        feedback: state.last_feedback.clone(),
        passed_current: state.passed_current,
        can_submit: matches!(state.phase, Phase::Studying | Phase::Graded),
        can_advance: state.phase == Phase::Graded
            && state.passed_current
            && !state.is_last_topic(),
        completed: state.phase == Phase::Completed,
        chat: state.current_chat().to_vec(),
        checklist: state.current_checklist().map(str::to_string),
        final_exam,
        error: state.last_error.clone(),
    }
}
