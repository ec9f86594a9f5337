//! The study loop as a pure state machine.
//!
//! `handle` takes the previous `StudyState` and one `StudyAction` and returns the next
//! state or the reason the action is not allowed right now. No I/O happens here: model
//! calls are made by `StudyService`, which feeds their outcome back in as actions.

use thiserror::Error;

use crate::config::Config;
use crate::constants::prompts;
use crate::models::domain::{ChatMessage, Feedback, FinalExam, Phase, StudyState, Topic};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("no syllabus has been generated yet")]
    NoSyllabus,

    #[error("{action} is not allowed while the session is {phase:?}")]
    NotAllowed { action: &'static str, phase: Phase },

    #[error("the current topic is not passed yet (needs at least {passing_score})")]
    NotPassed { passing_score: f32 },

    #[error("topic {0} does not exist")]
    UnknownTopic(usize),

    #[error("the answer is empty")]
    EmptyAnswer,

    #[error("no final exam has been drawn")]
    NoFinalExam,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyRules {
    pub passing_score: f32,
}

impl Default for StudyRules {
    fn default() -> Self {
        Self { passing_score: 6.0 }
    }
}

impl StudyRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            passing_score: config.passing_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudyAction {
    GenerationStarted,
    SyllabusReplaced(Vec<Topic>),
    GenerationFailed(String),
    AnswerSubmitted(String),
    AnswerGraded(Feedback),
    GradingFailed(String),
    Retry,
    Advance,
    ChatAsked(String),
    ChatAnswered(String),
    SideChannelFailed(String),
    ChecklistGenerated { topic_index: usize, checklist: String },
    FinalExamDrawn { topic_index: usize },
    FinalExamSubmitted(String),
    FinalExamGraded(String),
}

impl StudyAction {
    pub fn name(&self) -> &'static str {
        match self {
            StudyAction::GenerationStarted => "generation_started",
            StudyAction::SyllabusReplaced(_) => "syllabus_replaced",
            StudyAction::GenerationFailed(_) => "generation_failed",
            StudyAction::AnswerSubmitted(_) => "answer_submitted",
            StudyAction::AnswerGraded(_) => "answer_graded",
            StudyAction::GradingFailed(_) => "grading_failed",
            StudyAction::Retry => "retry",
            StudyAction::Advance => "advance",
            StudyAction::ChatAsked(_) => "chat_asked",
            StudyAction::ChatAnswered(_) => "chat_answered",
            StudyAction::SideChannelFailed(_) => "side_channel_failed",
            StudyAction::ChecklistGenerated { .. } => "checklist_generated",
            StudyAction::FinalExamDrawn { .. } => "final_exam_drawn",
            StudyAction::FinalExamSubmitted(_) => "final_exam_submitted",
            StudyAction::FinalExamGraded(_) => "final_exam_graded",
        }
    }
}

fn require_phase(
    state: &StudyState,
    action: &'static str,
    allowed: &[Phase],
) -> Result<(), NavigationError> {
    if allowed.contains(&state.phase) {
        return Ok(());
    }
    if state.phase == Phase::NoSyllabus {
        return Err(NavigationError::NoSyllabus);
    }
    Err(NavigationError::NotAllowed {
        action,
        phase: state.phase,
    })
}

fn require_syllabus(state: &StudyState) -> Result<(), NavigationError> {
    if state.phase == Phase::NoSyllabus || state.syllabus.is_empty() {
        return Err(NavigationError::NoSyllabus);
    }
    Ok(())
}

/// Apply one action. The input state is consumed; on error the caller keeps its copy.
pub fn handle(
    mut state: StudyState,
    action: StudyAction,
    rules: &StudyRules,
) -> Result<StudyState, NavigationError> {
    let name = action.name();
    state.last_error = None;

    match action {
        StudyAction::GenerationStarted => Ok(StudyState::new()),

        StudyAction::SyllabusReplaced(topics) => {
            let mut next = StudyState::new();
            if !topics.is_empty() {
                next.syllabus = topics;
                next.phase = Phase::Studying;
            }
            Ok(next)
        }

        StudyAction::GenerationFailed(reason) => {
            let mut next = StudyState::new();
            next.last_error = Some(reason);
            Ok(next)
        }

        StudyAction::AnswerSubmitted(answer) => {
            require_phase(&state, name, &[Phase::Studying, Phase::Graded])?;
            if answer.trim().is_empty() {
                return Err(NavigationError::EmptyAnswer);
            }
            state.pending_answer = Some(answer);
            state.last_feedback = None;
            state.passed_current = false;
            state.phase = Phase::AwaitingGrading;
            Ok(state)
        }

        StudyAction::AnswerGraded(feedback) => {
            require_phase(&state, name, &[Phase::AwaitingGrading])?;
            let passed = feedback.passes(rules.passing_score);
            state.passed_current = passed;
            state.last_feedback = Some(feedback);
            state.pending_answer = None;
            state.phase = if passed && state.is_last_topic() {
                Phase::Completed
            } else {
                Phase::Graded
            };
            Ok(state)
        }

        StudyAction::GradingFailed(reason) => {
            require_phase(&state, name, &[Phase::AwaitingGrading])?;
            state.passed_current = false;
            state.last_feedback = Some(Feedback::sentinel());
            state.pending_answer = None;
            state.phase = Phase::Graded;
            state.last_error = Some(reason);
            Ok(state)
        }

        StudyAction::Retry => {
            require_phase(&state, name, &[Phase::Graded])?;
            if state.passed_current {
                return Err(NavigationError::NotAllowed {
                    action: name,
                    phase: state.phase,
                });
            }
            state.phase = Phase::Studying;
            Ok(state)
        }

        StudyAction::Advance => {
            require_phase(&state, name, &[Phase::Graded])?;
            if !state.passed_current {
                return Err(NavigationError::NotPassed {
                    passing_score: rules.passing_score,
                });
            }
            if state.is_last_topic() {
                return Err(NavigationError::NotAllowed {
                    action: name,
                    phase: state.phase,
                });
            }
            state.current_index += 1;
            state.last_feedback = None;
            state.passed_current = false;
            state.phase = Phase::Studying;
            Ok(state)
        }

        StudyAction::ChatAsked(message) => {
            require_syllabus(&state)?;
            state
                .chats
                .entry(state.current_index)
                .or_default()
                .push(ChatMessage::user(message));
            Ok(state)
        }

        StudyAction::ChatAnswered(reply) => {
            require_syllabus(&state)?;
            state
                .chats
                .entry(state.current_index)
                .or_default()
                .push(ChatMessage::assistant(reply));
            Ok(state)
        }

        StudyAction::SideChannelFailed(reason) => {
            state.last_error = Some(reason);
            Ok(state)
        }

        StudyAction::ChecklistGenerated {
            topic_index,
            checklist,
        } => {
            require_syllabus(&state)?;
            if topic_index >= state.syllabus.len() {
                return Err(NavigationError::UnknownTopic(topic_index));
            }
            state.checklists.insert(topic_index, checklist);
            Ok(state)
        }

        StudyAction::FinalExamDrawn { topic_index } => {
            require_phase(&state, name, &[Phase::Completed])?;
            let topic = state
                .syllabus
                .get(topic_index)
                .ok_or(NavigationError::UnknownTopic(topic_index))?;
            state.final_exam = Some(FinalExam {
                topic_index,
                prompt: prompts::final_exam_question(&topic.title),
                answer: None,
                verdict: None,
            });
            Ok(state)
        }

        StudyAction::FinalExamSubmitted(answer) => {
            require_phase(&state, name, &[Phase::Completed])?;
            if answer.trim().is_empty() {
                return Err(NavigationError::EmptyAnswer);
            }
            let exam = state
                .final_exam
                .as_mut()
                .ok_or(NavigationError::NoFinalExam)?;
            exam.answer = Some(answer);
            exam.verdict = None;
            Ok(state)
        }

        StudyAction::FinalExamGraded(verdict) => {
            require_phase(&state, name, &[Phase::Completed])?;
            let exam = state
                .final_exam
                .as_mut()
                .filter(|exam| exam.answer.is_some())
                .ok_or(NavigationError::NoFinalExam)?;
            exam.verdict = Some(verdict);
            Ok(state)
        }
    }
}
