#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Feedback, StudyState, Topic};
    use crate::services::study_navigator::{handle, StudyAction, StudyRules};

    /// Creates a topic whose title and questions carry its 1-based number
    pub fn test_topic(number: usize) -> Topic {
        Topic::new(
            format!("Tema {}", number),
            format!("Explicación detallada del tema {}", number),
            [
                format!("Pregunta {}.1", number),
                format!("Pregunta {}.2", number),
            ],
        )
    }

    /// Creates `count` numbered topics
    pub fn test_syllabus(count: usize) -> Vec<Topic> {
        (1..=count).map(test_topic).collect()
    }

    pub fn feedback_with_score(score: f32) -> Feedback {
        Feedback {
            score,
            feedback: "Respuesta razonada".to_string(),
            omissions: "Faltan fechas".to_string(),
            path_to_top_score: Some("Añade la cronología".to_string()),
        }
    }

    /// A state studying topic 0 of a fresh syllabus
    pub fn studying_state(topics: usize) -> StudyState {
        handle(
            StudyState::new(),
            StudyAction::SyllabusReplaced(test_syllabus(topics)),
            &StudyRules::default(),
        )
        .expect("fresh syllabus should be accepted")
    }

    /// A state that passed every topic of a `topics`-long syllabus
    pub fn completed_state(topics: usize) -> StudyState {
        let rules = StudyRules::default();
        let mut state = studying_state(topics);
        for idx in 0..topics {
            state = handle(state, StudyAction::AnswerSubmitted("respuesta".into()), &rules)
                .expect("submission allowed");
            state = handle(state, StudyAction::AnswerGraded(feedback_with_score(8.0)), &rules)
                .expect("grade allowed");
            if idx + 1 < topics {
                state = handle(state, StudyAction::Advance, &rules).expect("advance allowed");
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::Phase;

    #[test]
    fn test_fixtures_test_syllabus() {
        let topics = test_syllabus(3);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].title, "Tema 1");
        assert_eq!(topics[2].questions[1], "Pregunta 3.2");
    }

    #[test]
    fn test_fixtures_completed_state() {
        let state = completed_state(3);
        assert_eq!(state.phase, Phase::Completed);
        assert_eq!(state.current_index, 2);
    }
}
