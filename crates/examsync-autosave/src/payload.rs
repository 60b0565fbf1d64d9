//! The outbound autosave payload.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use examsync_core::traits::SectionResolver;

/// One answered question.
///
/// `selected_values` is empty for an empty answer, otherwise it holds the
/// raw wire string as its only element. Widget encodings are not
/// interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub section_id: String,
    pub selected_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosavePayload {
    pub answers: Vec<AnswerEntry>,
    pub client_revision: i64,
}

/// Client revision for a save issued now: wall-clock milliseconds.
pub fn wall_clock_revision() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a payload from a question id → wire value snapshot.
///
/// Questions the resolver cannot place in a section are left out.
pub fn build_payload(
    answers: &BTreeMap<String, String>,
    resolver: &dyn SectionResolver,
    client_revision: i64,
) -> AutosavePayload {
    let answers = answers
        .iter()
        .filter_map(|(question_id, value)| {
            let Some(section_id) = resolver.section_for(question_id) else {
                warn!(question = %question_id, "no section for answered question; not saved");
                return None;
            };
            let selected_values = if value.is_empty() {
                Vec::new()
            } else {
                vec![value.clone()]
            };
            Some(AnswerEntry {
                question_id: question_id.clone(),
                section_id,
                selected_values,
            })
        })
        .collect();

    AutosavePayload {
        answers,
        client_revision,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolver() -> HashMap<String, String> {
        HashMap::from([
            ("q1".to_string(), "s1".to_string()),
            ("q2".to_string(), "s2".to_string()),
        ])
    }

    #[test]
    fn entries_carry_raw_values() {
        let answers = BTreeMap::from([
            ("q1".to_string(), r#"["A","C"]"#.to_string()),
            ("q2".to_string(), String::new()),
        ]);
        let payload = build_payload(&answers, &resolver(), 42);
        assert_eq!(payload.client_revision, 42);
        assert_eq!(
            payload.answers,
            vec![
                AnswerEntry {
                    question_id: "q1".into(),
                    section_id: "s1".into(),
                    selected_values: vec![r#"["A","C"]"#.into()],
                },
                AnswerEntry {
                    question_id: "q2".into(),
                    section_id: "s2".into(),
                    selected_values: vec![],
                },
            ]
        );
    }

    #[test]
    fn unresolved_questions_are_skipped() {
        let answers = BTreeMap::from([
            ("q1".to_string(), "x".to_string()),
            ("ghost".to_string(), "y".to_string()),
        ]);
        let payload = build_payload(&answers, &resolver(), 1);
        assert_eq!(payload.answers.len(), 1);
        assert_eq!(payload.answers[0].question_id, "q1");
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let answers = BTreeMap::from([("q1".to_string(), "x".to_string())]);
        let json = serde_json::to_value(build_payload(&answers, &resolver(), 7)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "answers": [{"questionId": "q1", "sectionId": "s1", "selectedValues": ["x"]}],
                "clientRevision": 7
            })
        );
    }
}
