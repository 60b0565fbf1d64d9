//! Backend question type → UI kind mapping and option projection.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::model::{BackendOption, BackendQuestion, FlowChartNode, UiKind, UiOption, UiQuestion};
use crate::tokenizer::{has_blank_marker, has_word_list_heading, normalize};

lazy_static! {
    static ref LETTER_PREFIX: Regex = Regex::new(r"^\s*[A-Z]\.\s+").expect("letter prefix pattern");
}

fn type_key(question_type: &str) -> String {
    question_type
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

fn lookup(key: &str, prompt: &str) -> Option<UiKind> {
    let kind = match key {
        "multiple_choice" | "multiple_choice_single" | "true_false_not_given"
        | "yes_no_not_given" => UiKind::ChoiceSingle,
        "multiple_choice_multiple" => UiKind::ChoiceMultiple,
        "short_answer" | "sentence_completion" | "summary_completion" | "note_completion"
        | "table_completion" | "form_completion" | "diagram_label_completion" | "fill_blank" => {
            UiKind::Completion
        }
        "matching_features" | "matching_sentence_endings" => UiKind::MatchingLetter,
        "matching_headings" => UiKind::MatchingHeading,
        "flow_chart" | "flow_chart_completion" => UiKind::FlowChart,
        "matching_information" => {
            let text = normalize(prompt);
            if has_word_list_heading(&text) && has_blank_marker(&text) {
                UiKind::MatchingInformation
            } else {
                UiKind::MatchingParagraph
            }
        }
        _ => return None,
    };
    Some(kind)
}

/// Classify a backend question type.
///
/// `matching_information` is split at runtime: prompts carrying both a
/// `Word List:` heading and a blank marker are word-list completions,
/// everything else matches paragraphs. Unknown types render as completion.
pub fn classify(question_type: &str, prompt: &str) -> UiKind {
    let key = type_key(question_type);
    lookup(&key, prompt).unwrap_or_else(|| {
        warn!(question_type = %key, "unrecognized question type; rendering as completion");
        UiKind::Completion
    })
}

/// Whether `question_type` is in the lookup table (case and separator insensitive).
pub fn is_known_type(question_type: &str) -> bool {
    lookup(&type_key(question_type), "").is_some()
}

/// Strip a leading `"B. "` style label from option text.
pub fn strip_letter_prefix(content: &str) -> &str {
    match LETTER_PREFIX.find(content) {
        Some(m) => &content[m.end()..],
        None => content,
    }
}

pub fn project_option(option: &BackendOption) -> UiOption {
    UiOption {
        id: option.id.clone(),
        label: strip_letter_prefix(&option.content).trim().to_string(),
        idx: option.idx,
        order: option.order,
    }
}

fn node_labels(nodes: &[FlowChartNode]) -> Vec<String> {
    let mut ordered: Vec<&FlowChartNode> = nodes.iter().collect();
    ordered.sort_by_key(|n| n.order.unwrap_or(u32::MAX));
    ordered
        .into_iter()
        .map(|n| n.label.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Project a backend question into the shape the widgets render.
pub fn map_question(question: &BackendQuestion) -> UiQuestion {
    let kind = classify(&question.question_type, &question.prompt_md);
    debug!(question = %question.id, backend_type = %question.question_type, %kind, "mapped question");
    UiQuestion {
        id: question.id.clone(),
        idx: question.idx,
        kind,
        prompt: question.prompt_md.clone(),
        options: question.options.iter().map(project_option).collect(),
        flow_chart_nodes: node_labels(&question.flow_chart_nodes),
    }
}

pub fn map_questions(questions: &[BackendQuestion]) -> Vec<UiQuestion> {
    questions.iter().map(map_question).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, content: &str) -> BackendOption {
        BackendOption {
            id: id.into(),
            content: content.into(),
            idx: Some(2),
            order: Some(5),
        }
    }

    #[test]
    fn table_lookup() {
        assert_eq!(classify("multiple_choice_single", ""), UiKind::ChoiceSingle);
        assert_eq!(classify("TRUE_FALSE_NOT_GIVEN", ""), UiKind::ChoiceSingle);
        assert_eq!(classify("multiple-choice-multiple", ""), UiKind::ChoiceMultiple);
        assert_eq!(classify("sentence_completion", ""), UiKind::Completion);
        assert_eq!(classify("matching_features", ""), UiKind::MatchingLetter);
        assert_eq!(classify("matching_sentence_endings", ""), UiKind::MatchingLetter);
        assert_eq!(classify("matching_headings", ""), UiKind::MatchingHeading);
        assert_eq!(classify("flow_chart_completion", ""), UiKind::FlowChart);
    }

    #[test]
    fn unknown_type_defaults_to_completion() {
        assert_eq!(classify("essay", "Write 250 words"), UiKind::Completion);
        assert_eq!(classify("", ""), UiKind::Completion);
        assert!(!is_known_type("essay"));
        assert!(is_known_type("Matching Information"));
    }

    #[test]
    fn matching_information_is_disambiguated_by_prompt() {
        let word_list = r"Bees visit ___ often.\n**Word List:**\nA. flowers";
        assert_eq!(
            classify("matching_information", word_list),
            UiKind::MatchingInformation
        );
        let no_blank = "Which paragraph mentions bees?\nWord List:\nA. flowers";
        assert_eq!(
            classify("matching_information", no_blank),
            UiKind::MatchingParagraph
        );
        assert_eq!(
            classify("matching_information", "Which paragraph ___ mentions bees?"),
            UiKind::MatchingParagraph
        );
    }

    #[test]
    fn crlf_word_list_prompt_is_matching_information() {
        let raw = "Fill in the blanks using the list below:\r\n\r\nBees visit ___ often.\r\n\r\n**Word List:**\r\nB. Banana\r\nA. Apple\r\n";
        assert_eq!(
            classify("matching_information", raw),
            UiKind::MatchingInformation
        );
    }

    #[test]
    fn option_projection_strips_letter_prefix() {
        let ui = project_option(&option("o1", "B. The rise of trade"));
        assert_eq!(ui.label, "The rise of trade");
        assert_eq!(ui.id, "o1");
        assert_eq!(ui.idx, Some(2));
        assert_eq!(ui.order, Some(5));

        assert_eq!(project_option(&option("o2", "Plain text")).label, "Plain text");
        assert_eq!(project_option(&option("o3", "b. lower")).label, "b. lower");
    }

    #[test]
    fn flow_chart_nodes_follow_order_field() {
        let question = BackendQuestion {
            id: "q1".into(),
            idx: 1,
            question_type: "flow_chart".into(),
            prompt_md: String::new(),
            options: vec![],
            flow_chart_nodes: vec![
                FlowChartNode {
                    id: None,
                    label: "Bake".into(),
                    order: Some(2),
                },
                FlowChartNode {
                    id: None,
                    label: " Mix ".into(),
                    order: Some(1),
                },
                FlowChartNode {
                    id: None,
                    label: "  ".into(),
                    order: None,
                },
            ],
        };
        let ui = map_question(&question);
        assert_eq!(ui.kind, UiKind::FlowChart);
        assert_eq!(ui.flow_chart_nodes, vec!["Mix", "Bake"]);
    }
}
