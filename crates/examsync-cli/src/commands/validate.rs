//! The `examsync validate` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;

use examsync_core::mapper::{is_known_type, map_question};
use examsync_core::model::{BackendQuestion, UiKind, UiQuestion};
use examsync_core::tokenizer::{
    extract_body_after_marker, extract_ordered_steps, split_instruction_from_notes,
    split_word_list_block, tokenize_blank_slots, tokenize_blanks,
};

use super::load_questions;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let questions = load_questions(&questions_path)?;
    println!(
        "Questions: {} ({})",
        questions.len(),
        questions_path.display()
    );

    let mut seen = HashSet::new();
    let mut total_warnings = 0;

    for question in &questions {
        let mut warnings = check(question, &map_question(question));
        if !seen.insert(question.id.as_str()) {
            warnings.push("duplicate question id".to_string());
        }
        for w in &warnings {
            println!("  [{}] WARNING: {w}", question.id);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All questions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn check(question: &BackendQuestion, ui: &UiQuestion) -> Vec<String> {
    let mut warnings = Vec::new();
    let prompt = question.prompt_md.as_str();

    if !is_known_type(&question.question_type) {
        warnings.push(format!(
            "unknown question type '{}', rendered as completion",
            question.question_type
        ));
    }
    if prompt.trim().is_empty() && ui.kind != UiKind::FlowChart {
        warnings.push("empty prompt".to_string());
    }

    match ui.kind {
        UiKind::Completion => {
            let notes = split_instruction_from_notes(prompt).into_inner().notes;
            if !tokenize_blanks(&notes).is_matched() {
                warnings.push("no blank marker in prompt".to_string());
            }
        }
        UiKind::FlowChart => {
            if ui.flow_chart_nodes.is_empty() {
                let steps = extract_ordered_steps(prompt);
                if !steps.is_matched() || steps.value().len() < 2 {
                    warnings.push("no flow-chart nodes and no step list in prompt".to_string());
                }
            }
        }
        UiKind::MatchingInformation => {
            let block = split_word_list_block(prompt).into_inner();
            let body = extract_body_after_marker(&block.stem);
            if !body.is_matched() {
                warnings.push("no fill-in-the-blanks marker; whole stem used as body".to_string());
            }
            if !tokenize_blank_slots(body.value()).is_matched() {
                warnings.push("word-list body has no ___ blanks".to_string());
            }
            if block.options.is_empty() {
                warnings.push("word list has no lettered options".to_string());
            }
        }
        UiKind::ChoiceSingle
        | UiKind::ChoiceMultiple
        | UiKind::MatchingLetter
        | UiKind::MatchingParagraph
        | UiKind::MatchingHeading => {
            if ui.options.is_empty() {
                warnings.push(format!("{} question has no options", ui.kind));
            }
        }
    }

    warnings
}
