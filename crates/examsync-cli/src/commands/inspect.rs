//! The `examsync inspect` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examsync_core::model::Token;
use examsync_core::tokenizer::{
    count_blanks, extract_body_after_marker, extract_ordered_steps, normalize,
    split_instruction_from_notes, split_word_list_block, tokenize_blank_slots, tokenize_blanks,
    Extraction,
};

pub fn execute(prompt_path: PathBuf, format: String) -> Result<()> {
    let raw = std::fs::read_to_string(&prompt_path)
        .with_context(|| format!("failed to read prompt: {}", prompt_path.display()))?;

    let sections = split_instruction_from_notes(&raw);
    let blanks = tokenize_blanks(&sections.value().notes);
    let steps = extract_ordered_steps(&raw);
    let word_list = split_word_list_block(&raw);
    let body = extract_body_after_marker(&word_list.value().stem);
    let slots = tokenize_blank_slots(body.value());

    match format.as_str() {
        "json" => {
            let report = serde_json::json!({
                "normalized": normalize(&raw),
                "sections": sections,
                "blanks": blanks,
                "steps": steps,
                "wordList": word_list,
                "body": body,
                "slots": slots,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => {
            println!("Prompt: {}", prompt_path.display());
            println!();
            println!("Instruction/notes split: {}", status(&sections));
            if sections.is_matched() {
                println!("  instruction: {}", one_line(&sections.value().instruction));
            }
            println!(
                "Blanks: {} ({})",
                count_blanks(blanks.value()),
                status(&blanks)
            );
            println!("  {}", render(blanks.value()));
            println!("Steps: {} ({})", steps.value().len(), status(&steps));
            for (i, step) in steps.value().iter().enumerate() {
                println!("  {}. {step}", i + 1);
            }
            println!(
                "Word list: {} option(s) ({})",
                word_list.value().options.len(),
                status(&word_list)
            );
            for option in &word_list.value().options {
                println!("  {}. {}", option.letter, option.label);
            }
            println!("Fill-in marker: {}", status(&body));
            println!(
                "Word-list blanks: {} ({})",
                slots.value().blank_count,
                status(&slots)
            );
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn status<T>(extraction: &Extraction<T>) -> &'static str {
    if extraction.is_matched() {
        "matched"
    } else {
        "fallback"
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Blank tokens as `[#n]`, 1-based, with text collapsed onto one line.
fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text { content } => out.push_str(content),
            Token::Blank { index } => out.push_str(&format!("[#{}]", index + 1)),
        }
    }
    one_line(&out)
}
