//! The `examsync map` command.

use std::path::PathBuf;

use anyhow::Result;

use examsync_core::mapper::map_questions;
use examsync_core::widgets::Widget;

use super::{ignore_changes, load_questions};

pub fn execute(questions_path: PathBuf, format: String) -> Result<()> {
    let questions = load_questions(&questions_path)?;
    let mapped = map_questions(&questions);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&mapped)?),
        "table" => {
            use comfy_table::{Cell, Table};

            let mut table = Table::new();
            table.set_header(vec!["Id", "#", "Backend type", "UI kind", "Widget"]);

            for (question, ui) in questions.iter().zip(&mapped) {
                let widget = Widget::for_question(ui, "", ignore_changes());
                table.add_row(vec![
                    Cell::new(&ui.id),
                    Cell::new(ui.idx),
                    Cell::new(&question.question_type),
                    Cell::new(ui.kind),
                    Cell::new(describe(&widget)),
                ]);
            }

            println!("{table}");
            println!("{} question(s) mapped.", mapped.len());
        }
        other => anyhow::bail!("unknown format: {other} (expected table or json)"),
    }

    Ok(())
}

fn describe(widget: &Widget) -> String {
    match widget {
        Widget::FillInBlank(_) => "fill-in-blank".to_string(),
        Widget::MultiSelect(w) => format!("multi-select ({} options)", w.options().len()),
        Widget::FlowChart(w) => format!("flow chart ({} steps)", w.steps().len()),
        Widget::SummaryCompletion(w) => format!("summary ({} blanks)", w.blank_count()),
        Widget::WordListCompletion(w) => format!(
            "word list ({} blanks, {} words)",
            w.blank_count(),
            w.options().len()
        ),
        Widget::HeadingSelect(w) => format!("single select ({} options)", w.options().len()),
    }
}
