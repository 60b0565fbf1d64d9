//! Self-synchronizing question widgets.
//!
//! Every widget exposes the same contract: it is built from a prompt, a
//! current wire value and a change callback; `receive` applies later
//! external values, and user operations call the callback with the new wire
//! value when (and only when) the answer actually changed.

pub mod fill_in_blank;
pub mod flow_chart;
pub mod heading;
pub mod multi_select;
pub mod summary;
pub mod sync;
pub mod word_list;

pub use fill_in_blank::FillInBlank;
pub use flow_chart::FlowChart;
pub use heading::HeadingSelect;
pub use multi_select::MultiSelect;
pub use summary::SummaryCompletion;
pub use sync::{AnswerState, ChangeCallback, SyncPhase, Synchronizer};
pub use word_list::WordListCompletion;

use crate::model::{UiKind, UiQuestion};
use crate::tokenizer::{count_blanks, split_instruction_from_notes, tokenize_blanks};

/// Any widget, selected from a question's UI kind.
#[derive(Debug)]
pub enum Widget {
    FillInBlank(FillInBlank),
    MultiSelect(MultiSelect),
    FlowChart(FlowChart),
    SummaryCompletion(SummaryCompletion),
    WordListCompletion(WordListCompletion),
    HeadingSelect(HeadingSelect),
}

impl Widget {
    /// Build the widget for a mapped question and mount it with `value`.
    ///
    /// Completion questions with two or more blanks in their notes render as a
    /// summary; single-blank or blank-free completions are plain text inputs.
    pub fn for_question(question: &UiQuestion, value: &str, on_change: ChangeCallback) -> Self {
        let id = question.id.clone();
        let prompt = question.prompt.as_str();
        match question.kind {
            UiKind::ChoiceSingle
            | UiKind::MatchingLetter
            | UiKind::MatchingParagraph
            | UiKind::MatchingHeading => Widget::HeadingSelect(HeadingSelect::new(
                id,
                prompt,
                question.options.clone(),
                value,
                on_change,
            )),
            UiKind::ChoiceMultiple => Widget::MultiSelect(MultiSelect::new(
                id,
                prompt,
                question.options.clone(),
                value,
                on_change,
            )),
            UiKind::FlowChart => Widget::FlowChart(FlowChart::new(
                id,
                prompt,
                &question.flow_chart_nodes,
                value,
                on_change,
            )),
            UiKind::MatchingInformation => {
                Widget::WordListCompletion(WordListCompletion::new(id, prompt, value, on_change))
            }
            UiKind::Completion => {
                let notes = split_instruction_from_notes(prompt).into_inner().notes;
                if count_blanks(tokenize_blanks(&notes).value()) >= 2 {
                    Widget::SummaryCompletion(SummaryCompletion::new(id, prompt, value, on_change))
                } else {
                    Widget::FillInBlank(FillInBlank::new(id, prompt, value, on_change))
                }
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Widget::FillInBlank(w) => w.id(),
            Widget::MultiSelect(w) => w.id(),
            Widget::FlowChart(w) => w.id(),
            Widget::SummaryCompletion(w) => w.id(),
            Widget::WordListCompletion(w) => w.id(),
            Widget::HeadingSelect(w) => w.id(),
        }
    }

    /// Current wire value.
    pub fn value(&self) -> String {
        match self {
            Widget::FillInBlank(w) => w.value(),
            Widget::MultiSelect(w) => w.value(),
            Widget::FlowChart(w) => w.value(),
            Widget::SummaryCompletion(w) => w.value(),
            Widget::WordListCompletion(w) => w.value(),
            Widget::HeadingSelect(w) => w.value(),
        }
    }

    /// Apply an externally supplied value; see [`Synchronizer::receive`].
    pub fn receive(&mut self, value: &str) -> bool {
        match self {
            Widget::FillInBlank(w) => w.receive(value),
            Widget::MultiSelect(w) => w.receive(value),
            Widget::FlowChart(w) => w.receive(value),
            Widget::SummaryCompletion(w) => w.receive(value),
            Widget::WordListCompletion(w) => w.receive(value),
            Widget::HeadingSelect(w) => w.receive(value),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        match self {
            Widget::FillInBlank(w) => w.phase(),
            Widget::MultiSelect(w) => w.phase(),
            Widget::FlowChart(w) => w.phase(),
            Widget::SummaryCompletion(w) => w.phase(),
            Widget::WordListCompletion(w) => w.phase(),
            Widget::HeadingSelect(w) => w.phase(),
        }
    }
}
