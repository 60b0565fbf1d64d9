//! Core data model types for examsync.
//!
//! Backend records (`BackendQuestion`, `AttemptStartPayload`) come in with
//! the backend's camelCase field names; UI-side types (`UiQuestion`, `Token`,
//! `LetteredOption`) are what the widgets render from.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AttemptError;

/// A piece of tokenized prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Token {
    /// Literal text between blanks.
    Text { content: String },
    /// A fill-in position; indices are zero-based and assigned in order of appearance.
    Blank { index: usize },
}

impl Token {
    pub fn text(content: impl Into<String>) -> Self {
        Token::Text {
            content: content.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Token::Blank { .. })
    }
}

/// An option parsed from a lettered list such as `A. Apple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetteredOption {
    /// Single uppercase letter.
    pub letter: char,
    /// Option text after the letter and its delimiter.
    pub label: String,
}

/// The widget family a question is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiKind {
    ChoiceSingle,
    ChoiceMultiple,
    Completion,
    MatchingLetter,
    MatchingHeading,
    MatchingParagraph,
    MatchingInformation,
    FlowChart,
}

impl UiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiKind::ChoiceSingle => "choice_single",
            UiKind::ChoiceMultiple => "choice_multiple",
            UiKind::Completion => "completion",
            UiKind::MatchingLetter => "matching_letter",
            UiKind::MatchingHeading => "matching_heading",
            UiKind::MatchingParagraph => "matching_paragraph",
            UiKind::MatchingInformation => "matching_information",
            UiKind::FlowChart => "flow_chart",
        }
    }
}

impl fmt::Display for UiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "choice_single" => Ok(UiKind::ChoiceSingle),
            "choice_multiple" => Ok(UiKind::ChoiceMultiple),
            "completion" => Ok(UiKind::Completion),
            "matching_letter" => Ok(UiKind::MatchingLetter),
            "matching_heading" => Ok(UiKind::MatchingHeading),
            "matching_paragraph" => Ok(UiKind::MatchingParagraph),
            "matching_information" => Ok(UiKind::MatchingInformation),
            "flow_chart" => Ok(UiKind::FlowChart),
            other => Err(format!("unknown ui kind: {other}")),
        }
    }
}

/// A question record as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendQuestion {
    pub id: String,
    #[serde(default)]
    pub idx: u32,
    /// Backend question type, e.g. `"multiple_choice_single"`.
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub prompt_md: String,
    #[serde(default)]
    pub options: Vec<BackendOption>,
    #[serde(default)]
    pub flow_chart_nodes: Vec<FlowChartNode>,
}

/// An answer option as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOption {
    pub id: String,
    /// Option text, possibly prefixed with a `"B. "` style label.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub idx: Option<u32>,
    #[serde(default)]
    pub order: Option<u32>,
}

/// A node of an authored flow chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowChartNode {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub order: Option<u32>,
}

/// An option in the shape the widgets consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiOption {
    pub id: String,
    /// Bare label text with any leading letter prefix removed.
    pub label: String,
    pub idx: Option<u32>,
    pub order: Option<u32>,
}

/// A backend question projected for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiQuestion {
    pub id: String,
    pub idx: u32,
    pub kind: UiKind,
    pub prompt: String,
    pub options: Vec<UiOption>,
    /// Flow-chart node labels in authored order (empty when the prompt carries the steps).
    pub flow_chart_nodes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Attempts
// ---------------------------------------------------------------------------

/// Attempt-start payload returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStartPayload {
    #[serde(default)]
    pub attempt_id: Option<String>,
    pub paper: PaperPayload,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_sec: u64,
    #[serde(default)]
    pub time_left: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub question_groups: Vec<QuestionGroup>,
}

/// Paper metadata kept on an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMeta {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMeta {
    pub id: String,
    pub title: String,
}

/// A group of questions sharing one instruction block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub questions: Vec<BackendQuestion>,
}

/// An in-progress attempt, owned by the session store once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub attempt_id: String,
    pub paper: PaperMeta,
    pub sections: Vec<SectionMeta>,
    /// Question groups keyed by section id.
    pub question_groups: BTreeMap<String, Vec<QuestionGroup>>,
    pub started_at: DateTime<Utc>,
    pub duration_sec: u64,
    #[serde(default)]
    pub time_left: Option<u64>,
}

impl AttemptRecord {
    /// Build a record from an attempt-start payload, rejecting payloads the
    /// start flow cannot continue with.
    pub fn from_start(payload: AttemptStartPayload) -> Result<Self, AttemptError> {
        let attempt_id = payload
            .attempt_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(AttemptError::MissingAttemptId)?;

        let mut sections = Vec::with_capacity(payload.paper.sections.len());
        let mut question_groups = BTreeMap::new();
        let mut seen = HashSet::new();

        for (index, section) in payload.paper.sections.into_iter().enumerate() {
            let id = section
                .id
                .filter(|id| !id.trim().is_empty())
                .ok_or(AttemptError::MissingSectionId { index })?;

            for question in section.question_groups.iter().flat_map(|g| &g.questions) {
                if !seen.insert(question.id.clone()) {
                    return Err(AttemptError::DuplicateQuestion {
                        question_id: question.id.clone(),
                    });
                }
            }

            sections.push(SectionMeta {
                id: id.clone(),
                title: section.title,
            });
            question_groups.insert(id, section.question_groups);
        }

        Ok(Self {
            attempt_id,
            paper: PaperMeta {
                id: payload.paper.id,
                title: payload.paper.title,
            },
            sections,
            question_groups,
            started_at: payload.started_at,
            duration_sec: payload.duration_sec,
            time_left: payload.time_left,
        })
    }

    /// Id of the section owning `question_id`.
    pub fn section_of(&self, question_id: &str) -> Option<&str> {
        self.question_groups
            .iter()
            .find(|(_, groups)| {
                groups
                    .iter()
                    .flat_map(|g| &g.questions)
                    .any(|q| q.id == question_id)
            })
            .map(|(section_id, _)| section_id.as_str())
    }

    /// All questions of the attempt, in section order.
    pub fn questions(&self) -> impl Iterator<Item = &BackendQuestion> {
        self.sections
            .iter()
            .filter_map(|s| self.question_groups.get(&s.id))
            .flatten()
            .flat_map(|g| &g.questions)
    }
}
