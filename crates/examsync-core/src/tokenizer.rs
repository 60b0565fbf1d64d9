//! Prompt text extraction.
//!
//! Prompts are authored by hand in a loose markdown dialect: separators vary,
//! newlines sometimes arrive as literal `\n` escapes, and casing is
//! inconsistent. Every function here is total. When a pattern is not found
//! the result is an [`Extraction::Fallback`] carrying the input as a single
//! unit, so callers can always render something and tests can tell confident
//! parses from degraded ones.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::model::{LetteredOption, Token};

lazy_static! {
    static ref ANSWER_SHEET: Regex =
        Regex::new(r"(?i)answer\s+sheet\.?").expect("answer-sheet pattern");
    /// Generic blank marker: a run of 3+ underscores, optionally numbered `[n]`.
    static ref BLANK_RUN: Regex = Regex::new(r"_{3,}(?:\[\d+\])?").expect("blank pattern");
    /// Word-list blank marker: exactly three underscores, optionally numbered `[n]`.
    static ref BLANK_SLOT: Regex = Regex::new(r"___(?:\[\d+\])?").expect("slot pattern");
    /// Instructional keyword introducing a step list, with an optional clause up to a colon.
    static ref READ_KEYWORD: Regex =
        Regex::new(r"(?i)\bread\b(?:[^:\n]*:)?").expect("read keyword pattern");
    static ref WORD_LIST_HEADING: Regex =
        Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*)?Word List:(?:\*\*)?[ \t]*\r?$")
            .expect("word list heading pattern");
    static ref FILL_MARKER: Regex =
        Regex::new(r"(?is)fill[\s-]+in[\s-]+(?:the[\s-]+)?blanks?\b.*?:[ \t]*(?:\r?\n)+")
            .expect("fill marker pattern");
    static ref LETTERED_OPTION: Regex =
        Regex::new(r"^([A-Z])[.)\-:]\s+(.+)$").expect("lettered option pattern");
}

/// Outcome of a best-effort extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Extraction<T> {
    /// The expected structure was found.
    Matched(T),
    /// The structure was absent; the value is the degraded rendition.
    Fallback(T),
}

impl<T> Extraction<T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Extraction::Matched(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Extraction::Matched(v) | Extraction::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Extraction::Matched(v) | Extraction::Fallback(v) => v,
        }
    }

    fn matched_if(matched: bool, value: T) -> Self {
        if matched {
            Extraction::Matched(value)
        } else {
            Extraction::Fallback(value)
        }
    }
}

/// Instruction block and the notes that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSections {
    pub instruction: String,
    pub notes: String,
}

/// A word-list prompt split into its stem and the lettered options below the heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordListBlock {
    pub stem: String,
    pub options: Vec<LetteredOption>,
}

/// Tokens of a word-list body together with the number of blanks in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlankSlots {
    pub tokens: Vec<Token>,
    pub blank_count: usize,
}

/// Replace literal two-character `\n` escapes with real line breaks.
pub fn normalize(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Split a prompt at the first "answer sheet" phrase.
///
/// Everything through the phrase (and an optional period) is the
/// instruction; the rest is notes. Without the phrase the whole text is notes.
pub fn split_instruction_from_notes(raw: &str) -> Extraction<PromptSections> {
    let text = normalize(raw);
    match ANSWER_SHEET.find(&text) {
        Some(m) => Extraction::Matched(PromptSections {
            instruction: text[..m.end()].trim().to_string(),
            notes: text[m.end()..].trim().to_string(),
        }),
        None => {
            debug!("no answer-sheet phrase; treating whole prompt as notes");
            Extraction::Fallback(PromptSections {
                instruction: String::new(),
                notes: text,
            })
        }
    }
}

/// Tokenize text on runs of three or more underscores.
pub fn tokenize_blanks(text: &str) -> Extraction<Vec<Token>> {
    let (tokens, blank_count) = scan(text, &BLANK_RUN);
    Extraction::matched_if(blank_count > 0, tokens)
}

/// Tokenize a word-list body on `___` / `___[n]` markers.
pub fn tokenize_blank_slots(body: &str) -> Extraction<BlankSlots> {
    let (tokens, blank_count) = scan(body, &BLANK_SLOT);
    Extraction::matched_if(
        blank_count > 0,
        BlankSlots {
            tokens,
            blank_count,
        },
    )
}

/// Number of `Blank` tokens in a token stream.
pub fn count_blanks(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_blank()).count()
}

fn scan(text: &str, marker: &Regex) -> (Vec<Token>, usize) {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    let mut blanks = 0;

    for m in marker.find_iter(text) {
        if m.start() > cursor {
            tokens.push(Token::text(&text[cursor..m.start()]));
        }
        tokens.push(Token::Blank { index: blanks });
        blanks += 1;
        cursor = m.end();
    }

    if cursor < text.len() {
        tokens.push(Token::text(&text[cursor..]));
    }

    (tokens, blanks)
}

/// Extract the canonical step order from a flow-chart prompt.
///
/// Takes the clause after the last "read" keyword (through its colon, if any),
/// else the text after the last colon, else the whole text; drops one
/// trailing period and splits on `->`.
pub fn extract_ordered_steps(raw: &str) -> Extraction<Vec<String>> {
    let text = normalize(raw);

    let (tail, anchored) = if let Some(m) = READ_KEYWORD.find_iter(&text).last() {
        (&text[m.end()..], true)
    } else if let Some(pos) = text.rfind(':') {
        (&text[pos + 1..], true)
    } else {
        (text.as_str(), false)
    };

    let tail = tail.trim();
    let tail = tail.strip_suffix('.').unwrap_or(tail);

    let steps: Vec<String> = tail
        .split("->")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if !anchored {
        debug!(steps = steps.len(), "no step-list anchor; split whole prompt");
    }
    Extraction::matched_if(anchored && !steps.is_empty(), steps)
}

/// Parse one line of a lettered list, e.g. `B) Banana`.
pub fn parse_lettered_option(line: &str) -> Option<LetteredOption> {
    let caps = LETTERED_OPTION.captures(line.trim())?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    let label = caps.get(2)?.as_str().trim();
    if label.is_empty() {
        return None;
    }
    Some(LetteredOption {
        letter,
        label: label.to_string(),
    })
}

/// Split a prompt at a `Word List:` heading into the stem and its lettered options.
///
/// Options come back sorted by letter regardless of authored order; lines
/// under the heading that are not lettered options are skipped.
pub fn split_word_list_block(raw: &str) -> Extraction<WordListBlock> {
    let text = normalize(raw);
    let Some(m) = WORD_LIST_HEADING.find(&text) else {
        return Extraction::Fallback(WordListBlock {
            stem: text,
            options: Vec::new(),
        });
    };

    let mut options: Vec<LetteredOption> = text[m.end()..]
        .lines()
        .filter_map(parse_lettered_option)
        .collect();
    options.sort_by_key(|o| o.letter);

    Extraction::Matched(WordListBlock {
        stem: text[..m.start()].trim_end().to_string(),
        options,
    })
}

/// Return the text after a "fill in the blank(s) ...:" marker line.
pub fn extract_body_after_marker(stem: &str) -> Extraction<String> {
    match FILL_MARKER.find(stem) {
        Some(m) => Extraction::Matched(stem[m.end()..].to_string()),
        None => Extraction::Fallback(stem.to_string()),
    }
}

/// Whether a prompt has a `Word List:` heading.
pub fn has_word_list_heading(raw: &str) -> bool {
    WORD_LIST_HEADING.is_match(&normalize(raw))
}

/// Whether a prompt contains any blank marker.
pub fn has_blank_marker(raw: &str) -> bool {
    BLANK_RUN.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_replaces_escaped_newlines() {
        let raw = r"line one\nline two";
        assert_eq!(normalize(raw), "line one\nline two");
        assert_eq!(normalize(&normalize(raw)), normalize(raw));
    }

    #[test]
    fn split_at_answer_sheet() {
        let raw = "Write NO MORE THAN TWO WORDS on your answer sheet. Notes: 1 ___ 2 ___";
        let split = split_instruction_from_notes(raw);
        assert!(split.is_matched());
        let sections = split.into_inner();
        assert_eq!(
            sections.instruction,
            "Write NO MORE THAN TWO WORDS on your answer sheet."
        );
        assert_eq!(sections.notes, "Notes: 1 ___ 2 ___");

        let tokens = tokenize_blanks(&sections.notes).into_inner();
        assert_eq!(count_blanks(&tokens), 2);
    }

    #[test]
    fn split_is_case_insensitive_and_handles_escapes() {
        let split = split_instruction_from_notes(r"Use your ANSWER SHEET\nThe ___ rose.");
        assert!(split.is_matched());
        assert_eq!(split.value().instruction, "Use your ANSWER SHEET");
        assert_eq!(split.value().notes, "The ___ rose.");
    }

    #[test]
    fn split_without_phrase_falls_back_to_notes() {
        let split = split_instruction_from_notes(r"Just notes\nhere");
        assert!(!split.is_matched());
        assert_eq!(split.value().instruction, "");
        assert_eq!(split.value().notes, "Just notes\nhere");
    }

    #[test]
    fn blanks_are_contiguous_from_zero() {
        let tokens = tokenize_blanks("a ___ b _____ c ___[3] d").into_inner();
        let indices: Vec<usize> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Blank { index } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(tokens.last(), Some(&Token::text(" d")));
        assert_eq!(tokens.first(), Some(&Token::text("a ")));
    }

    #[test]
    fn blanks_ignore_short_underscore_runs() {
        let result = tokenize_blanks("snake__case only");
        assert!(!result.is_matched());
        assert_eq!(result.into_inner(), vec![Token::text("snake__case only")]);
        assert!(tokenize_blanks("").into_inner().is_empty());
    }

    #[test]
    fn steps_after_read_keyword() {
        let steps = extract_ordered_steps("Read: A -> B -> C.");
        assert!(steps.is_matched());
        assert_eq!(steps.into_inner(), vec!["A", "B", "C"]);
    }

    #[test]
    fn steps_use_last_keyword_and_its_clause() {
        let raw = r"Read the passage.\nThen read the flow chart below: Mix flour -> Knead ->  -> Bake.";
        assert_eq!(
            extract_ordered_steps(raw).into_inner(),
            vec!["Mix flour", "Knead", "Bake"]
        );
    }

    #[test]
    fn steps_fall_back_to_last_colon_then_whole_text() {
        assert_eq!(
            extract_ordered_steps("Order the process: Cut -> Dry").into_inner(),
            vec!["Cut", "Dry"]
        );
        let whole = extract_ordered_steps("Cut -> Dry -> Pack");
        assert!(!whole.is_matched());
        assert_eq!(whole.into_inner(), vec!["Cut", "Dry", "Pack"]);
    }

    #[test]
    fn keyword_does_not_match_inside_words() {
        assert_eq!(
            extract_ordered_steps("Making bread: Knead -> Proof").into_inner(),
            vec!["Knead", "Proof"]
        );
    }

    #[test]
    fn word_list_options_are_sorted() {
        let raw = "Complete the summary.\n\nThe ___ fell.\n\n**Word List:**\nB. Banana\nA. Apple\nnot an option";
        let block = split_word_list_block(raw);
        assert!(block.is_matched());
        let block = block.into_inner();
        assert_eq!(block.stem, "Complete the summary.\n\nThe ___ fell.");
        assert_eq!(
            block.options,
            vec![
                LetteredOption {
                    letter: 'A',
                    label: "Apple".into()
                },
                LetteredOption {
                    letter: 'B',
                    label: "Banana".into()
                },
            ]
        );
    }

    #[test]
    fn word_list_heading_accepts_crlf_line_endings() {
        let raw = "Fill in the blanks using the list below:\r\n\r\nBees visit ___ often.\r\n\r\n**Word List:**\r\nB. Banana\r\nA. Apple\r\n";
        assert!(has_word_list_heading(raw));

        let block = split_word_list_block(raw);
        assert!(block.is_matched());
        let block = block.into_inner();
        let labels: Vec<&str> = block.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Apple", "Banana"]);

        let body = extract_body_after_marker(&block.stem);
        assert!(body.is_matched());
        assert_eq!(body.into_inner(), "Bees visit ___ often.");
    }

    #[test]
    fn word_list_without_heading_falls_back() {
        let block = split_word_list_block("A. Apple\nB. Banana");
        assert!(!block.is_matched());
        assert_eq!(block.value().stem, "A. Apple\nB. Banana");
        assert!(block.value().options.is_empty());
    }

    #[test]
    fn lettered_option_delimiters() {
        for line in ["C. Cherry", "C) Cherry", "C- Cherry", "  C: Cherry  "] {
            let opt = parse_lettered_option(line).unwrap();
            assert_eq!(opt.letter, 'C');
            assert_eq!(opt.label, "Cherry");
        }
        assert!(parse_lettered_option("c. cherry").is_none());
        assert!(parse_lettered_option("C.Cherry").is_none());
        assert!(parse_lettered_option("CD. Cherry").is_none());
    }

    #[test]
    fn body_after_fill_marker() {
        let stem = "Complete the summary below.\nFill in the blanks with a letter A-F:\n\nThe ___ ate the ___.";
        let body = extract_body_after_marker(stem);
        assert!(body.is_matched());
        assert_eq!(body.into_inner(), "The ___ ate the ___.");

        let missing = extract_body_after_marker("The ___ ate.");
        assert!(!missing.is_matched());
        assert_eq!(missing.into_inner(), "The ___ ate.");
    }

    #[test]
    fn blank_slots_count_and_numbering() {
        let slots = tokenize_blank_slots("The ___[1] ate the ___[2] today").into_inner();
        assert_eq!(slots.blank_count, 2);
        assert_eq!(
            slots.tokens,
            vec![
                Token::text("The "),
                Token::Blank { index: 0 },
                Token::text(" ate the "),
                Token::Blank { index: 1 },
                Token::text(" today"),
            ]
        );
    }

    #[test]
    fn detection_helpers() {
        assert!(has_word_list_heading(r"Stem ___\n## Word List:\nA. x"));
        assert!(!has_word_list_heading("The word list: is inline"));
        assert!(has_blank_marker("a ___ b"));
        assert!(!has_blank_marker("a __ b"));
    }
}
