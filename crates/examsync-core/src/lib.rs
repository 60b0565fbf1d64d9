//! examsync-core — prompt tokenizer, answer codec, and question widgets.
//!
//! This crate defines the data model shared by the whole examsync system,
//! the text-extraction functions that turn authored prompt text into
//! renderable tokens, and the widgets that keep a locally edited answer in
//! sync with the single wire-format string stored per question.

pub mod codec;
pub mod error;
pub mod mapper;
pub mod model;
pub mod tokenizer;
pub mod traits;
pub mod widgets;
