//! Ordered flow-chart steps.
//!
//! The user assigns a canonical step number to each slot of the chart. The
//! wire value is the list of step labels read slot by slot, with unassigned
//! slots left out.

use tracing::debug;

use crate::codec::{
    decode_list, encode_list, project_slots_to_labels, reconcile_ordered_slots, SlotAssignment,
};
use crate::tokenizer::extract_ordered_steps;

use super::sync::{AnswerState, ChangeCallback, SyncPhase, Synchronizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots(pub SlotAssignment);

impl AnswerState for Slots {
    /// Canonical step labels.
    type Context = Vec<String>;
    type Canonical = Vec<String>;

    fn decode(value: &str, steps: &Vec<String>) -> Self {
        let labels: Vec<String> = decode_list(value);
        let mut slots = reconcile_ordered_slots(&labels, steps);
        if slots.len() < steps.len() {
            slots.resize(steps.len(), None);
        }
        Slots(slots)
    }

    fn encode(&self, steps: &Vec<String>) -> String {
        encode_list(&project_slots_to_labels(&self.0, steps))
    }

    fn canonical(&self, steps: &Vec<String>) -> Vec<String> {
        project_slots_to_labels(&self.0, steps)
    }
}

/// Parse what the user typed into a slot as a 1-based step number.
pub fn parse_position(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[derive(Debug)]
pub struct FlowChart {
    id: String,
    steps_from_prompt: bool,
    sync: Synchronizer<Slots>,
}

impl FlowChart {
    /// Build from authored nodes, or from the prompt's step list when there are none.
    pub fn new(
        id: impl Into<String>,
        prompt: &str,
        nodes: &[String],
        value: &str,
        on_change: ChangeCallback,
    ) -> Self {
        let id = id.into();
        let (steps, steps_from_prompt) = if nodes.is_empty() {
            let extraction = extract_ordered_steps(prompt);
            if !extraction.is_matched() {
                debug!(question = %id, "flow chart prompt has no step list anchor");
            }
            (extraction.into_inner(), true)
        } else {
            (nodes.to_vec(), false)
        };

        Self {
            id,
            steps_from_prompt,
            sync: Synchronizer::mounted(steps, value, on_change),
        }
    }

    /// Set the step number for a slot; `None` clears it.
    pub fn assign(&mut self, slot: usize, position: Option<usize>) -> bool {
        if slot >= self.sync.state().0.len() {
            return false;
        }
        self.sync.edit(|slots, _| slots.0[slot] = position)
    }

    /// Set a slot from raw user input; unparseable input clears the slot.
    pub fn assign_input(&mut self, slot: usize, input: &str) -> bool {
        self.assign(slot, parse_position(input))
    }

    pub fn receive(&mut self, value: &str) -> bool {
        self.sync.receive(value)
    }

    pub fn steps(&self) -> &[String] {
        self.sync.context()
    }

    /// Whether the steps came from the prompt text rather than authored nodes.
    pub fn steps_from_prompt(&self) -> bool {
        self.steps_from_prompt
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.sync.state().0
    }

    /// Labels in slot order, as they would be saved.
    pub fn ordered_labels(&self) -> Vec<String> {
        project_slots_to_labels(&self.sync.state().0, self.sync.context())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> String {
        self.sync.value()
    }

    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }
}
