//! Condition gate
//!
//! A three-field state machine deciding whether the next gated call runs.
//! A one-shot condition is spent by the first gated call after it; a
//! sticky one holds until `cancel_condition`. Non-gated calls (navigation,
//! creation, registry, node set) neither read nor consume the gate.
//!
//! The transition functions are pure so they can be tested without a
//! document.

use dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::builder::Builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    /// Whether the next gated call runs
    pub value: bool,
    /// Most recent condition result, read by `else_if` and `otherwise`
    pub last_value: bool,
    /// Keep `value` after a gated call instead of resetting to open
    pub repeat: bool,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            value: true,
            last_value: true,
            repeat: false,
        }
    }
}

impl GateState {
    /// Decision for one gated call and the state after it
    pub fn check(self) -> (bool, GateState) {
        let next = if self.repeat {
            self
        } else {
            GateState {
                value: true,
                ..self
            }
        };
        (self.value, next)
    }

    pub fn condition(self, verdict: bool, repeat: bool) -> Self {
        GateState {
            value: verdict,
            last_value: verdict,
            repeat,
        }
    }

    /// `verdict` is only evaluated when the previous condition was false
    pub fn else_if(self, verdict: impl FnOnce() -> bool, repeat: bool) -> Self {
        if self.last_value {
            GateState {
                value: false,
                repeat,
                ..self
            }
        } else {
            self.condition(verdict(), repeat)
        }
    }

    /// Close the gate when the last condition held; otherwise `value` is
    /// left as it is, so a decision no gated call has consumed yet stands
    pub fn otherwise(self, repeat: bool) -> Self {
        GateState {
            value: if self.last_value { false } else { self.value },
            repeat,
            ..self
        }
    }

    pub fn cancel(self) -> Self {
        GateState {
            value: true,
            repeat: false,
            ..self
        }
    }
}

/// Something that decides a condition: a plain `bool` or a closure over
/// the document and the current node
pub trait Predicate {
    fn evaluate(self, doc: &Document, current: Option<NodeId>) -> bool;
}

impl Predicate for bool {
    fn evaluate(self, _doc: &Document, _current: Option<NodeId>) -> bool {
        self
    }
}

impl<F> Predicate for F
where
    F: FnOnce(&Document, Option<NodeId>) -> bool,
{
    fn evaluate(self, doc: &Document, current: Option<NodeId>) -> bool {
        self(doc, current)
    }
}

impl Builder<'_> {
    /// Consume one gate decision for a gated call
    pub(crate) fn pass_gate(&mut self, op: &str) -> bool {
        let (run, next) = self.gate.check();
        self.gate = next;
        if !run {
            tracing::debug!("Builder {}: {} skipped by condition", self.id, op);
        }
        run
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    /// Gate the next gated call on `predicate`
    pub fn condition(&mut self, predicate: impl Predicate) -> &mut Self {
        let verdict = predicate.evaluate(&*self.doc, self.current);
        self.gate = self.gate.condition(verdict, false);
        self
    }

    /// Gate every following gated call on `predicate` until cancelled
    pub fn condition_sticky(&mut self, predicate: impl Predicate) -> &mut Self {
        let verdict = predicate.evaluate(&*self.doc, self.current);
        self.gate = self.gate.condition(verdict, true);
        self
    }

    pub fn else_if(&mut self, predicate: impl Predicate) -> &mut Self {
        self.apply_else_if(predicate, false)
    }

    pub fn else_if_sticky(&mut self, predicate: impl Predicate) -> &mut Self {
        self.apply_else_if(predicate, true)
    }

    fn apply_else_if(&mut self, predicate: impl Predicate, repeat: bool) -> &mut Self {
        let doc: &Document = &*self.doc;
        let current = self.current;
        self.gate = self
            .gate
            .else_if(|| predicate.evaluate(doc, current), repeat);
        self
    }

    /// Skip the next gated call when the last condition held
    pub fn otherwise(&mut self) -> &mut Self {
        self.gate = self.gate.otherwise(false);
        self
    }

    pub fn otherwise_sticky(&mut self) -> &mut Self {
        self.gate = self.gate.otherwise(true);
        self
    }

    /// Reopen the gate and drop stickiness
    pub fn cancel_condition(&mut self) -> &mut Self {
        self.gate = self.gate.cancel();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_one_shot_resets_after_check() {
        let gate = GateState::default().condition(false, false);
        let (run, gate) = gate.check();
        assert!(!run);
        let (run, _) = gate.check();
        assert!(run);
    }

    #[test]
    fn test_sticky_holds_until_cancel() {
        let mut gate = GateState::default().condition(false, true);
        for _ in 0..3 {
            let (run, next) = gate.check();
            assert!(!run);
            gate = next;
        }
        let (run, _) = gate.cancel().check();
        assert!(run);
    }

    #[test]
    fn test_else_if_is_lazy_after_true() {
        let evaluated = Cell::new(false);
        let gate = GateState::default().condition(true, false).else_if(
            || {
                evaluated.set(true);
                true
            },
            false,
        );
        assert!(!evaluated.get());
        assert!(!gate.value);
        assert!(gate.last_value);
    }

    #[test]
    fn test_else_chain() {
        let gate = GateState::default().condition(false, false);
        let (run, gate) = gate.check();
        assert!(!run);
        let gate = gate.else_if(|| false, false);
        assert!(!gate.value);
        let (_, gate) = gate.check();
        let gate = gate.otherwise(false);
        assert!(gate.value);

        let gate = GateState::default().condition(true, false).otherwise(false);
        assert!(!gate.value);
    }

    #[test]
    fn test_otherwise_keeps_unconsumed_false() {
        let gate = GateState::default().condition(false, false).otherwise(false);
        assert!(!gate.value);
        assert!(!gate.last_value);
    }

    #[test]
    fn test_otherwise_after_sticky_false_stays_closed() {
        let mut gate = GateState::default().condition(false, true);
        for _ in 0..2 {
            let (_, next) = gate.check();
            gate = next;
        }
        let (run, _) = gate.otherwise(false).check();
        assert!(!run);
    }

    #[test]
    fn test_else_without_condition_skips() {
        let gate = GateState::default().else_if(|| panic!("must not be evaluated"), false);
        assert!(!gate.value);

        let (run, _) = GateState::default().otherwise(false).check();
        assert!(!run);
    }

    #[test]
    fn test_cancel_keeps_last_value() {
        let gate = GateState::default().condition(false, true).cancel();
        assert!(gate.value);
        assert!(!gate.repeat);
        assert!(!gate.last_value);
    }
}
