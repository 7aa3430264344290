use crate::value::Value;
use std::collections::HashMap;

/// The chain of lexical scopes, innermost last.
///
/// Frames are pushed and popped in lockstep with block evaluation, so the
/// chain unwinds with the evaluator's call stack and bindings never escape
/// the block that declared them. The root frame is created once per run
/// and is never popped.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<HashMap<String, Value>>,
}

impl ScopeChain {
    /// Create a chain holding only the root scope.
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Enter a new innermost scope.
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Leave the innermost scope, discarding its bindings.
    pub fn pop(&mut self) {
        // the root frame stays
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolve `name` through the chain, innermost first.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// Bind `name` in the innermost scope, shadowing any binding of the
    /// same name in enclosing scopes.
    pub fn declare(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        }
    }

    /// Rebind the nearest existing binding of `name`. Returns `false` when
    /// `name` is unbound in the whole chain.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}
