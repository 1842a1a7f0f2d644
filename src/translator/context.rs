//! Scoped state of one translation
//!
//! An immutable value threaded through the recursive walk. `bind` and
//! `enter` return derived contexts that share their parent's frames, so a
//! binding made for one quantifier iteration is invisible to its siblings
//! and disappears when the derived context is dropped.

use std::sync::Arc;

use serde_json::Value;

use crate::expression::ParameterId;

#[derive(Debug)]
struct Frame<T> {
    item: T,
    parent: Option<Arc<Frame<T>>>,
}

/// Iterates frames from innermost to outermost
fn frames<T>(head: &Option<Arc<Frame<T>>>) -> impl Iterator<Item = &T> {
    let mut current = head.as_deref();
    std::iter::from_fn(move || {
        let frame = current?;
        current = frame.parent.as_deref();
        Some(&frame.item)
    })
}

/// Parameter bindings and field prefixes active at a point of the walk
#[derive(Debug, Clone, Default)]
pub struct TranslationContext {
    bindings: Option<Arc<Frame<(ParameterId, Value)>>>,
    prefixes: Option<Arc<Frame<String>>>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a context with `parameter` bound to `value`
    pub fn bind(&self, parameter: ParameterId, value: Value) -> Self {
        Self {
            bindings: Some(Arc::new(Frame {
                item: (parameter, value),
                parent: self.bindings.clone(),
            })),
            prefixes: self.prefixes.clone(),
        }
    }

    /// Returns a context whose field references are nested under `path`
    pub fn enter(&self, path: impl Into<String>) -> Self {
        Self {
            bindings: self.bindings.clone(),
            prefixes: Some(Arc::new(Frame {
                item: path.into(),
                parent: self.prefixes.clone(),
            })),
        }
    }

    /// Looks up the innermost binding of a parameter
    pub fn lookup(&self, parameter: ParameterId) -> Option<&Value> {
        frames(&self.bindings)
            .find(|(id, _)| *id == parameter)
            .map(|(_, value)| value)
    }

    pub fn is_bound(&self, parameter: ParameterId) -> bool {
        self.lookup(parameter).is_some()
    }

    /// Prefixes from outermost to innermost
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = frames(&self.prefixes).map(String::as_str).collect();
        prefixes.reverse();
        prefixes
    }

    /// Prepends the active prefixes to a dotted member path
    pub fn prefixed(&self, path: &str) -> String {
        let mut parts = self.prefixes();
        if !path.is_empty() {
            parts.push(path);
        }
        parts.join(".")
    }
}
