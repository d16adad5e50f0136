use std::cell::Cell;
use std::rc::Rc;

/// Shared "still mounted" flag for async work started by a view.
///
/// The view keeps one clone and kills it on unmount or when its inputs change;
/// tasks keep another and drop their result if the flag is dead by the time it
/// arrives.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }

    /// Runs `apply` only if the owner is still alive. Returns whether it ran.
    pub fn apply<T>(&self, value: T, apply: impl FnOnce(T)) -> bool {
        if !self.is_alive() {
            tracing::debug!("discarding result for a dead view");
            return false;
        }
        apply(value);
        true
    }
}
