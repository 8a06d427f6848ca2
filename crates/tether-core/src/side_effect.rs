use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

type Action<T> = Rc<dyn Fn(&T)>;

/// An action bound to a produced value, run when that value is consumed.
///
/// Side effects are immutable: `fixed` and `composite` always build a new
/// effect and never touch the ones they were built from. Cloning is cheap and
/// shares the underlying closures.
pub struct SideEffect<T: 'static> {
    actions: SmallVec<[Action<T>; 2]>,
}

impl<T: 'static> SideEffect<T> {
    pub fn new(f: impl Fn(&T) + 'static) -> Self {
        let mut actions: SmallVec<[Action<T>; 2]> = SmallVec::new();
        actions.push(Rc::new(f));
        Self { actions }
    }

    /// Binds `effect` to `value`. The returned effect ignores whatever it is
    /// executed with and always runs `effect` against `value`.
    pub fn fixed<U: 'static>(value: U, effect: SideEffect<U>) -> Self {
        Self::new(move |_: &T| effect.execute(&value))
    }

    /// Sequential composition: `first` runs before `second`.
    ///
    /// Nested composites are flattened, so composing `(a, b)` with `c` gives
    /// the same shape as composing `a` with `(b, c)`.
    pub fn composite(first: SideEffect<T>, second: SideEffect<T>) -> Self {
        let mut actions = first.actions;
        actions.extend(second.actions);
        Self { actions }
    }

    pub fn execute(&self, value: &T) {
        for action in &self.actions {
            action(value);
        }
    }

    /// Number of primitive actions this effect runs.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<T: 'static> Clone for SideEffect<T> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for SideEffect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffect")
            .field("actions", &self.actions.len())
            .finish()
    }
}
