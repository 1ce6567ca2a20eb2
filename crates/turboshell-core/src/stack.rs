//! Bounded, deduplicated history of windows that have held focus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::window::{WindowHandle, WindowSnapshot};

/// Default number of windows remembered.
pub const DEFAULT_CAPACITY: usize = 10;

/// Most-recent-first history of eligible foreground windows.
///
/// Index 0 is the top (most recently focused). A handle appears at
/// most once; pushing a known handle moves it to the top.
#[derive(Debug, Clone)]
pub struct ForegroundWindowStack {
    entries: VecDeque<WindowSnapshot>,
    capacity: usize,
}

impl Default for ForegroundWindowStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ForegroundWindowStack {
    /// Creates an empty stack. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Puts a snapshot on top, replacing any older entry for the same
    /// handle wherever it sits. Evicts from the bottom when full.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn push(&mut self, snapshot: WindowSnapshot) -> bool {
        let replaced = match self.position(snapshot.handle()) {
            Some(index) => self.remove(index).is_some(),
            None => false,
        };
        self.entries.push_front(snapshot);
        self.entries.truncate(self.capacity);
        replaced
    }

    /// The most recently pushed entry.
    pub fn peek(&self) -> Option<&WindowSnapshot> {
        self.entries.front()
    }

    pub fn peek_mut(&mut self) -> Option<&mut WindowSnapshot> {
        self.entries.front_mut()
    }

    /// Entry at `index`, counting from the top.
    pub fn get(&self, index: usize) -> Option<&WindowSnapshot> {
        self.entries.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<WindowSnapshot> {
        self.entries.remove(index)
    }

    /// Index of the entry for `handle`, counting from the top.
    pub fn position(&self, handle: WindowHandle) -> Option<usize> {
        self.entries.iter().position(|s| s.handle() == handle)
    }

    /// Iterates from most to least recent.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WindowSnapshot> {
        self.entries.iter()
    }
}

/// The stack as shared between the hook thread (sole writer) and the
/// command side (reader).
#[derive(Debug, Clone, Default)]
pub struct SharedStack {
    inner: Arc<Mutex<ForegroundWindowStack>>,
}

impl SharedStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ForegroundWindowStack::new(capacity))),
        }
    }

    /// Locks the stack for mutation.
    ///
    /// A poisoned lock is recovered: every stack operation leaves the
    /// entries consistent, so a panicking holder cannot corrupt them.
    pub fn lock(&self) -> MutexGuard<'_, ForegroundWindowStack> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A read-only handle for command executors and views.
    pub fn view(&self) -> StackView {
        StackView {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only access to the foreground history.
#[derive(Debug, Clone)]
pub struct StackView {
    inner: Arc<Mutex<ForegroundWindowStack>>,
}

impl StackView {
    fn lock(&self) -> MutexGuard<'_, ForegroundWindowStack> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the top entry.
    pub fn peek(&self) -> Option<WindowSnapshot> {
        self.lock().peek().cloned()
    }

    /// A copy of every entry, most recent first.
    pub fn snapshots(&self) -> Vec<WindowSnapshot> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn snap(h: usize) -> WindowSnapshot {
        WindowSnapshot::new(WindowHandle(h), 0, 0)
    }

    fn handles(stack: &ForegroundWindowStack) -> Vec<usize> {
        stack.iter().map(|s| s.handle().0).collect()
    }

    #[test]
    fn empty_stack_peeks_nothing() {
        let stack = ForegroundWindowStack::default();
        assert!(stack.peek().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn newest_push_is_on_top() {
        let mut stack = ForegroundWindowStack::default();
        stack.push(snap(1));
        stack.push(snap(2));
        stack.push(snap(3));

        assert_eq!(handles(&stack), vec![3, 2, 1]);
    }

    #[test]
    fn repushing_buried_handle_moves_it_to_top() {
        let mut stack = ForegroundWindowStack::default();
        for h in [1, 2, 3, 4] {
            stack.push(snap(h));
        }
        let before = stack.len();

        let replaced = stack.push(snap(2));

        assert!(replaced);
        assert_eq!(stack.len(), before);
        assert_eq!(handles(&stack), vec![2, 4, 3, 1]);
    }

    #[test]
    fn repushing_top_handle_keeps_length() {
        let mut stack = ForegroundWindowStack::default();
        stack.push(snap(1));
        stack.push(snap(1));
        assert_eq!(handles(&stack), vec![1]);
    }

    #[test]
    fn overflow_evicts_from_bottom() {
        let mut stack = ForegroundWindowStack::new(3);
        for h in 1..=5 {
            stack.push(snap(h));
        }
        assert_eq!(handles(&stack), vec![5, 4, 3]);
    }

    #[test]
    fn repeated_pushes_stay_bounded_and_unique() {
        let mut stack = ForegroundWindowStack::default();
        let sequence = [1, 2, 3, 1, 4, 5, 6, 7, 8, 2, 9, 10, 11, 12, 3, 3, 13, 1];

        for h in sequence {
            stack.push(snap(h));
            let seen: HashSet<_> = stack.iter().map(|s| s.handle()).collect();
            assert!(stack.len() <= stack.capacity());
            assert_eq!(seen.len(), stack.len());
            assert_eq!(stack.peek().map(|s| s.handle().0), Some(h));
        }
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut stack = ForegroundWindowStack::new(0);
        stack.push(snap(1));
        stack.push(snap(2));
        assert_eq!(handles(&stack), vec![2]);
    }

    #[test]
    fn view_sees_writes_through_shared_stack() {
        let shared = SharedStack::new(4);
        let view = shared.view();
        assert!(view.peek().is_none());

        shared.lock().push(snap(9));

        assert_eq!(view.peek().map(|s| s.handle()), Some(WindowHandle(9)));
        assert_eq!(view.len(), 1);
    }
}
