//! In-order delivery to a sink that may be re-entered.
//!
//! A hook callback can fire while the previous event is still being
//! handled on the same thread, for example when the handler pumps a
//! nested modal loop. [`OrderedDelivery`] queues such events and the
//! outermost call delivers them once the current one returns.

use std::cell::RefCell;
use std::collections::VecDeque;

type Sink<T> = Box<dyn FnMut(T)>;

/// Single-threaded FIFO between a callback and its sink.
pub struct OrderedDelivery<T> {
    sink: RefCell<Option<Sink<T>>>,
    pending: RefCell<VecDeque<T>>,
}

impl<T> OrderedDelivery<T> {
    pub const fn new() -> Self {
        Self {
            sink: RefCell::new(None),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn attach(&self, sink: Sink<T>) {
        *self.sink.borrow_mut() = Some(sink);
    }

    /// Drops the sink and anything still queued.
    pub fn detach(&self) {
        self.sink.borrow_mut().take();
        self.pending.borrow_mut().clear();
    }

    /// Hands `item` to the sink after everything queued before it.
    ///
    /// Returns `false` if the item was only queued because the sink is
    /// already running further up the stack, or dropped because no sink
    /// is attached.
    pub fn deliver(&self, item: T) -> bool {
        self.pending.borrow_mut().push_back(item);
        let Ok(mut slot) = self.sink.try_borrow_mut() else {
            return false;
        };
        let Some(sink) = slot.as_mut() else {
            self.pending.borrow_mut().clear();
            return false;
        };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                return true;
            };
            sink(next);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl<T> Default for OrderedDelivery<T> {
    fn default() -> Self {
        Self::new()
    }
}
