/// Ordered application of out-of-order completions
///
/// Naming requests for one batch run concurrently, but their results must
/// become visible in the order the requests were started, not the order the
/// network happens to finish them in. `OrderedResults` holds the initiation
/// order as a queue and buffers arrivals; the front of the queue is drained
/// as soon as its result is in, carrying any buffered successors with it.
/// A fast-completing late item therefore waits, already settled, until
/// everything ahead of it has been applied.

use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
pub struct OrderedResults<T> {
    order: VecDeque<String>,
    arrived: HashMap<String, T>,
}

impl<T> OrderedResults<T> {
    /// Start tracking a batch; `ids` must be in initiation order
    pub fn start(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            order: ids.into_iter().collect(),
            arrived: HashMap::new(),
        }
    }

    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            arrived: HashMap::new(),
        }
    }

    /// True once every tracked result has been handed out
    pub fn is_drained(&self) -> bool {
        self.order.is_empty()
    }

    /// Record one arrival and return every result that is now ready to be
    /// applied, in initiation order. An id that is not being tracked
    /// (batch cleared, duplicate delivery) is dropped.
    pub fn arrive(&mut self, id: String, value: T) -> Vec<(String, T)> {
        if !self.order.contains(&id) {
            log::debug!("dropping result for untracked item {}", id);
            return Vec::new();
        }
        self.arrived.insert(id, value);

        let mut ready = Vec::new();
        while let Some(front) = self.order.front() {
            match self.arrived.remove(front) {
                Some(value) => {
                    let id = self.order.pop_front().expect("front exists");
                    ready.push((id, value));
                }
                None => break,
            }
        }
        ready
    }

    /// Forget the batch entirely (clear-all while results are in flight)
    pub fn reset(&mut self) {
        self.order.clear();
        self.arrived.clear();
    }
}
