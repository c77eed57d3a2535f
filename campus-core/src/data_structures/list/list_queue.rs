use crate::data_structures::list::TwoWayList;
use crate::error::Result;

/// FIFO queue over a [`TwoWayList`].
///
#[derive(Debug, Clone, Default)]
pub struct ListQueue<T> {
    list: TwoWayList<T>,
}

impl<T> ListQueue<T> {
    pub fn new() -> Self {
        Self {
            list: TwoWayList::new(),
        }
    }

    pub fn enqueue(&mut self, element: T) {
        self.list.add_last(element);
    }

    /// Fails with `EmptyStructure` when the queue is empty.
    pub fn dequeue(&mut self) -> Result<T> {
        self.list.remove_first()
    }

    pub fn peek(&self) -> Result<&T> {
        self.list.get_first()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectionError;

    #[test]
    fn test_fifo_order() {
        let mut queue = ListQueue::new();
        queue.enqueue("first");
        queue.enqueue("second");
        assert_eq!(queue.peek(), Ok(&"first"));
        assert_eq!(queue.dequeue(), Ok("first"));
        assert_eq!(queue.dequeue(), Ok("second"));
        assert_eq!(queue.dequeue(), Err(CollectionError::EmptyStructure));
        assert!(queue.is_empty());
    }
}
