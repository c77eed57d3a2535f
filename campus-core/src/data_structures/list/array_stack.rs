use crate::error::{CollectionError, Result};

pub const DEFAULT_STACK_CAPACITY: usize = 1000;

/// Bounded LIFO stack backed by a contiguous buffer.
///
/// The capacity is fixed at construction; pushing beyond it fails with
/// [`CollectionError::FullStructure`] instead of growing.
///
#[derive(Debug, Clone)]
pub struct ArrayStack<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T> ArrayStack<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, element: T) -> Result<()> {
        if self.is_full() {
            return Err(CollectionError::FullStructure {
                capacity: self.capacity,
            });
        }
        self.elements.push(element);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        self.elements.pop().ok_or(CollectionError::EmptyStructure)
    }

    pub fn top(&self) -> Result<&T> {
        self.elements.last().ok_or(CollectionError::EmptyStructure)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.elements.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl<T> Default for ArrayStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut stack = ArrayStack::with_capacity(3);
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(stack.top(), Ok(&2));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.pop(), Err(CollectionError::EmptyStructure));
        assert_eq!(stack.top(), Err(CollectionError::EmptyStructure));
    }

    #[test]
    fn test_push_beyond_capacity_fails() {
        let mut stack = ArrayStack::with_capacity(2);
        stack.push('a').unwrap();
        stack.push('b').unwrap();
        assert!(stack.is_full());
        assert_eq!(
            stack.push('c'),
            Err(CollectionError::FullStructure { capacity: 2 })
        );
        assert_eq!(stack.len(), 2);
    }
}
