use crate::data_structures::cursor::Cursor;

/// Applies a projection to every element of a base cursor.
pub struct MappedCursor<C, F> {
    base: C,
    projection: F,
}

impl<C, F> MappedCursor<C, F> {
    pub fn new(base: C, projection: F) -> Self {
        Self { base, projection }
    }
}

impl<C, F, U> Iterator for MappedCursor<C, F>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        self.base.next().map(&mut self.projection)
    }
}

impl<C, F, U> Cursor for MappedCursor<C, F>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
{
    fn has_next(&self) -> bool {
        self.base.has_next()
    }

    fn rewind(&mut self) {
        self.base.rewind();
    }
}
