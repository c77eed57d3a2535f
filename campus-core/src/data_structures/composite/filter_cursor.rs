use std::cell::RefCell;

use crate::data_structures::cursor::Cursor;

/// Yields only the elements of a base cursor that satisfy a predicate.
///
/// Matches are looked up one at a time and only on demand: building the
/// cursor evaluates nothing, and the predicate runs when [`Cursor::has_next`]
/// or [`Iterator::next`] needs the next match. A match found by `has_next`
/// is held until `next` returns it.
///
pub struct FilterCursor<C: Cursor, P> {
    state: RefCell<Lookahead<C, P>>,
}

struct Lookahead<C: Cursor, P> {
    base: C,
    predicate: P,
    pending: Option<C::Item>,
    primed: bool,
}

impl<C, P> Lookahead<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    fn prime(&mut self) {
        if self.primed {
            return;
        }
        self.primed = true;
        for item in self.base.by_ref() {
            if (self.predicate)(&item) {
                self.pending = Some(item);
                return;
            }
        }
    }
}

impl<C, P> FilterCursor<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    pub fn new(base: C, predicate: P) -> Self {
        Self {
            state: RefCell::new(Lookahead {
                base,
                predicate,
                pending: None,
                primed: false,
            }),
        }
    }
}

impl<C, P> Iterator for FilterCursor<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn next(&mut self) -> Option<C::Item> {
        let state = self.state.get_mut();
        state.prime();
        state.primed = false;
        state.pending.take()
    }
}

impl<C, P> Cursor for FilterCursor<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    fn has_next(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.prime();
        state.pending.is_some()
    }

    fn rewind(&mut self) {
        let state = self.state.get_mut();
        state.base.rewind();
        state.pending = None;
        state.primed = false;
    }
}
