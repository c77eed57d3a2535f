#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use campus_directory::{Entity, RatedEntity, ResidentEntity, Stars};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Eating,
    Lodging,
    Leisure,
}

#[derive(Debug)]
pub struct Venue {
    name: String,
    kind: Kind,
    stars: Cell<u8>,
    tags: RefCell<Vec<String>>,
}

/// Shared venue handle; equality is identity.
#[derive(Debug, Clone)]
pub struct VenueRef(Rc<Venue>);

impl VenueRef {
    pub fn new(name: &str, kind: Kind, stars: u8) -> Self {
        VenueRef(Rc::new(Venue {
            name: name.to_string(),
            kind,
            stars: Cell::new(stars),
            tags: RefCell::new(Vec::new()),
        }))
    }

    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.0.tags.borrow_mut().extend(tags.iter().map(|tag| tag.to_string()));
        self
    }

    pub fn set_stars(&self, stars: u8) {
        self.0.stars.set(stars);
    }

    pub fn set_tags(&self, tags: &[&str]) {
        *self.0.tags.borrow_mut() = tags.iter().map(|tag| tag.to_string()).collect();
    }
}

impl PartialEq for VenueRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Entity for VenueRef {
    fn name(&self) -> String {
        self.0.name.clone()
    }
}

impl RatedEntity for VenueRef {
    type Category = Kind;

    fn stars(&self) -> Stars {
        Stars::new(self.0.stars.get()).unwrap_or(Stars::MIN)
    }

    fn category(&self) -> Kind {
        self.0.kind
    }

    fn tags(&self) -> Vec<String> {
        self.0.tags.borrow().clone()
    }
}

#[derive(Debug)]
pub struct Resident {
    name: String,
    country: String,
}

#[derive(Debug, Clone)]
pub struct ResidentRef(Rc<Resident>);

impl ResidentRef {
    pub fn new(name: &str, country: &str) -> Self {
        ResidentRef(Rc::new(Resident {
            name: name.to_string(),
            country: country.to_string(),
        }))
    }
}

impl PartialEq for ResidentRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Entity for ResidentRef {
    fn name(&self) -> String {
        self.0.name.clone()
    }
}

impl ResidentEntity for ResidentRef {
    fn country(&self) -> String {
        self.0.country.clone()
    }
}

/// Names yielded by any iterator of entities.
pub fn names<'a, E, I>(entities: I) -> Vec<String>
where
    E: Entity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().map(Entity::name).collect()
}
