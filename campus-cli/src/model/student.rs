use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use campus_core::{ListCursor, Map, SepChainHashTable, TwoWayList};
use campus_directory::{Entity, RatedEntity, ResidentEntity};
use serde::{Deserialize, Serialize};

use crate::model::service::{ServiceRef, ServiceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentType {
    Bookish,
    Outgoing,
    Thrifty,
}

impl StudentType {
    /// Case-insensitive parse of a typed-in student type.
    pub fn parse(text: &str) -> Option<StudentType> {
        match text.trim().to_lowercase().as_str() {
            "bookish" => Some(StudentType::Bookish),
            "outgoing" => Some(StudentType::Outgoing),
            "thrifty" => Some(StudentType::Thrifty),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StudentType::Bookish => "bookish",
            StudentType::Outgoing => "outgoing",
            StudentType::Thrifty => "thrifty",
        }
    }
}

impl fmt::Display for StudentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Visits - distinct services in first-visit order
// ============================================================================

pub struct Visits {
    order: TwoWayList<ServiceRef>,
    seen: SepChainHashTable<String, ()>,
}

impl Visits {
    pub fn new() -> Self {
        Self {
            order: TwoWayList::new(),
            seen: SepChainHashTable::new(),
        }
    }

    /// Appends `service` unless it was visited before.
    pub fn record(&mut self, service: &ServiceRef) -> bool {
        let key = service.borrow().name().to_lowercase();
        if self.seen.contains_key(&key) {
            return false;
        }
        self.seen.put(key, ());
        self.order.add_last(service.clone());
        true
    }

    pub fn iter(&self) -> ListCursor<'_, ServiceRef> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for Visits {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Visits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.order.iter().map(Entity::name)).finish()
    }
}

/// What a thrifty student remembers instead of a visit list.
///
#[derive(Debug)]
pub struct Thrift {
    cheapest_eating: Option<ServiceRef>,
    cheapest_lodging: ServiceRef,
}

impl Thrift {
    pub fn cheapest_eating(&self) -> Option<&ServiceRef> {
        self.cheapest_eating.as_ref()
    }

    pub fn cheapest_lodging(&self) -> &ServiceRef {
        &self.cheapest_lodging
    }
}

/// The per-type behaviour of a student.
///
/// - Bookish students keep the distinct leisure services they went to.
/// - Outgoing students keep every distinct service, homes included.
/// - Thrifty students keep only the cheapest eating and lodging seen.
///
#[derive(Debug)]
pub enum Habits {
    Bookish(Visits),
    Outgoing(Visits),
    Thrifty(Thrift),
}

// ============================================================================
// Student
// ============================================================================

#[derive(Debug)]
pub struct Student {
    name: String,
    country: String,
    home: ServiceRef,
    location: ServiceRef,
    habits: Habits,
}

impl Student {
    /// A new student standing in `home`.
    pub fn new(kind: StudentType, name: &str, country: &str, home: &ServiceRef) -> Self {
        let habits = match kind {
            StudentType::Bookish => Habits::Bookish(Visits::new()),
            StudentType::Outgoing => {
                let mut visits = Visits::new();
                visits.record(home);
                Habits::Outgoing(visits)
            }
            StudentType::Thrifty => Habits::Thrifty(Thrift {
                cheapest_eating: None,
                cheapest_lodging: home.clone(),
            }),
        };
        Self {
            name: name.to_string(),
            country: country.to_string(),
            home: home.clone(),
            location: home.clone(),
            habits,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn student_type(&self) -> StudentType {
        match self.habits {
            Habits::Bookish(_) => StudentType::Bookish,
            Habits::Outgoing(_) => StudentType::Outgoing,
            Habits::Thrifty(_) => StudentType::Thrifty,
        }
    }

    pub fn habits(&self) -> &Habits {
        &self.habits
    }

    pub fn home(&self) -> &ServiceRef {
        &self.home
    }

    /// Where the student is right now.
    pub fn location(&self) -> &ServiceRef {
        &self.location
    }

    /// Visit history; `None` for thrifty students.
    pub fn visits(&self) -> Option<&Visits> {
        match &self.habits {
            Habits::Bookish(visits) | Habits::Outgoing(visits) => Some(visits),
            Habits::Thrifty(_) => None,
        }
    }

    fn register_visit(&mut self, service: &ServiceRef) {
        match &mut self.habits {
            Habits::Bookish(visits) => {
                if service.category() == ServiceType::Leisure {
                    visits.record(service);
                }
            }
            Habits::Outgoing(visits) => {
                visits.record(service);
            }
            Habits::Thrifty(_) => {}
        }
    }

    /// Moves the student into an eating or leisure service.
    pub fn go_to(&mut self, service: &ServiceRef) {
        self.location = service.clone();
        if let Habits::Thrifty(thrift) = &mut self.habits
            && service.category() == ServiceType::Eating
        {
            let cheaper = thrift
                .cheapest_eating
                .as_ref()
                .is_none_or(|cheapest| service.borrow().price() < cheapest.borrow().price());
            if cheaper {
                thrift.cheapest_eating = Some(service.clone());
            }
        }
        self.register_visit(service);
    }

    /// A thrifty student in an eating dearer than the cheapest one seen.
    pub fn is_distracted_at(&self, service: &ServiceRef) -> bool {
        let Habits::Thrifty(thrift) = &self.habits else {
            return false;
        };
        if service.category() != ServiceType::Eating {
            return false;
        }
        thrift
            .cheapest_eating
            .as_ref()
            .is_some_and(|cheapest| service.borrow().price() > cheapest.borrow().price())
    }

    /// Thrifty students only move to a strictly cheaper lodging.
    pub fn accepts_home(&self, lodging: &ServiceRef) -> bool {
        match &self.habits {
            Habits::Thrifty(thrift) => lodging.borrow().price() < thrift.cheapest_lodging.borrow().price(),
            Habits::Bookish(_) | Habits::Outgoing(_) => true,
        }
    }

    /// Makes `lodging` the new home and moves the student there.
    pub fn settle_in(&mut self, lodging: &ServiceRef) {
        self.home = lodging.clone();
        self.location = lodging.clone();
        if let Habits::Thrifty(thrift) = &mut self.habits {
            thrift.cheapest_lodging = lodging.clone();
        }
        self.register_visit(lodging);
    }

    /// Picks the service this student would choose among `candidates`.
    ///
    /// Thrifty students pick the cheapest, everyone else the best rated.
    /// The first candidate wins ties.
    ///
    pub fn most_relevant<'a, I>(&self, candidates: I) -> Option<ServiceRef>
    where
        I: IntoIterator<Item = &'a ServiceRef>,
    {
        let thrifty = matches!(self.habits, Habits::Thrifty(_));
        let mut best: Option<&ServiceRef> = None;
        for candidate in candidates {
            let better = match best {
                None => true,
                Some(current) if thrifty => candidate.borrow().price() < current.borrow().price(),
                Some(current) => candidate.stars() > current.stars(),
            };
            if better {
                best = Some(candidate);
            }
        }
        best.cloned()
    }

    /// Reinstates saved position and history.
    ///
    /// `visited` is ignored for thrifty students, the cheapest services are
    /// ignored for the others.
    ///
    pub(crate) fn restore_state(
        &mut self,
        location: ServiceRef,
        visited: &[ServiceRef],
        cheapest_eating: Option<ServiceRef>,
        cheapest_lodging: Option<ServiceRef>,
    ) {
        self.location = location;
        match &mut self.habits {
            Habits::Bookish(visits) | Habits::Outgoing(visits) => {
                *visits = Visits::new();
                for service in visited {
                    visits.record(service);
                }
            }
            Habits::Thrifty(thrift) => {
                thrift.cheapest_eating = cheapest_eating;
                if let Some(lodging) = cheapest_lodging {
                    thrift.cheapest_lodging = lodging;
                }
            }
        }
    }
}

// ============================================================================
// StudentRef - shared handle indexed by the student directory
// ============================================================================

pub type WeakStudent = Weak<RefCell<Student>>;

/// Shared handle to a [`Student`]. Equality is identity.
///
/// Services keep [`WeakStudent`] back references to their occupants so
/// that a student and its home never keep each other alive.
///
#[derive(Debug, Clone)]
pub struct StudentRef(Rc<RefCell<Student>>);

impl StudentRef {
    pub fn new(student: Student) -> Self {
        StudentRef(Rc::new(RefCell::new(student)))
    }

    pub fn borrow(&self) -> Ref<'_, Student> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Student> {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakStudent {
        Rc::downgrade(&self.0)
    }

    pub fn upgrade(weak: &WeakStudent) -> Option<StudentRef> {
        weak.upgrade().map(StudentRef)
    }

    /// True when `weak` points at this student.
    pub fn is(&self, weak: &WeakStudent) -> bool {
        std::ptr::eq(Rc::as_ptr(&self.0), weak.as_ptr())
    }
}

impl PartialEq for StudentRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for StudentRef {}

impl Entity for StudentRef {
    fn name(&self) -> String {
        self.borrow().name.clone()
    }
}

impl ResidentEntity for StudentRef {
    fn country(&self) -> String {
        self.borrow().country.clone()
    }
}
