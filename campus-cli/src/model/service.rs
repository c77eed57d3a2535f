use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use campus_core::{ListCursor, TwoWayList, TwoWayListCursor};
use campus_directory::{Entity, RatedEntity, Stars};
use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::model::student::{StudentRef, WeakStudent};

/// Every service opens with one review of this many stars and no text.
pub const OPENING_STARS: Stars = match Stars::new(4) {
    Some(stars) => stars,
    None => Stars::MAX,
};

/// Highest accepted leisure discount, in percent.
pub const MAX_DISCOUNT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Eating,
    Lodging,
    Leisure,
}

impl ServiceType {
    /// Case-insensitive parse of a typed-in service type.
    pub fn parse(text: &str) -> Option<ServiceType> {
        match text.trim().to_lowercase().as_str() {
            "eating" => Some(ServiceType::Eating),
            "lodging" => Some(ServiceType::Lodging),
            "leisure" => Some(ServiceType::Leisure),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Eating => "eating",
            ServiceType::Lodging => "lodging",
            ServiceType::Leisure => "leisure",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    stars: Stars,
    description: String,
}

impl Review {
    /// The description is stored trimmed and lowercased.
    pub fn new(stars: Stars, description: &str) -> Self {
        Self {
            stars,
            description: description.trim().to_lowercase(),
        }
    }

    pub fn stars(&self) -> Stars {
        self.stars
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Students currently inside an eating or lodging service, in arrival order.
pub type Occupants = TwoWayList<WeakStudent>;

/// What kind of service this is, with the data only that kind carries.
///
#[derive(Debug)]
pub enum Facility {
    Eating { seats: u32, occupants: Occupants },
    Lodging { rooms: u32, occupants: Occupants },
    Leisure { discount: u32 },
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug)]
pub struct Service {
    name: String,
    latitude: i64,
    longitude: i64,
    price: i64,
    facility: Facility,
    reviews: TwoWayList<Review>,
    star_total: u64,
}

impl Service {
    /// Validates and builds a service.
    ///
    /// `value` is the seat count for eating, the room count for lodging and
    /// the discount percentage for leisure. A leisure price is stored with
    /// the discount already applied.
    ///
    pub fn new(
        kind: ServiceType,
        name: &str,
        latitude: i64,
        longitude: i64,
        price: i64,
        value: i64,
    ) -> Result<Self, CommandError> {
        let (price, facility) = match kind {
            ServiceType::Eating => {
                if price <= 0 {
                    return Err(CommandError::InvalidMenuPrice);
                }
                let seats = capacity(value)?;
                (price, Facility::Eating { seats, occupants: TwoWayList::new() })
            }
            ServiceType::Lodging => {
                if price <= 0 {
                    return Err(CommandError::InvalidRoomPrice);
                }
                let rooms = capacity(value)?;
                (price, Facility::Lodging { rooms, occupants: TwoWayList::new() })
            }
            ServiceType::Leisure => {
                if price <= 0 {
                    return Err(CommandError::InvalidTicketPrice);
                }
                let discount = u32::try_from(value)
                    .ok()
                    .filter(|discount| *discount <= MAX_DISCOUNT)
                    .ok_or(CommandError::InvalidDiscountPrice)?;
                let reduction = price
                    .checked_mul(i64::from(discount))
                    .ok_or(CommandError::InvalidTicketPrice)?
                    / i64::from(MAX_DISCOUNT);
                let discounted = price - reduction;
                (discounted, Facility::Leisure { discount })
            }
        };

        let mut service = Self {
            name: name.to_string(),
            latitude,
            longitude,
            price,
            facility,
            reviews: TwoWayList::new(),
            star_total: 0,
        };
        service.add_review(OPENING_STARS, "");
        Ok(service)
    }

    /// Rebuilds a saved service. No review is added.
    ///
    pub(crate) fn restore(
        name: String,
        latitude: i64,
        longitude: i64,
        price: i64,
        facility: Facility,
    ) -> Self {
        Self {
            name,
            latitude,
            longitude,
            price,
            facility,
            reviews: TwoWayList::new(),
            star_total: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_type(&self) -> ServiceType {
        match self.facility {
            Facility::Eating { .. } => ServiceType::Eating,
            Facility::Lodging { .. } => ServiceType::Lodging,
            Facility::Leisure { .. } => ServiceType::Leisure,
        }
    }

    pub fn latitude(&self) -> i64 {
        self.latitude
    }

    pub fn longitude(&self) -> i64 {
        self.longitude
    }

    /// Menu price, room price or discounted ticket price.
    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn facility(&self) -> &Facility {
        &self.facility
    }

    /// Manhattan distance to a point, saturating at `u64::MAX`.
    pub fn distance_to(&self, latitude: i64, longitude: i64) -> u64 {
        self.latitude
            .abs_diff(latitude)
            .saturating_add(self.longitude.abs_diff(longitude))
    }

    // ------------------------------------------------------------------------
    // Reviews
    // ------------------------------------------------------------------------

    pub fn add_review(&mut self, stars: Stars, description: &str) {
        self.star_total += u64::from(stars.value());
        self.reviews.add_last(Review::new(stars, description));
    }

    pub fn reviews(&self) -> ListCursor<'_, Review> {
        self.reviews.iter()
    }

    /// Rounded mean of every review.
    pub fn stars(&self) -> Stars {
        Stars::rounded_mean(self.star_total, self.reviews.len() as u64)
    }

    /// Every whitespace-separated word of every review.
    pub fn review_words(&self) -> Vec<String> {
        self.reviews
            .iter()
            .flat_map(|review| review.description.split_whitespace())
            .map(str::to_string)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Occupancy
    // ------------------------------------------------------------------------

    /// Seats or rooms; `None` for services that do not track who is inside.
    pub fn capacity(&self) -> Option<u32> {
        match self.facility {
            Facility::Eating { seats, .. } => Some(seats),
            Facility::Lodging { rooms, .. } => Some(rooms),
            Facility::Leisure { .. } => None,
        }
    }

    pub fn occupants(&self) -> Option<&Occupants> {
        match &self.facility {
            Facility::Eating { occupants, .. } | Facility::Lodging { occupants, .. } => Some(occupants),
            Facility::Leisure { .. } => None,
        }
    }

    fn occupants_mut(&mut self) -> Option<&mut Occupants> {
        match &mut self.facility {
            Facility::Eating { occupants, .. } | Facility::Lodging { occupants, .. } => Some(occupants),
            Facility::Leisure { .. } => None,
        }
    }

    /// Occupants in arrival order, walkable in both directions.
    pub fn occupant_cursor(&self) -> Option<TwoWayListCursor<'_, WeakStudent>> {
        self.occupants().map(TwoWayList::two_way_iter)
    }

    /// True when every seat or room is taken. Leisure is never full.
    pub fn is_full(&self) -> bool {
        match (self.capacity(), self.occupants()) {
            (Some(capacity), Some(occupants)) => occupants.len() >= capacity as usize,
            _ => false,
        }
    }

    /// Appends `student` to the occupants. No effect on leisure services.
    pub fn admit(&mut self, student: &StudentRef) {
        if let Some(occupants) = self.occupants_mut() {
            occupants.add_last(student.downgrade());
        }
    }

    /// Removes `student` from the occupants, returning whether it was there.
    pub fn release(&mut self, student: &StudentRef) -> bool {
        let Some(occupants) = self.occupants_mut() else {
            return false;
        };
        match occupants.find_position(|occupant| student.is(occupant)) {
            Some(position) => occupants.remove_at(position).is_some(),
            None => false,
        }
    }
}

fn capacity(value: i64) -> Result<u32, CommandError> {
    u32::try_from(value)
        .ok()
        .filter(|capacity| *capacity > 0)
        .ok_or(CommandError::InvalidCapacity)
}

// ============================================================================
// ServiceRef - shared handle indexed by the service directory
// ============================================================================

/// Shared handle to a [`Service`]. Equality is identity.
///
#[derive(Debug, Clone)]
pub struct ServiceRef(Rc<RefCell<Service>>);

impl ServiceRef {
    pub fn new(service: Service) -> Self {
        ServiceRef(Rc::new(RefCell::new(service)))
    }

    pub fn borrow(&self) -> Ref<'_, Service> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Service> {
        self.0.borrow_mut()
    }
}

impl PartialEq for ServiceRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ServiceRef {}

impl Entity for ServiceRef {
    fn name(&self) -> String {
        self.borrow().name.clone()
    }
}

impl RatedEntity for ServiceRef {
    type Category = ServiceType;

    fn stars(&self) -> Stars {
        self.borrow().stars()
    }

    fn category(&self) -> ServiceType {
        self.borrow().service_type()
    }

    fn tags(&self) -> Vec<String> {
        self.borrow().review_words()
    }
}
