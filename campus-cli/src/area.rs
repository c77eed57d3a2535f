//! A named campus area and every rule about what happens inside it.
//!
//! Each operation checks all of its preconditions before touching any state,
//! so a rejected command leaves the area exactly as it was.

use campus_core::{BucketsCursor, Cursor, FilterCursor, TwoWayCursor};
use campus_directory::{Entity, RatedEntity, ServiceDirectory, Stars, StudentDirectory, TagCursor};
use tracing::debug;

use crate::error::CommandError;
use crate::model::{Service, ServiceRef, ServiceType, Student, StudentRef, StudentType};

/// Geographic bounding rectangle of an area.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    top: i64,
    left: i64,
    bottom: i64,
    right: i64,
}

impl Bounds {
    /// Requires `top > bottom` and `left < right`.
    pub fn new(top: i64, left: i64, bottom: i64, right: i64) -> Result<Self, CommandError> {
        if top > bottom && left < right {
            Ok(Self { top, left, bottom, right })
        } else {
            Err(CommandError::InvalidBounds)
        }
    }

    /// Edges are inside.
    pub fn contains(&self, latitude: i64, longitude: i64) -> bool {
        (self.bottom..=self.top).contains(&latitude) && (self.left..=self.right).contains(&longitude)
    }

    pub fn top(&self) -> i64 {
        self.top
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn bottom(&self) -> i64 {
        self.bottom
    }

    pub fn right(&self) -> i64 {
        self.right
    }
}

/// Result of a successful `go`.
#[derive(Debug)]
pub struct Outing {
    pub student: StudentRef,
    pub service: ServiceRef,
    pub distracted: bool,
}

// ============================================================================
// Area
// ============================================================================

pub struct Area {
    name: String,
    bounds: Bounds,
    services: ServiceDirectory<ServiceRef>,
    students: StudentDirectory<StudentRef>,
}

impl Area {
    pub fn new(name: &str, bounds: Bounds) -> Self {
        Self::from_parts(name.to_string(), bounds, ServiceDirectory::new(), StudentDirectory::new())
    }

    pub(crate) fn from_parts(
        name: String,
        bounds: Bounds,
        services: ServiceDirectory<ServiceRef>,
        students: StudentDirectory<StudentRef>,
    ) -> Self {
        Self {
            name,
            bounds,
            services,
            students,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn services(&self) -> &ServiceDirectory<ServiceRef> {
        &self.services
    }

    pub fn students(&self) -> &StudentDirectory<StudentRef> {
        &self.students
    }

    fn find_service(&self, name: &str) -> Option<ServiceRef> {
        self.services.get(name).cloned()
    }

    fn find_student(&self, name: &str) -> Result<StudentRef, CommandError> {
        self.students
            .get(name)
            .cloned()
            .ok_or_else(|| CommandError::StudentNotFound(name.to_string()))
    }

    fn find_lodging(&self, name: &str) -> Result<ServiceRef, CommandError> {
        self.find_service(name)
            .filter(|service| service.category() == ServiceType::Lodging)
            .ok_or_else(|| CommandError::LodgingNotFound(name.to_string()))
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub fn add_service(
        &mut self,
        kind: Option<ServiceType>,
        name: &str,
        latitude: i64,
        longitude: i64,
        price: i64,
        value: i64,
    ) -> Result<ServiceRef, CommandError> {
        let kind = kind.ok_or(CommandError::InvalidServiceType)?;
        if !self.bounds.contains(latitude, longitude) {
            return Err(CommandError::InvalidLocation);
        }
        let service = Service::new(kind, name, latitude, longitude, price, value)?;
        if let Some(existing) = self.services.get(name) {
            return Err(CommandError::ServiceAlreadyExists(existing.name()));
        }

        let service = ServiceRef::new(service);
        self.services.add(service.clone())?;
        debug!(area = %self.name, service = name, %kind, "service added");
        Ok(service)
    }

    /// Records a review and moves the service to its new rating bucket.
    pub fn add_review(&mut self, service_name: &str, stars: i64, description: &str) -> Result<(), CommandError> {
        let stars = Stars::from_input(stars).ok_or(CommandError::InvalidEvaluation)?;
        let service = self
            .find_service(service_name)
            .ok_or_else(|| CommandError::ServiceNotFound(service_name.to_string()))?;

        let previous = service.stars();
        service.borrow_mut().add_review(stars, description);
        if self.services.reindex_rating(&service, previous)? {
            debug!(service = service_name, %previous, current = %service.stars(), "rating changed");
        }
        self.services.reindex_tags(&service)?;
        Ok(())
    }

    /// Services by average rating, best first, ties in registration order.
    pub fn ranking(&self) -> BucketsCursor<'_, ServiceRef> {
        self.services.by_rating()
    }

    /// Services with a review containing the whole word `term`, in
    /// registration order.
    ///
    pub fn tagged(&self, term: &str) -> TagCursor<'_, ServiceRef> {
        self.services.with_tag(term)
    }

    /// Services of `kind` rated `stars` that are nearest to the student.
    ///
    /// Distance is Manhattan distance from the student's current location.
    /// All services at the minimal distance are returned, in registration
    /// order.
    ///
    pub fn ranked(
        &self,
        kind: Option<ServiceType>,
        stars: i64,
        student_name: &str,
    ) -> Result<Vec<ServiceRef>, CommandError> {
        let stars = Stars::from_input(stars).ok_or(CommandError::InvalidStars)?;
        let student = self.find_student(student_name)?;
        let kind = kind.ok_or(CommandError::InvalidServiceType)?;
        if !self.services.has_category(&kind) {
            return Err(CommandError::NoServicesOfType(kind));
        }

        let location = student.borrow().location().clone();
        let (latitude, longitude) = {
            let location = location.borrow();
            (location.latitude(), location.longitude())
        };
        let distance = |service: &ServiceRef| service.borrow().distance_to(latitude, longitude);

        let nearest = self
            .services
            .with_category_and_stars(&kind, stars)
            .map(distance)
            .min()
            .ok_or(CommandError::NoServicesWithStars(kind))?;
        let closest = FilterCursor::new(self.services.with_category_and_stars(&kind, stars), |service| {
            distance(*service) == nearest
        });
        Ok(closest.cloned().collect())
    }

    /// The service of `kind` the student would pick.
    pub fn find(&self, student_name: &str, kind: Option<ServiceType>) -> Result<ServiceRef, CommandError> {
        let kind = kind.ok_or(CommandError::InvalidServiceType)?;
        let student = self.find_student(student_name)?;
        let best = student.borrow().most_relevant(self.services.by_category(&kind));
        best.ok_or(CommandError::NoServicesOfType(kind))
    }

    /// Students inside an eating or lodging service, in arrival order or,
    /// with `"<"`, in reverse.
    ///
    pub fn users(&self, order: &str, service_name: &str) -> Result<(ServiceRef, Vec<StudentRef>), CommandError> {
        let forward = match order {
            ">" => true,
            "<" => false,
            _ => return Err(CommandError::InvalidOrder),
        };
        let service = self
            .find_service(service_name)
            .ok_or_else(|| CommandError::ServiceNotFound(service_name.to_string()))?;

        let users = {
            let borrowed = service.borrow();
            let Some(mut cursor) = borrowed.occupant_cursor() else {
                return Err(CommandError::NoEntryControl(borrowed.name().to_string()));
            };
            let mut users = Vec::new();
            if forward {
                users.extend(cursor.by_ref().filter_map(StudentRef::upgrade));
            } else {
                cursor.full_forward();
                while let Some(occupant) = cursor.previous() {
                    users.extend(StudentRef::upgrade(occupant));
                }
            }
            users
        };
        Ok((service, users))
    }

    // ========================================================================
    // Students
    // ========================================================================

    /// Registers a student living in `lodging_name`.
    pub fn add_student(
        &mut self,
        kind: Option<StudentType>,
        name: &str,
        country: &str,
        lodging_name: &str,
    ) -> Result<StudentRef, CommandError> {
        let lodging = self.find_lodging(lodging_name)?;
        let kind = kind.ok_or(CommandError::InvalidStudentType)?;
        if lodging.borrow().is_full() {
            return Err(CommandError::LodgingIsFull(lodging_name.to_string()));
        }
        if let Some(existing) = self.students.get(name) {
            return Err(CommandError::StudentAlreadyExists(existing.name()));
        }

        let student = StudentRef::new(Student::new(kind, name, country, &lodging));
        self.students.add(student.clone())?;
        lodging.borrow_mut().admit(&student);
        debug!(area = %self.name, student = name, %kind, lodging = lodging_name, "student added");
        Ok(student)
    }

    /// Removes a student from the area, its home and wherever it is eating.
    pub fn remove_student(&mut self, name: &str) -> Result<StudentRef, CommandError> {
        let student = self
            .students
            .remove(name)
            .ok_or_else(|| CommandError::StudentNotFound(name.to_string()))?;

        let (home, location) = {
            let borrowed = student.borrow();
            (borrowed.home().clone(), borrowed.location().clone())
        };
        location.borrow_mut().release(&student);
        if location != home {
            home.borrow_mut().release(&student);
        }
        debug!(area = %self.name, student = name, "student left");
        Ok(student)
    }

    /// Every student in alphabetical order for `"all"` (any case), else
    /// the students of that country in registration order.
    ///
    pub fn list_students(&self, filter: &str) -> Box<dyn Cursor<Item = &StudentRef> + '_> {
        if filter.eq_ignore_ascii_case("all") {
            Box::new(self.students.iter())
        } else {
            Box::new(self.students.by_country(filter))
        }
    }

    pub fn locate(&self, student_name: &str) -> Result<(StudentRef, ServiceRef), CommandError> {
        let student = self.find_student(student_name)?;
        let location = student.borrow().location().clone();
        Ok((student, location))
    }

    pub fn visited(&self, student_name: &str) -> Result<(StudentRef, Vec<ServiceRef>), CommandError> {
        let student = self.find_student(student_name)?;
        let visited = {
            let borrowed = student.borrow();
            let visits = borrowed
                .visits()
                .ok_or_else(|| CommandError::StudentIsThrifty(borrowed.name().to_string()))?;
            if visits.is_empty() {
                return Err(CommandError::NoVisitedLocations(borrowed.name().to_string()));
            }
            visits.iter().cloned().collect::<Vec<_>>()
        };
        Ok((student, visited))
    }

    /// Sends a student to an eating or leisure service.
    ///
    pub fn go(&mut self, student_name: &str, service_name: &str) -> Result<Outing, CommandError> {
        let service = self
            .find_service(service_name)
            .ok_or_else(|| CommandError::UnknownService(service_name.to_string()))?;
        let student = self.find_student(student_name)?;
        if service.category() == ServiceType::Lodging {
            return Err(CommandError::NotValidService(service.name()));
        }
        let location = student.borrow().location().clone();
        if location == service {
            return Err(CommandError::AlreadyThere);
        }
        if service.borrow().is_full() {
            return Err(CommandError::EatingIsFull(service.name()));
        }

        if location.category() == ServiceType::Eating {
            location.borrow_mut().release(&student);
        }
        service.borrow_mut().admit(&student);
        student.borrow_mut().go_to(&service);
        let distracted = student.borrow().is_distracted_at(&service);
        debug!(student = student_name, service = service_name, distracted, "student moved");

        Ok(Outing {
            student,
            service,
            distracted,
        })
    }

    /// Makes `lodging_name` the student's home and moves the student there.
    ///
    pub fn move_home(
        &mut self,
        student_name: &str,
        lodging_name: &str,
    ) -> Result<(StudentRef, ServiceRef), CommandError> {
        let lodging = self.find_lodging(lodging_name)?;
        let student = self.find_student(student_name)?;
        let (home, location) = {
            let borrowed = student.borrow();
            (borrowed.home().clone(), borrowed.location().clone())
        };
        if home == lodging {
            return Err(CommandError::AlreadyStudentHome(student.name()));
        }
        if lodging.borrow().is_full() {
            return Err(CommandError::LodgingIsFull(lodging_name.to_string()));
        }
        if !student.borrow().accepts_home(&lodging) {
            return Err(CommandError::MoveNotAcceptable(student_name.to_string()));
        }

        home.borrow_mut().release(&student);
        if location.category() == ServiceType::Eating {
            location.borrow_mut().release(&student);
        }
        lodging.borrow_mut().admit(&student);
        student.borrow_mut().settle_in(&lodging);
        debug!(student = student_name, lodging = lodging_name, "student moved home");
        Ok((student, lodging))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn names<'a, E: Entity + 'a>(entities: impl IntoIterator<Item = &'a E>) -> Vec<String> {
        entities.into_iter().map(Entity::name).collect()
    }

    #[fixture]
    fn area() -> Area {
        let mut area = Area::new("Campus", Bounds::new(100, 0, 0, 100).unwrap());
        area.add_service(Some(ServiceType::Lodging), "Hostel", 10, 10, 20, 2).unwrap();
        area.add_service(Some(ServiceType::Lodging), "Dorm", 50, 50, 10, 5).unwrap();
        area.add_service(Some(ServiceType::Eating), "Canteen", 12, 10, 5, 1).unwrap();
        area.add_service(Some(ServiceType::Eating), "Bistro", 90, 90, 9, 10).unwrap();
        area.add_service(Some(ServiceType::Leisure), "Museum", 20, 20, 10, 50).unwrap();
        area
    }

    #[rstest]
    #[case::flat(5, 0, 5, 10)]
    #[case::inverted(0, 0, 5, 10)]
    #[case::narrow(10, 7, 0, 7)]
    fn verify_invalid_bounds(#[case] top: i64, #[case] left: i64, #[case] bottom: i64, #[case] right: i64) {
        assert!(matches!(Bounds::new(top, left, bottom, right), Err(CommandError::InvalidBounds)));
    }

    #[test]
    fn test_bounds_include_edges() {
        let bounds = Bounds::new(10, -10, -10, 10).unwrap();
        assert!(bounds.contains(10, -10));
        assert!(bounds.contains(0, 0));
        assert!(!bounds.contains(11, 0));
        assert!(!bounds.contains(0, 10_000));
    }

    #[rstest]
    fn verify_service_validation_order(mut area: Area) {
        assert!(matches!(
            area.add_service(None, "X", 500, 500, 0, 0),
            Err(CommandError::InvalidServiceType)
        ));
        assert!(matches!(
            area.add_service(Some(ServiceType::Eating), "X", 500, 5, 0, 0),
            Err(CommandError::InvalidLocation)
        ));
        let duplicate = area.add_service(Some(ServiceType::Eating), "HOSTEL", 5, 5, 5, 5);
        assert_eq!(duplicate.unwrap_err().to_string(), "Hostel already exists!");
        assert_eq!(area.services().len(), 5);
    }

    #[rstest]
    fn verify_full_lodging_rejects_without_side_effects(mut area: Area) {
        area.add_student(Some(StudentType::Bookish), "Ana", "Portugal", "hostel").unwrap();
        area.add_student(Some(StudentType::Outgoing), "Rui", "Portugal", "Hostel").unwrap();

        let full = area.add_student(Some(StudentType::Thrifty), "Eva", "Spain", "Hostel");
        assert_eq!(full.unwrap_err().to_string(), "lodging Hostel is full!");
        assert!(!area.students().contains("Eva"));

        let duplicate = area.add_student(Some(StudentType::Thrifty), "ANA", "Spain", "Dorm");
        assert_eq!(duplicate.unwrap_err().to_string(), "Ana already exists!");
        let (_, users) = area.users(">", "Dorm").unwrap();
        assert!(users.is_empty());
    }

    #[rstest]
    fn verify_occupants_follow_students(mut area: Area) {
        area.add_student(Some(StudentType::Bookish), "Ana", "Portugal", "Hostel").unwrap();
        area.add_student(Some(StudentType::Outgoing), "Rui", "Portugal", "Hostel").unwrap();

        let (_, users) = area.users("<", "hostel").unwrap();
        assert_eq!(names(&users), ["Rui", "Ana"]);

        area.go("Ana", "Canteen").unwrap();
        assert!(matches!(area.go("Rui", "Canteen"), Err(CommandError::EatingIsFull(_))));
        assert!(matches!(area.go("Ana", "canteen"), Err(CommandError::AlreadyThere)));
        assert!(matches!(area.go("Ana", "Dorm"), Err(CommandError::NotValidService(_))));

        area.go("Ana", "Museum").unwrap();
        let (_, diners) = area.users(">", "Canteen").unwrap();
        assert!(diners.is_empty());
        assert!(matches!(area.users(">", "Museum"), Err(CommandError::NoEntryControl(_))));
        assert!(matches!(area.users("=", "Canteen"), Err(CommandError::InvalidOrder)));

        area.go("Rui", "Canteen").unwrap();
        area.remove_student("rui").unwrap();
        let (_, diners) = area.users(">", "Canteen").unwrap();
        let (_, residents) = area.users(">", "Hostel").unwrap();
        assert!(diners.is_empty());
        assert_eq!(names(&residents), ["Ana"]);
    }

    #[rstest]
    fn verify_move_home(mut area: Area) {
        area.add_student(Some(StudentType::Outgoing), "Ana", "Portugal", "Hostel").unwrap();
        area.go("Ana", "Canteen").unwrap();

        assert!(matches!(area.move_home("Ana", "Hostel"), Err(CommandError::AlreadyStudentHome(_))));
        assert!(matches!(area.move_home("Ana", "Museum"), Err(CommandError::LodgingNotFound(_))));

        area.move_home("Ana", "dorm").unwrap();
        let (_, location) = area.locate("ana").unwrap();
        assert_eq!(location.name(), "Dorm");
        assert!(area.users(">", "Canteen").unwrap().1.is_empty());
        assert!(area.users(">", "Hostel").unwrap().1.is_empty());
        assert_eq!(names(&area.users(">", "Dorm").unwrap().1), ["Ana"]);

        let (_, visited) = area.visited("Ana").unwrap();
        assert_eq!(names(&visited), ["Hostel", "Canteen", "Dorm"]);
    }

    #[rstest]
    fn verify_thrifty_rules(mut area: Area) {
        area.add_student(Some(StudentType::Thrifty), "Eva", "Spain", "Dorm").unwrap();
        assert!(matches!(area.visited("Eva"), Err(CommandError::StudentIsThrifty(_))));
        assert!(matches!(area.move_home("Eva", "Hostel"), Err(CommandError::MoveNotAcceptable(_))));

        assert!(!area.go("Eva", "Canteen").unwrap().distracted);
        assert!(area.go("Eva", "Bistro").unwrap().distracted);
        assert_eq!(area.find("Eva", Some(ServiceType::Eating)).unwrap().name(), "Canteen");
    }

    #[rstest]
    fn verify_reviews_drive_ranking_and_tags(mut area: Area) {
        assert!(matches!(area.add_review("Bistro", 6, ""), Err(CommandError::InvalidEvaluation)));
        assert!(matches!(area.add_review("Nowhere", 3, ""), Err(CommandError::ServiceNotFound(_))));

        area.add_review("Bistro", 5, "Quiet and COZY").unwrap();
        area.add_review("Canteen", 1, "noisy").unwrap();
        area.add_review("Canteen", 1, "cheap but noisy").unwrap();

        assert_eq!(names(area.ranking()), ["Bistro", "Hostel", "Dorm", "Museum", "Canteen"]);
        assert_eq!(names(area.tagged("cozy")), ["Bistro"]);
        assert_eq!(names(area.tagged("NOISY")), ["Canteen"]);
        assert!(!area.tagged("cheap but").has_next());

        area.add_student(Some(StudentType::Bookish), "Ana", "Portugal", "Hostel").unwrap();
        assert_eq!(area.find("Ana", Some(ServiceType::Eating)).unwrap().name(), "Bistro");
    }

    #[rstest]
    fn verify_ranked_picks_nearest(mut area: Area) {
        area.add_service(Some(ServiceType::Eating), "Corner", 8, 10, 5, 3).unwrap();
        area.add_student(Some(StudentType::Bookish), "Ana", "Portugal", "Hostel").unwrap();

        let four = area.ranked(Some(ServiceType::Eating), 4, "Ana").unwrap();
        assert_eq!(names(&four), ["Canteen", "Corner"]);

        assert!(matches!(
            area.ranked(Some(ServiceType::Eating), 0, "Ana"),
            Err(CommandError::InvalidStars)
        ));
        assert!(matches!(
            area.ranked(Some(ServiceType::Eating), 2, "Ana"),
            Err(CommandError::NoServicesWithStars(ServiceType::Eating))
        ));
        assert!(matches!(area.ranked(None, 4, "Ana"), Err(CommandError::InvalidServiceType)));
    }

    #[rstest]
    fn verify_student_listing(mut area: Area) {
        area.add_student(Some(StudentType::Bookish), "Zoe", "Portugal", "Dorm").unwrap();
        area.add_student(Some(StudentType::Bookish), "adam", "Spain", "Dorm").unwrap();
        area.add_student(Some(StudentType::Bookish), "Bruno", "portugal", "Dorm").unwrap();

        assert_eq!(names(area.list_students("ALL")), ["adam", "Bruno", "Zoe"]);
        assert_eq!(names(area.list_students("Portugal")), ["Zoe", "Bruno"]);
        assert!(!area.list_students("France").has_next());
    }
}
