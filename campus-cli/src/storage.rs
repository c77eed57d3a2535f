//! Saving and loading areas as JSON files.
//!
//! A snapshot holds only what was entered, in the order it was entered:
//! services with their reviews, students with their position and history,
//! and who occupies which service. Loading replays it into fresh
//! directories, which rebuilds every index.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use campus_directory::{Entity, ServiceDirectory, Stars, StudentDirectory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::area::{Area, Bounds};
use crate::error::StorageError;
use crate::model::{Facility, Habits, Service, ServiceRef, ServiceType, Student, StudentRef, StudentType};

const FILE_EXTENSION: &str = "json";

// ============================================================================
// Snapshot records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub name: String,
    pub top: i64,
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
    pub services: Vec<ServiceRecord>,
    pub students: Vec<StudentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    pub kind: ServiceType,
    pub latitude: i64,
    pub longitude: i64,
    /// Stored price, discount already applied for leisure.
    pub price: i64,
    /// Seats, rooms or discount percentage.
    pub value: u32,
    pub reviews: Vec<ReviewRecord>,
    /// Occupant names in arrival order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub stars: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub country: String,
    pub kind: StudentType,
    pub home: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visited: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheapest_eating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheapest_lodging: Option<String>,
}

impl AreaSnapshot {
    pub fn capture(area: &Area) -> Self {
        let bounds = area.bounds();
        Self {
            name: area.name().to_string(),
            top: bounds.top(),
            left: bounds.left(),
            bottom: bounds.bottom(),
            right: bounds.right(),
            services: area.services().iter().map(ServiceRecord::capture).collect(),
            students: area.students().registration_order().map(StudentRecord::capture).collect(),
        }
    }

    /// Rebuilds the area by replaying services, then students, then
    /// occupancy.
    ///
    pub fn restore(self) -> Result<Area, StorageError> {
        let bounds = Bounds::new(self.top, self.left, self.bottom, self.right)
            .map_err(|_| StorageError::Corrupt(format!("invalid bounds for area '{}'", self.name)))?;

        let mut services = Vec::with_capacity(self.services.len());
        for record in &self.services {
            services.push(record.restore()?);
        }
        let services = ServiceDirectory::from_snapshot(services)?;

        let mut students = Vec::with_capacity(self.students.len());
        for record in &self.students {
            students.push(record.restore(&services)?);
        }
        let students = StudentDirectory::from_snapshot(students)?;

        for record in &self.services {
            let service = lookup_service(&services, &record.name)?;
            for occupant in &record.occupants {
                let student = students
                    .get(occupant)
                    .ok_or_else(|| StorageError::Corrupt(format!("unknown occupant '{occupant}'")))?;
                service.borrow_mut().admit(student);
            }
        }

        debug!(area = %self.name, services = services.len(), students = students.len(), "area replayed");
        Ok(Area::from_parts(self.name, bounds, services, students))
    }
}

impl ServiceRecord {
    fn capture(service: &ServiceRef) -> Self {
        let service = service.borrow();
        let value = match service.facility() {
            Facility::Eating { seats, .. } => *seats,
            Facility::Lodging { rooms, .. } => *rooms,
            Facility::Leisure { discount } => *discount,
        };
        let occupants = service
            .occupants()
            .map(|occupants| {
                occupants
                    .iter()
                    .filter_map(StudentRef::upgrade)
                    .map(|student| student.name())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: service.name().to_string(),
            kind: service.service_type(),
            latitude: service.latitude(),
            longitude: service.longitude(),
            price: service.price(),
            value,
            reviews: service
                .reviews()
                .map(|review| ReviewRecord {
                    stars: review.stars().value(),
                    description: review.description().to_string(),
                })
                .collect(),
            occupants,
        }
    }

    fn restore(&self) -> Result<ServiceRef, StorageError> {
        let facility = match self.kind {
            ServiceType::Eating => Facility::Eating {
                seats: self.value,
                occupants: Default::default(),
            },
            ServiceType::Lodging => Facility::Lodging {
                rooms: self.value,
                occupants: Default::default(),
            },
            ServiceType::Leisure => Facility::Leisure { discount: self.value },
        };
        let mut service = Service::restore(
            self.name.clone(),
            self.latitude,
            self.longitude,
            self.price,
            facility,
        );
        if self.reviews.is_empty() {
            return Err(StorageError::Corrupt(format!("service '{}' has no reviews", self.name)));
        }
        for review in &self.reviews {
            let stars = Stars::new(review.stars)
                .ok_or_else(|| StorageError::Corrupt(format!("review of {} out of range", review.stars)))?;
            service.add_review(stars, &review.description);
        }
        Ok(ServiceRef::new(service))
    }
}

impl StudentRecord {
    fn capture(student: &StudentRef) -> Self {
        let student = student.borrow();
        let (visited, cheapest_eating, cheapest_lodging): (Vec<String>, Option<String>, Option<String>) =
            match student.habits() {
                Habits::Bookish(visits) | Habits::Outgoing(visits) => {
                    (visits.iter().map(Entity::name).collect(), None, None)
                }
                Habits::Thrifty(thrift) => (
                    Vec::new(),
                    thrift.cheapest_eating().map(Entity::name),
                    Some(thrift.cheapest_lodging().name()),
                ),
            };
        Self {
            name: student.name().to_string(),
            country: student.country().to_string(),
            kind: student.student_type(),
            home: student.home().name(),
            location: student.location().name(),
            visited,
            cheapest_eating,
            cheapest_lodging,
        }
    }

    fn restore(&self, services: &ServiceDirectory<ServiceRef>) -> Result<StudentRef, StorageError> {
        let home = lookup_service(services, &self.home)?;
        let location = lookup_service(services, &self.location)?;
        let visited = self
            .visited
            .iter()
            .map(|name| lookup_service(services, name))
            .collect::<Result<Vec<_>, _>>()?;
        let cheapest_eating = self
            .cheapest_eating
            .as_deref()
            .map(|name| lookup_service(services, name))
            .transpose()?;
        let cheapest_lodging = self
            .cheapest_lodging
            .as_deref()
            .map(|name| lookup_service(services, name))
            .transpose()?;

        let mut student = Student::new(self.kind, &self.name, &self.country, &home);
        student.restore_state(location, &visited, cheapest_eating, cheapest_lodging);
        Ok(StudentRef::new(student))
    }
}

fn lookup_service(services: &ServiceDirectory<ServiceRef>, name: &str) -> Result<ServiceRef, StorageError> {
    services
        .get(name)
        .cloned()
        .ok_or_else(|| StorageError::Corrupt(format!("unknown service '{name}'")))
}

// ============================================================================
// AreaStore
// ============================================================================

/// File name used for an area: lowercased, spaces and path separators
/// replaced by `_`.
///
pub fn file_name(area_name: &str) -> String {
    let stem: String = area_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{stem}.{FILE_EXTENSION}")
}

/// Directory of saved areas, one JSON file each.
///
#[derive(Debug, Clone)]
pub struct AreaStore {
    data_dir: PathBuf,
}

impl AreaStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, area_name: &str) -> PathBuf {
        self.data_dir.join(file_name(area_name))
    }

    pub fn save(&self, area: &Area) -> Result<PathBuf, StorageError> {
        let path = self.path_for(area.name());
        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(&AreaSnapshot::capture(area))?;
        fs::write(&path, json).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        info!(area = area.name(), path = %path.display(), "area saved");
        Ok(path)
    }

    pub fn load(&self, area_name: &str) -> Result<Area, StorageError> {
        let path = self.path_for(area_name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(area_name.to_string()));
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        let snapshot: AreaSnapshot = serde_json::from_str(&json)?;
        let area = snapshot.restore()?;
        info!(area = area.name(), path = %path.display(), "area loaded");
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::Cursor;

    fn names<'a, E: Entity + 'a>(entities: impl IntoIterator<Item = &'a E>) -> Vec<String> {
        entities.into_iter().map(Entity::name).collect()
    }

    fn populated() -> Area {
        let mut area = Area::new("Old Town", Bounds::new(100, 0, 0, 100).unwrap());
        area.add_service(Some(ServiceType::Lodging), "Hostel", 10, 10, 20, 3).unwrap();
        area.add_service(Some(ServiceType::Lodging), "Dorm", 15, 10, 12, 3).unwrap();
        area.add_service(Some(ServiceType::Eating), "Canteen", 12, 10, 5, 4).unwrap();
        area.add_service(Some(ServiceType::Eating), "Bistro", 30, 30, 9, 4).unwrap();
        area.add_service(Some(ServiceType::Leisure), "Museum", 20, 20, 10, 50).unwrap();
        area.add_review("Bistro", 5, "cozy place").unwrap();
        area.add_review("Canteen", 1, "noisy").unwrap();

        area.add_student(Some(StudentType::Bookish), "Ana", "Portugal", "Hostel").unwrap();
        area.add_student(Some(StudentType::Outgoing), "Rui", "Portugal", "Hostel").unwrap();
        area.add_student(Some(StudentType::Thrifty), "Eva", "Spain", "Hostel").unwrap();
        area.go("Ana", "Museum").unwrap();
        area.go("Rui", "Bistro").unwrap();
        area.go("Eva", "Canteen").unwrap();
        area.go("Eva", "Bistro").unwrap();
        area.move_home("Eva", "Dorm").unwrap();
        area
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(" Old Town "), "old_town.json");
        assert_eq!(file_name("a/b"), "a_b.json");
    }

    #[test]
    fn test_snapshot_replay_preserves_observable_state() {
        let area = populated();
        let snapshot = AreaSnapshot::capture(&area);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: AreaSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);

        let replayed = restored.restore().unwrap();
        assert_eq!(replayed.name(), "Old Town");
        assert_eq!(replayed.bounds(), area.bounds());
        assert_eq!(names(replayed.services().iter()), names(area.services().iter()));
        assert_eq!(names(replayed.ranking()), names(area.ranking()));
        assert_eq!(names(replayed.tagged("cozy")), ["Bistro"]);
        assert_eq!(names(replayed.list_students("all")), names(area.list_students("all")));

        let (_, hostel) = replayed.users(">", "Hostel").unwrap();
        assert_eq!(names(&hostel), ["Ana", "Rui"]);
        let (_, bistro) = replayed.users(">", "Bistro").unwrap();
        assert_eq!(names(&bistro), ["Rui"]);

        let (_, visited) = replayed.visited("Rui").unwrap();
        assert_eq!(names(&visited), ["Hostel", "Bistro"]);
        let (_, location) = replayed.locate("Eva").unwrap();
        assert_eq!(location.name(), "Dorm");
        assert_eq!(replayed.find("Eva", Some(ServiceType::Eating)).unwrap().name(), "Canteen");
        assert!(replayed.tagged("noisy").has_next());
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AreaStore::new(dir.path().join("areas"));
        let path = store.save(&populated()).unwrap();
        assert_eq!(path, dir.path().join("areas").join("old_town.json"));

        let loaded = store.load("OLD TOWN").unwrap();
        assert_eq!(loaded.services().len(), 5);
        assert_eq!(loaded.students().len(), 3);
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = AreaStore::new(dir.path());
        assert!(matches!(store.load("nowhere"), Err(StorageError::NotFound(_))));

        fs::write(store.path_for("broken"), "{ not json").unwrap();
        assert!(matches!(store.load("broken"), Err(StorageError::Format(_))));

        let mut snapshot = AreaSnapshot::capture(&populated());
        snapshot.students[0].home = "Atlantis".to_string();
        assert!(matches!(snapshot.restore(), Err(StorageError::Corrupt(_))));
    }
}
