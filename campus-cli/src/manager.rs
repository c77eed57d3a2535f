use tracing::{info, warn};

use crate::area::{Area, Bounds};
use crate::error::{CommandError, StorageError};
use crate::storage::AreaStore;

/// Holds the area currently being edited and swaps it with saved ones.
///
/// Creating or loading an area saves the current one first. A failed save
/// at that point is logged and otherwise ignored.
///
pub struct SystemManager {
    current: Option<Area>,
    store: AreaStore,
}

impl SystemManager {
    pub fn new(store: AreaStore) -> Self {
        Self { current: None, store }
    }

    pub fn has_area(&self) -> bool {
        self.current.is_some()
    }

    pub fn area(&self) -> Result<&Area, CommandError> {
        self.current.as_ref().ok_or(CommandError::NoAreaLoaded)
    }

    pub fn area_mut(&mut self) -> Result<&mut Area, CommandError> {
        self.current.as_mut().ok_or(CommandError::NoAreaLoaded)
    }

    /// Starts a new, empty area.
    ///
    /// Rejected when it would clash with the current area, either by name
    /// (ignoring case) or by identical bounds.
    ///
    pub fn create_area(
        &mut self,
        name: &str,
        top: i64,
        left: i64,
        bottom: i64,
        right: i64,
    ) -> Result<&Area, CommandError> {
        let bounds = Bounds::new(top, left, bottom, right)?;
        if let Some(current) = &self.current
            && (current.name().to_lowercase() == name.to_lowercase() || current.bounds() == bounds)
        {
            return Err(CommandError::BoundsAlreadyExist);
        }

        self.save_quietly();
        info!(area = name, "area created");
        Ok(self.current.insert(Area::new(name, bounds)))
    }

    /// Replaces the current area with a saved one.
    ///
    /// On failure no area is loaded afterwards.
    ///
    pub fn load_area(&mut self, name: &str) -> Result<&Area, CommandError> {
        self.save_quietly();
        match self.store.load(name) {
            Ok(area) => Ok(self.current.insert(area)),
            Err(error) => {
                if !matches!(error, StorageError::NotFound(_)) {
                    warn!(area = name, %error, "could not load area");
                }
                self.current = None;
                Err(CommandError::BoundsNotFound(name.to_string()))
            }
        }
    }

    pub fn save_area(&self) -> Result<&Area, CommandError> {
        let area = self.area()?;
        self.store.save(area).map_err(|source| CommandError::SaveFailed {
            name: area.name().to_string(),
            source,
        })?;
        Ok(area)
    }

    /// Saves the current area, if any, before the session ends.
    pub fn shutdown(&self) {
        self.save_quietly();
    }

    fn save_quietly(&self) {
        if let Some(area) = &self.current
            && let Err(error) = self.store.save(area)
        {
            warn!(area = area.name(), %error, "could not save area");
        }
    }
}
