//! Sector-conditional control activation
//!
//! The control set is recomputed whenever the user changes the sector
//! selector. Two cross-cutting rules are load-bearing: the `Unclassified`
//! sentinel swaps the dependent sub-classification control for a required
//! free-text sector name, and the capability toggles steer the
//! construction-status / unit-count / size validators.

use crate::store::{FormSnapshot, FormStateStore};
use crate::validate::{FieldError, ValidationErrors, Validator};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_sector::{
    FieldValue, Sector, SectorCapabilities, SectorRegistry, UnknownSectorError,
};
use tracing::{debug, warn};

/// Dependent sub-classification control, present for registered sectors
pub const SUB_CLASSIFICATION: &str = "sub_classification";
/// Free-text sector name, present only for the `Unclassified` sentinel
pub const CUSTOM_SECTOR_NAME: &str = "custom_sector_name";
/// Construction-status control, toggled by `requires_status`
pub const CONSTRUCTION_STATUS: &str = "construction_status";
/// Unit-count control, toggled by `requires_unit_count`
pub const UNIT_COUNT: &str = "number_of_units";
/// Size control, toggled by `requires_size`
pub const SIZE: &str = "size";

/// The user's sector choice in the form
///
/// The sentinel is distinct from every registered key: it means "none of
/// the registered sectors apply", and it activates the free-text name
/// control instead of the dependent sub-classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorSelection {
    /// One of the registered sectors
    Registered(Sector),
    /// The sentinel "unclassified" choice
    Unclassified,
}

impl SectorSelection {
    /// Sentinel key used in the selector widget
    pub const UNCLASSIFIED_KEY: &'static str = "unclassified";

    /// Parse a selector value
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] for keys that are neither the
    /// sentinel nor a registered sector.
    pub fn parse(key: &str) -> Result<Self, UnknownSectorError> {
        if key == Self::UNCLASSIFIED_KEY {
            Ok(SectorSelection::Unclassified)
        } else {
            Sector::from_key(key).map(SectorSelection::Registered)
        }
    }
}

/// One form control: current value plus attached validators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormControl {
    /// Current value
    pub value: FieldValue,
    /// Active validators
    pub validators: Vec<Validator>,
}

impl FormControl {
    /// Whether a required validator is attached
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validators.contains(&Validator::Required)
    }
}

/// The active control set for one form session
///
/// Destroyed with the form; nothing here outlives the view.
pub struct FormSchema {
    registry: Arc<SectorRegistry>,
    selection: Option<SectorSelection>,
    controls: BTreeMap<String, FormControl>,
    store: Option<Arc<dyn FormStateStore>>,
    storage_key: String,
}

impl FormSchema {
    /// Create a schema with the standing cross-cutting controls
    ///
    /// The construction-status, unit-count, and size controls exist from
    /// the start; their validators are attached per sector capabilities on
    /// selection.
    #[must_use]
    pub fn new(registry: Arc<SectorRegistry>) -> Self {
        let mut controls = BTreeMap::new();
        for name in [CONSTRUCTION_STATUS, UNIT_COUNT, SIZE] {
            controls.insert(name.to_string(), FormControl::default());
        }
        Self {
            registry,
            selection: None,
            controls,
            store: None,
            storage_key: String::new(),
        }
    }

    /// Attach a persistence collaborator
    ///
    /// Snapshots are saved under the key on every value change and on
    /// sector selection; call [`Self::restore`] at initialization to pick
    /// up a previous session.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn FormStateStore>, key: impl Into<String>) -> Self {
        self.store = Some(store);
        self.storage_key = key.into();
        self
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> Option<SectorSelection> {
        self.selection
    }

    /// Look up a control
    #[inline]
    #[must_use]
    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls.get(name)
    }

    /// Whether the named control exists
    #[inline]
    #[must_use]
    pub fn contains_control(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    /// Whether the named control carries a required validator
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.controls.get(name).is_some_and(FormControl::is_required)
    }

    /// Current value of a control
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.controls.get(name).map(|c| &c.value)
    }

    /// Controls in name order
    pub fn controls(&self) -> impl Iterator<Item = (&str, &FormControl)> {
        self.controls.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Apply a sector selection, recomputing activation state
    ///
    /// Validators on every existing control are cleared first, so fields
    /// that are no longer relevant cannot block submission; the new
    /// sector's required set is then attached.
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] when a registered selection is not
    /// covered by the registry; the control set is left untouched.
    pub fn select_sector(&mut self, selection: SectorSelection) -> Result<(), UnknownSectorError> {
        match selection {
            SectorSelection::Registered(sector) => self.activate_registered(sector)?,
            SectorSelection::Unclassified => self.activate_unclassified(),
        }
        self.selection = Some(selection);
        self.persist();
        Ok(())
    }

    fn activate_registered(&mut self, sector: Sector) -> Result<(), UnknownSectorError> {
        let schema = self.registry.schema_for(sector)?.clone();
        let capabilities = schema.capabilities;
        debug!(%sector, "activating registered sector");

        self.clear_all_validators();

        for field in &schema.fields {
            let control = self.controls.entry(field.name.clone()).or_default();
            if field.required {
                control.validators.push(Validator::Required);
            }
        }

        // Sentinel leftovers and the dependent control.
        self.controls.remove(CUSTOM_SECTOR_NAME);
        let sub = self
            .controls
            .entry(SUB_CLASSIFICATION.to_string())
            .or_default();
        sub.validators = vec![Validator::Required];

        self.apply_capabilities(capabilities);
        Ok(())
    }

    fn activate_unclassified(&mut self) {
        debug!("activating unclassified sentinel");
        self.clear_all_validators();

        self.controls.remove(SUB_CLASSIFICATION);
        let custom = self
            .controls
            .entry(CUSTOM_SECTOR_NAME.to_string())
            .or_default();
        custom.validators = vec![Validator::Required];

        // The sentinel follows the default toggle row: status and size
        // required, unit count exempt.
        self.apply_capabilities(SectorCapabilities {
            requires_status: true,
            requires_unit_count: false,
            requires_size: true,
        });
    }

    fn apply_capabilities(&mut self, capabilities: SectorCapabilities) {
        for (name, required) in [
            (CONSTRUCTION_STATUS, capabilities.requires_status),
            (UNIT_COUNT, capabilities.requires_unit_count),
            (SIZE, capabilities.requires_size),
        ] {
            let control = self.controls.entry(name.to_string()).or_default();
            control.validators = if required {
                vec![Validator::Required]
            } else {
                Vec::new()
            };
        }
    }

    fn clear_all_validators(&mut self) {
        for control in self.controls.values_mut() {
            control.validators.clear();
        }
    }

    /// Set a control value, persisting the snapshot
    ///
    /// Values for controls outside the active set are dropped with a
    /// warning rather than creating phantom controls.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) {
        let Some(control) = self.controls.get_mut(name) else {
            warn!(control = %name, "ignoring value for inactive control");
            return;
        };
        control.value = value.into();
        self.persist();
    }

    /// Validate every control against its attached validators
    ///
    /// # Errors
    /// Fails with [`ValidationErrors`] listing each failed control; the
    /// failure blocks submission and goes no further.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors: Vec<FieldError> = self
            .controls
            .iter()
            .flat_map(|(name, control)| {
                control.validators.iter().filter_map(|validator| {
                    validator.check(&control.value).map(|kind| FieldError {
                        field: name.clone(),
                        kind,
                    })
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Snapshot of all control values
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        self.controls
            .iter()
            .map(|(name, control)| (name.clone(), control.value.clone()))
            .collect()
    }

    /// Restore values from the attached store
    ///
    /// Unknown control names in the stored snapshot are ignored, as is a
    /// snapshot that no longer parses. Restoring does not re-trigger
    /// persistence.
    pub fn restore(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let Some(raw) = store.load(&self.storage_key) else {
            return;
        };
        let snapshot: FormSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = %self.storage_key, %err, "discarding unreadable form snapshot");
                return;
            }
        };
        for (name, value) in snapshot {
            if let Some(control) = self.controls.get_mut(&name) {
                control.value = value;
            }
        }
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        match serde_json::to_string(&self.snapshot()) {
            Ok(serialized) => store.save(&self.storage_key, &serialized),
            Err(err) => warn!(key = %self.storage_key, %err, "failed to serialize form snapshot"),
        }
    }
}
