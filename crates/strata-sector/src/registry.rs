//! Sector registry
//!
//! Immutable mapping from [`Sector`] to its schema: human label, ordered
//! field descriptors, and capability toggles. Built once at process start;
//! pure lookups afterwards.

use crate::capabilities::SectorCapabilities;
use crate::field::FieldDescriptor;
use crate::sector::{Sector, UnknownSectorError};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Schema for one sector
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSchema {
    /// Human-facing sector label
    pub label: String,
    /// Ordered field descriptors; drives column presence and validators
    pub fields: Vec<FieldDescriptor>,
    /// Conditional-validation toggles
    pub capabilities: SectorCapabilities,
}

impl SectorSchema {
    /// Create a schema
    #[inline]
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        capabilities: SectorCapabilities,
    ) -> Self {
        Self {
            label: label.into(),
            fields,
            capabilities,
        }
    }

    /// Whether the schema declares the named field
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Look up a field descriptor by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Immutable sector-to-schema lookup
///
/// A registry may cover any subset of the taxonomy; [`SectorRegistry::builtin`]
/// covers all nine sectors with the production field tables.
#[derive(Debug, Clone, Default)]
pub struct SectorRegistry {
    schemas: BTreeMap<Sector, SectorSchema>,
}

impl SectorRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sector schema
    #[must_use]
    pub fn with_schema(mut self, sector: Sector, schema: SectorSchema) -> Self {
        self.schemas.insert(sector, schema);
        self
    }

    /// Shared handle to the built-in nine-sector registry
    #[must_use]
    pub fn builtin() -> Arc<SectorRegistry> {
        static BUILTIN: Lazy<Arc<SectorRegistry>> = Lazy::new(|| Arc::new(build_builtin()));
        Arc::clone(&BUILTIN)
    }

    /// Resolve a raw key against this registry
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] if the key is outside the taxonomy
    /// or the sector is not registered here.
    pub fn resolve(&self, key: &str) -> Result<Sector, UnknownSectorError> {
        let sector = Sector::from_key(key)?;
        if self.schemas.contains_key(&sector) {
            Ok(sector)
        } else {
            Err(UnknownSectorError {
                key: key.to_string(),
            })
        }
    }

    /// Ordered field descriptors for a sector
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] if the sector is not registered.
    pub fn fields_for(&self, sector: Sector) -> Result<&[FieldDescriptor], UnknownSectorError> {
        self.schema_for(sector).map(|s| s.fields.as_slice())
    }

    /// Capability toggles for a sector
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] if the sector is not registered.
    pub fn capabilities_for(
        &self,
        sector: Sector,
    ) -> Result<SectorCapabilities, UnknownSectorError> {
        self.schema_for(sector).map(|s| s.capabilities)
    }

    /// Full schema for a sector
    ///
    /// # Errors
    /// Fails with [`UnknownSectorError`] if the sector is not registered.
    pub fn schema_for(&self, sector: Sector) -> Result<&SectorSchema, UnknownSectorError> {
        self.schemas.get(&sector).ok_or_else(|| UnknownSectorError {
            key: sector.key().to_string(),
        })
    }

    /// Whether the sector is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, sector: Sector) -> bool {
        self.schemas.contains_key(&sector)
    }

    /// Registered sectors in key order
    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        self.schemas.keys().copied()
    }

    /// Number of registered sectors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

// Fields shared by every sector, in display order.
fn base_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("period", "Period"),
        FieldDescriptor::text("data_rating", "Data Rating"),
        FieldDescriptor::text("property_code", "Property Code").required(),
        FieldDescriptor::text("region", "Region").required(),
        FieldDescriptor::text("locality", "Locality"),
        FieldDescriptor::text("section", "Section"),
        FieldDescriptor::text("lga", "L.G.A"),
        FieldDescriptor::text("lcda", "L.C.D.A"),
        FieldDescriptor::text("street", "Street"),
        FieldDescriptor::text("street_number", "Street Number"),
        FieldDescriptor::text("development", "Development"),
        FieldDescriptor::text("construction_status", "Construction Status"),
        FieldDescriptor::number("size", "Size"),
        FieldDescriptor::text("updated_by", "Updated By"),
        FieldDescriptor::number("updated_by_id", "Updated By ID"),
    ]
}

fn with_base(extra: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let mut fields = base_fields();
    fields.extend(extra);
    fields
}

fn build_builtin() -> SectorRegistry {
    let mut registry = SectorRegistry::new();

    let table: [(Sector, &str, Vec<FieldDescriptor>); 9] = [
        (
            Sector::Residential,
            "Residential",
            vec![
                FieldDescriptor::text("building_type", "Building Type"),
                FieldDescriptor::number("number_of_units", "No of Units"),
                FieldDescriptor::number("number_of_beds", "No of Beds"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("rental_price", "Rental Price"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
                FieldDescriptor::currency("annual_service_charge", "Annual Service Charge"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
            ],
        ),
        (
            Sector::Land,
            "Land",
            vec![
                FieldDescriptor::number("land_area", "Land Area"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::currency("rental_price", "Rental Price"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
            ],
        ),
        (
            Sector::Healthcare,
            "Healthcare",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::number("number_of_beds", "No of Beds"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::text("operator", "Operator"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
            ],
        ),
        (
            Sector::Retail,
            "Retail",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::number("nlfa", "NLFA"),
                FieldDescriptor::number("number_of_floors", "No of Floors"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("rental_price", "Rental Price"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::currency("annual_service_charge", "Annual Service Charge"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
            ],
        ),
        (
            Sector::Hotel,
            "Hotel",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::number("number_of_keys", "Number of Keys"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::currency("daily_rate", "Daily Rate"),
                FieldDescriptor::text("room_type", "Room Type"),
                FieldDescriptor::text("operator", "Operator"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("developer", "Developer"),
            ],
        ),
        (
            Sector::Street,
            "Street",
            vec![
                FieldDescriptor::text("sector_name", "Sector"),
                FieldDescriptor::number("number_of_plots", "No of Plots"),
                FieldDescriptor::number("number_of_streets", "No of Streets"),
            ],
        ),
        (
            Sector::Industrial,
            "Industrial",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::text("building_type", "Building Type"),
                FieldDescriptor::number("number_of_bays", "No of Bay"),
                FieldDescriptor::number("nlfa", "NLFA"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("rental_price", "Rental Price"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::currency("annual_service_charge", "Annual Service Charge"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("contractor", "Contractor"),
            ],
        ),
        (
            Sector::Office,
            "Office",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::number("nlfa", "NLFA"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("rental_price", "Rental Price"),
                FieldDescriptor::currency("sale_price", "Sale Price"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
                FieldDescriptor::currency("annual_service_charge", "Annual Service Charge"),
                FieldDescriptor::number("number_of_floors", "No of Floors"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
            ],
        ),
        (
            Sector::Events,
            "Events",
            vec![
                FieldDescriptor::text("classification", "Classification"),
                FieldDescriptor::number("number_of_seats", "No of Seats"),
                FieldDescriptor::text("status", "Status"),
                FieldDescriptor::number("completion_year", "Completion Year"),
                FieldDescriptor::currency("daily_rate", "Daily Rates"),
                FieldDescriptor::text("developer", "Developer"),
                FieldDescriptor::text("contractor", "Contractor"),
                FieldDescriptor::text("facilities_manager", "Facilities Manager"),
                FieldDescriptor::text("contact_name", "Contact Name"),
                FieldDescriptor::text("contact_number", "Contact Number"),
            ],
        ),
    ];

    for (sector, label, extra) in table {
        registry = registry.with_schema(
            sector,
            SectorSchema::new(
                label,
                with_base(extra),
                SectorCapabilities::for_sector(sector),
            ),
        );
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_covers_all_sectors() {
        let registry = SectorRegistry::builtin();
        assert_eq!(registry.len(), Sector::ALL.len());
        for sector in Sector::ALL {
            assert!(registry.contains(sector));
            assert!(!registry.fields_for(sector).unwrap().is_empty());
        }
    }

    #[test]
    fn builtin_is_shared() {
        let a = SectorRegistry::builtin();
        let b = SectorRegistry::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolve_rejects_unknown_key() {
        let registry = SectorRegistry::builtin();
        assert!(registry.resolve("warehouse").is_err());
        assert_eq!(registry.resolve("land").unwrap(), Sector::Land);
    }

    #[test]
    fn resolve_rejects_unregistered_sector() {
        let registry = SectorRegistry::new().with_schema(
            Sector::Land,
            SectorSchema::new(
                "Land",
                base_fields(),
                SectorCapabilities::for_sector(Sector::Land),
            ),
        );
        assert!(registry.resolve("land").is_ok());
        // Valid taxonomy key, but not part of this registry.
        let err = registry.resolve("hotel").unwrap_err();
        assert_eq!(err.key, "hotel");
    }

    #[test]
    fn fields_for_unregistered_sector_fails() {
        let registry = SectorRegistry::new();
        assert!(registry.fields_for(Sector::Hotel).is_err());
    }

    #[test]
    fn sector_specific_fields_present() {
        let registry = SectorRegistry::builtin();
        let residential = registry.schema_for(Sector::Residential).unwrap();
        assert!(residential.has_field("number_of_units"));
        assert!(residential.has_field("region"));
        assert!(!residential.has_field("land_area"));

        let land = registry.schema_for(Sector::Land).unwrap();
        assert!(land.has_field("land_area"));
        assert!(!land.has_field("number_of_units"));
    }

    #[test]
    fn field_lookup_returns_descriptor() {
        let registry = SectorRegistry::builtin();
        let schema = registry.schema_for(Sector::Hotel).unwrap();
        let field = schema.field("daily_rate").unwrap();
        assert_eq!(field.display_label, "Daily Rate");
    }

    #[test]
    fn capabilities_come_from_the_toggle_table() {
        let registry = SectorRegistry::builtin();
        assert!(!registry.capabilities_for(Sector::Land).unwrap().requires_status);
        assert!(registry
            .capabilities_for(Sector::Residential)
            .unwrap()
            .requires_unit_count);
    }
}
