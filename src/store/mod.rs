//! Persistence contract of the engine. A production deployment brings
//! its own database behind [`PlanStore`]; the crate ships an in-memory
//! reference implementation that enforces the uniqueness invariants and
//! cascade rules at the store boundary, plus a JSON plan-file loader.

pub mod memory;
pub mod plan;

pub use memory::MemoryStore;
pub use plan::PlanFile;

use crate::models::{
    Crop, Cultivation, Fertilization, Fertilizer, Field, Modifier, Parcel, SoilSample,
};

/// Read access the engine expects from the storage collaborator.
pub trait PlanStore {
    fn parcel(&self, id: i64) -> Option<Parcel>;
    fn parcels_of(&self, user_id: i64) -> Vec<Parcel>;

    fn field(&self, id: i64) -> Option<Field>;
    fn find_field(&self, parcel_id: i64, sub_suffix: i64, year: i32) -> Option<Field>;
    fn fields_of(&self, parcel_id: i64) -> Vec<Field>;

    fn soil_samples_of(&self, parcel_id: i64) -> Vec<SoilSample>;

    fn crop(&self, id: i64) -> Option<Crop>;
    fn crops_of(&self, user_id: i64) -> Vec<Crop>;

    fn cultivation(&self, id: i64) -> Option<Cultivation>;
    fn cultivations_of(&self, field_id: i64) -> Vec<Cultivation>;

    fn fertilizer(&self, id: i64) -> Option<Fertilizer>;
    fn fertilizers_of(&self, user_id: i64) -> Vec<Fertilizer>;

    fn fertilization(&self, id: i64) -> Option<Fertilization>;
    fn fertilizations_of(&self, field_id: i64) -> Vec<Fertilization>;
    fn all_fertilizations(&self) -> Vec<Fertilization>;

    fn modifiers_of(&self, field_id: i64) -> Vec<Modifier>;
}
