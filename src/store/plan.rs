use super::MemoryStore;
use crate::error::Result;
use crate::models::{
    Crop, Cultivation, Fertilization, Fertilizer, Field, Modifier, Parcel, SoilSample,
};
use crate::utils::load_json;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A whole plan as one JSON document, the CLI's input format. Entities
/// reference each other by explicit ids.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub parcels: Vec<Parcel>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub soil_samples: Vec<SoilSample>,
    #[serde(default)]
    pub crops: Vec<Crop>,
    #[serde(default)]
    pub fertilizers: Vec<Fertilizer>,
    #[serde(default)]
    pub cultivations: Vec<Cultivation>,
    #[serde(default)]
    pub fertilizations: Vec<Fertilization>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Build a store from the plan, inserting in dependency order so
    /// every referential and uniqueness invariant is checked.
    pub fn into_store(self) -> Result<MemoryStore> {
        let mut store = MemoryStore::new();
        for parcel in self.parcels {
            store.insert_parcel(parcel)?;
        }
        for field in self.fields {
            store.insert_field(field)?;
        }
        for sample in self.soil_samples {
            store.insert_soil_sample(sample)?;
        }
        for crop in self.crops {
            store.insert_crop(crop)?;
        }
        for fertilizer in self.fertilizers {
            store.insert_fertilizer(fertilizer)?;
        }
        for cultivation in self.cultivations {
            store.insert_cultivation(cultivation)?;
        }
        for fertilization in self.fertilizations {
            store.insert_fertilization(fertilization)?;
        }
        for modifier in self.modifiers {
            store.insert_modifier(modifier)?;
        }
        Ok(store)
    }
}
