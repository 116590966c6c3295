use super::PlanStore;
use crate::error::{FertiplanError, Result};
use crate::models::{
    Crop, Cultivation, FertClass, Fertilization, Fertilizer, Field, Modifier, Parcel, SoilSample,
};

/// In-memory reference implementation of the persistence contract.
/// Inserts enforce the uniqueness invariants; deletes cascade the way
/// the data model prescribes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: i64,
    parcels: Vec<Parcel>,
    fields: Vec<Field>,
    soil_samples: Vec<SoilSample>,
    crops: Vec<Crop>,
    cultivations: Vec<Cultivation>,
    fertilizers: Vec<Fertilizer>,
    fertilizations: Vec<Fertilization>,
    modifiers: Vec<Modifier>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_id(&mut self, given: Option<i64>) -> i64 {
        let id = given.unwrap_or(self.next_id + 1);
        self.next_id = self.next_id.max(id);
        id
    }

    pub fn insert_parcel(&mut self, mut parcel: Parcel) -> Result<i64> {
        if self.parcels.iter().any(|p| {
            p.user_id == parcel.user_id && p.prefix == parcel.prefix && p.suffix == parcel.suffix
        }) {
            return Err(FertiplanError::Duplicate(format!(
                "parcel {:02}-{} already exists",
                parcel.prefix, parcel.suffix
            )));
        }
        let id = self.claim_id(parcel.id);
        parcel.id = Some(id);
        self.parcels.push(parcel);
        Ok(id)
    }

    pub fn insert_field(&mut self, mut field: Field) -> Result<i64> {
        if self.parcel(field.parcel_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "parcel {} for field",
                field.parcel_id
            )));
        }
        if self
            .find_field(field.parcel_id, field.sub_suffix, field.year)
            .is_some()
        {
            return Err(FertiplanError::Duplicate(format!(
                "field for parcel {} in {} already exists",
                field.parcel_id, field.year
            )));
        }
        let id = self.claim_id(field.id);
        field.id = Some(id);
        self.fields.push(field);
        Ok(id)
    }

    pub fn insert_soil_sample(&mut self, mut sample: SoilSample) -> Result<i64> {
        if self.parcel(sample.parcel_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "parcel {} for soil sample",
                sample.parcel_id
            )));
        }
        if self
            .soil_samples
            .iter()
            .any(|s| s.parcel_id == sample.parcel_id && s.year == sample.year)
        {
            return Err(FertiplanError::Duplicate(format!(
                "soil sample for parcel {} in {} already exists",
                sample.parcel_id, sample.year
            )));
        }
        let id = self.claim_id(sample.id);
        sample.id = Some(id);
        self.soil_samples.push(sample);
        Ok(id)
    }

    pub fn insert_crop(&mut self, mut crop: Crop) -> Result<i64> {
        if self
            .crops
            .iter()
            .any(|c| c.user_id == crop.user_id && c.name == crop.name)
        {
            return Err(FertiplanError::Duplicate(format!(
                "crop {} already exists",
                crop.name
            )));
        }
        let id = self.claim_id(crop.id);
        crop.id = Some(id);
        self.crops.push(crop);
        Ok(id)
    }

    pub fn insert_cultivation(&mut self, mut cultivation: Cultivation) -> Result<i64> {
        if self.field(cultivation.field_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "field {} for cultivation",
                cultivation.field_id
            )));
        }
        if self.crop(cultivation.crop_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "crop {} for cultivation",
                cultivation.crop_id
            )));
        }
        if self.cultivations.iter().any(|c| {
            c.field_id == cultivation.field_id
                && c.cultivation_type == cultivation.cultivation_type
        }) {
            return Err(FertiplanError::Duplicate(format!(
                "{} already exists on field {}",
                cultivation.cultivation_type, cultivation.field_id
            )));
        }
        let id = self.claim_id(cultivation.id);
        cultivation.id = Some(id);
        self.cultivations.push(cultivation);
        Ok(id)
    }

    pub fn insert_fertilizer(&mut self, mut fertilizer: Fertilizer) -> Result<i64> {
        let duplicate = self.fertilizers.iter().any(|f| {
            f.user_id == fertilizer.user_id
                && f.name == fertilizer.name
                && (fertilizer.fert_class == FertClass::Mineral || f.year == fertilizer.year)
        });
        if duplicate {
            return Err(FertiplanError::Duplicate(format!(
                "fertilizer {} already exists",
                fertilizer.name
            )));
        }
        let id = self.claim_id(fertilizer.id);
        fertilizer.id = Some(id);
        self.fertilizers.push(fertilizer);
        Ok(id)
    }

    pub fn insert_fertilization(&mut self, mut fertilization: Fertilization) -> Result<i64> {
        if self.field(fertilization.field_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "field {} for fertilization",
                fertilization.field_id
            )));
        }
        if self.cultivation(fertilization.cultivation_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "cultivation {} for fertilization",
                fertilization.cultivation_id
            )));
        }
        let Some(fertilizer) = self.fertilizer(fertilization.fertilizer_id) else {
            return Err(FertiplanError::NotFound(format!(
                "fertilizer {} for fertilization",
                fertilization.fertilizer_id
            )));
        };
        if fertilizer.fert_class == FertClass::Mineral {
            let duplicate = self.fertilizations.iter().any(|f| {
                f.cultivation_id == fertilization.cultivation_id
                    && f.measure == fertilization.measure
            });
            if duplicate {
                return Err(FertiplanError::Duplicate(format!(
                    "{} already applied to cultivation {}",
                    fertilization.measure, fertilization.cultivation_id
                )));
            }
        }
        let id = self.claim_id(fertilization.id);
        fertilization.id = Some(id);
        self.fertilizations.push(fertilization);
        Ok(id)
    }

    pub fn insert_modifier(&mut self, mut modifier: Modifier) -> Result<i64> {
        if self.field(modifier.field_id).is_none() {
            return Err(FertiplanError::NotFound(format!(
                "field {} for modifier",
                modifier.field_id
            )));
        }
        let id = self.claim_id(modifier.id);
        modifier.id = Some(id);
        self.modifiers.push(modifier);
        Ok(id)
    }

    pub fn update_fertilization(&mut self, fertilization: Fertilization) -> Result<()> {
        let id = fertilization.id.ok_or_else(|| {
            FertiplanError::InvalidData("fertilization has no id".to_string())
        })?;
        match self
            .fertilizations
            .iter_mut()
            .find(|f| f.id == Some(id))
        {
            Some(slot) => {
                *slot = fertilization;
                Ok(())
            }
            None => Err(FertiplanError::NotFound(format!("fertilization {id}"))),
        }
    }

    /// Delete a field and everything hanging off it.
    pub fn delete_field(&mut self, field_id: i64) -> Result<()> {
        if self.field(field_id).is_none() {
            return Err(FertiplanError::NotFound(format!("field {field_id}")));
        }
        self.cultivations.retain(|c| c.field_id != field_id);
        self.fertilizations.retain(|f| f.field_id != field_id);
        self.modifiers.retain(|m| m.field_id != field_id);
        self.fields.retain(|f| f.id != Some(field_id));
        Ok(())
    }

    /// Delete a parcel, its soil samples and all its fields.
    pub fn delete_parcel(&mut self, parcel_id: i64) -> Result<()> {
        if self.parcel(parcel_id).is_none() {
            return Err(FertiplanError::NotFound(format!("parcel {parcel_id}")));
        }
        let field_ids: Vec<i64> = self
            .fields_of(parcel_id)
            .iter()
            .filter_map(|f| f.id)
            .collect();
        for field_id in field_ids {
            self.delete_field(field_id)?;
        }
        self.soil_samples.retain(|s| s.parcel_id != parcel_id);
        self.parcels.retain(|p| p.id != Some(parcel_id));
        Ok(())
    }
}

impl PlanStore for MemoryStore {
    fn parcel(&self, id: i64) -> Option<Parcel> {
        self.parcels.iter().find(|p| p.id == Some(id)).cloned()
    }

    fn parcels_of(&self, user_id: i64) -> Vec<Parcel> {
        self.parcels
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    fn field(&self, id: i64) -> Option<Field> {
        self.fields.iter().find(|f| f.id == Some(id)).cloned()
    }

    fn find_field(&self, parcel_id: i64, sub_suffix: i64, year: i32) -> Option<Field> {
        self.fields
            .iter()
            .find(|f| f.parcel_id == parcel_id && f.sub_suffix == sub_suffix && f.year == year)
            .cloned()
    }

    fn fields_of(&self, parcel_id: i64) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|f| f.parcel_id == parcel_id)
            .cloned()
            .collect()
    }

    fn soil_samples_of(&self, parcel_id: i64) -> Vec<SoilSample> {
        self.soil_samples
            .iter()
            .filter(|s| s.parcel_id == parcel_id)
            .cloned()
            .collect()
    }

    fn crop(&self, id: i64) -> Option<Crop> {
        self.crops.iter().find(|c| c.id == Some(id)).cloned()
    }

    fn crops_of(&self, user_id: i64) -> Vec<Crop> {
        self.crops
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    fn cultivation(&self, id: i64) -> Option<Cultivation> {
        self.cultivations.iter().find(|c| c.id == Some(id)).cloned()
    }

    fn cultivations_of(&self, field_id: i64) -> Vec<Cultivation> {
        self.cultivations
            .iter()
            .filter(|c| c.field_id == field_id)
            .cloned()
            .collect()
    }

    fn fertilizer(&self, id: i64) -> Option<Fertilizer> {
        self.fertilizers.iter().find(|f| f.id == Some(id)).cloned()
    }

    fn fertilizers_of(&self, user_id: i64) -> Vec<Fertilizer> {
        self.fertilizers
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect()
    }

    fn fertilization(&self, id: i64) -> Option<Fertilization> {
        self.fertilizations
            .iter()
            .find(|f| f.id == Some(id))
            .cloned()
    }

    fn fertilizations_of(&self, field_id: i64) -> Vec<Fertilization> {
        self.fertilizations
            .iter()
            .filter(|f| f.field_id == field_id)
            .cloned()
            .collect()
    }

    fn all_fertilizations(&self) -> Vec<Fertilization> {
        self.fertilizations.clone()
    }

    fn modifiers_of(&self, field_id: i64) -> Vec<Modifier> {
        self.modifiers
            .iter()
            .filter(|m| m.field_id == field_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CropClass, CropType, CultivationType, FertType, FieldType, HumusType, MeasureType,
        SoilType,
    };
    use rust_decimal::Decimal;

    fn seeded() -> (MemoryStore, i64, i64) {
        let mut store = MemoryStore::new();
        let parcel_id = store.insert_parcel(Parcel::new(1, 1, 0, "Am Hof")).unwrap();
        let field_id = store
            .insert_field(Field::new(
                parcel_id,
                2024,
                Decimal::from(3),
                FieldType::Cropland,
            ))
            .unwrap();
        (store, parcel_id, field_id)
    }

    #[test]
    fn parcel_prefix_suffix_unique_per_owner() {
        let (mut store, _, _) = seeded();
        assert!(store.insert_parcel(Parcel::new(1, 1, 0, "Kopie")).is_err());
        // a different owner may reuse the numbers
        assert!(store.insert_parcel(Parcel::new(2, 1, 0, "Fremd")).is_ok());
    }

    #[test]
    fn field_unique_per_parcel_year() {
        let (mut store, parcel_id, _) = seeded();
        assert!(store
            .insert_field(Field::new(
                parcel_id,
                2024,
                Decimal::ONE,
                FieldType::Cropland
            ))
            .is_err());
        assert!(store
            .insert_field(
                Field::new(parcel_id, 2024, Decimal::ONE, FieldType::Cropland)
                    .with_sub_suffix(1)
            )
            .is_ok());
    }

    #[test]
    fn soil_sample_unique_per_parcel_year() {
        let (mut store, parcel_id, _) = seeded();
        store
            .insert_soil_sample(SoilSample::new(
                parcel_id,
                2024,
                SoilType::Sand,
                HumusType::Less4,
            ))
            .unwrap();
        assert!(store
            .insert_soil_sample(SoilSample::new(
                parcel_id,
                2024,
                SoilType::Moor,
                HumusType::More30,
            ))
            .is_err());
    }

    #[test]
    fn organic_fertilizers_are_yearly_minerals_not() {
        let mut store = MemoryStore::new();
        store
            .insert_fertilizer(Fertilizer::new(1, "Gülle", 2023, FertType::OrgSlurry))
            .unwrap();
        assert!(store
            .insert_fertilizer(Fertilizer::new(1, "Gülle", 2024, FertType::OrgSlurry))
            .is_ok());
        store
            .insert_fertilizer(Fertilizer::new(1, "KAS", 2023, FertType::N))
            .unwrap();
        assert!(store
            .insert_fertilizer(Fertilizer::new(1, "KAS", 2024, FertType::N))
            .is_err());
    }

    #[test]
    fn mineral_measures_unique_per_cultivation() {
        let (mut store, _, field_id) = seeded();
        let crop_id = store
            .insert_crop(Crop::new(
                1,
                "W.-Gerste",
                FieldType::Cropland,
                CropClass::MainCrop,
                CropType::Grain,
            ))
            .unwrap();
        let cultivation_id = store
            .insert_cultivation(Cultivation::new(
                field_id,
                CultivationType::MainCrop,
                crop_id,
                Decimal::from(70),
            ))
            .unwrap();
        let mineral_id = store
            .insert_fertilizer(Fertilizer::new(1, "KAS", 2024, FertType::N))
            .unwrap();
        let organic_id = store
            .insert_fertilizer(Fertilizer::new(1, "Gülle", 2024, FertType::OrgSlurry))
            .unwrap();
        store
            .insert_fertilization(Fertilization::new(
                field_id,
                cultivation_id,
                mineral_id,
                MeasureType::FirstNFert,
                Decimal::ONE,
            ))
            .unwrap();
        assert!(store
            .insert_fertilization(Fertilization::new(
                field_id,
                cultivation_id,
                mineral_id,
                MeasureType::FirstNFert,
                Decimal::TWO,
            ))
            .is_err());
        // organic measures may repeat
        for _ in 0..2 {
            store
                .insert_fertilization(Fertilization::new(
                    field_id,
                    cultivation_id,
                    organic_id,
                    MeasureType::OrgFall,
                    Decimal::ONE,
                ))
                .unwrap();
        }
    }

    #[test]
    fn deleting_a_parcel_cascades() {
        let (mut store, parcel_id, field_id) = seeded();
        let crop_id = store
            .insert_crop(Crop::new(
                1,
                "W.-Gerste",
                FieldType::Cropland,
                CropClass::MainCrop,
                CropType::Grain,
            ))
            .unwrap();
        let cultivation_id = store
            .insert_cultivation(Cultivation::new(
                field_id,
                CultivationType::MainCrop,
                crop_id,
                Decimal::from(70),
            ))
            .unwrap();
        let fertilizer_id = store
            .insert_fertilizer(Fertilizer::new(1, "Gülle", 2024, FertType::OrgSlurry))
            .unwrap();
        store
            .insert_fertilization(Fertilization::new(
                field_id,
                cultivation_id,
                fertilizer_id,
                MeasureType::OrgFall,
                Decimal::ONE,
            ))
            .unwrap();
        store
            .insert_soil_sample(SoilSample::new(
                parcel_id,
                2023,
                SoilType::Sand,
                HumusType::Less4,
            ))
            .unwrap();

        store.delete_parcel(parcel_id).unwrap();
        assert!(store.parcel(parcel_id).is_none());
        assert!(store.field(field_id).is_none());
        assert!(store.cultivations_of(field_id).is_empty());
        assert!(store.fertilizations_of(field_id).is_empty());
        assert!(store.soil_samples_of(parcel_id).is_empty());
        // crops and fertilizers survive, they belong to the owner
        assert!(store.crop(crop_id).is_some());
        assert!(store.fertilizer(fertilizer_id).is_some());
    }

    #[test]
    fn referential_checks_on_insert() {
        let mut store = MemoryStore::new();
        assert!(store
            .insert_field(Field::new(99, 2024, Decimal::ONE, FieldType::Cropland))
            .is_err());
        let (mut store, _, field_id) = seeded();
        assert!(store
            .insert_cultivation(Cultivation::new(
                field_id,
                CultivationType::MainCrop,
                42,
                Decimal::ONE,
            ))
            .is_err());
    }
}
