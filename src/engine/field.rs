use super::balance::Balance;
use super::crop::Crop;
use super::cultivation::{Cultivation, DemandOptions};
use super::fertilization::Fertilization;
use super::fertilizer::Fertilizer;
use super::soil::{create_soil, Soil};
use crate::guidelines::Guidelines;
use crate::models::{
    self, CropClass, CultivationType, DemandType, FertClass, FieldType, MeasureType, Modifier,
    Parcel,
};
use crate::store::PlanStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

/// Autumn organic-N limit on cropland, kg N/ha.
const FALL_N_LIMIT: i64 = 60;
/// Autumn ammonium limit on cropland, kg NH4-N/ha.
const FALL_NH4_LIMIT: i64 = 30;
/// Autumn organic-N limit for grassland and feedable main crops.
const FALL_FEEDABLE_N_LIMIT: i64 = 80;
/// The feedable limit drops to this in red regions.
const FALL_RED_REGION_N_LIMIT: i64 = 60;

/// Outcome of the autumn organic-fertilization check.
#[derive(Debug, Clone, PartialEq)]
pub enum FallCheck {
    Accepted,
    /// The proposal exceeds the legal limit; `max_amount` is the largest
    /// amount that would still pass.
    Rejected { max_amount: Decimal },
}

/// One parcel-year with everything the balance calculation needs: the
/// cultivations, fertilizations, modifiers, the soil sample in effect
/// and a read-only view of the previous year.
#[derive(Debug, Clone)]
pub struct Field {
    pub parcel: Parcel,
    pub sub_suffix: i64,
    pub year: i32,
    pub area: Decimal,
    pub field_type: FieldType,
    pub red_region: bool,
    pub demand_p2o5: DemandType,
    pub demand_k2o: DemandType,
    pub demand_mgo: DemandType,
    pub cultivations: Vec<Cultivation>,
    pub fertilizations: Vec<Fertilization>,
    pub modifiers: Vec<Modifier>,
    pub soil: Option<Soil>,
    pub prev_year: Option<Box<Field>>,
}

/// Assemble the field of `(parcel, sub_suffix, year)` from the store,
/// including one level of the previous year. Returns `None` when parcel
/// or field do not exist.
pub fn load_field<S: PlanStore + ?Sized>(
    store: &S,
    guidelines: &Arc<Guidelines>,
    parcel_id: i64,
    sub_suffix: i64,
    year: i32,
) -> Option<Field> {
    load_level(store, guidelines, parcel_id, sub_suffix, year, true)
}

fn load_level<S: PlanStore + ?Sized>(
    store: &S,
    guidelines: &Arc<Guidelines>,
    parcel_id: i64,
    sub_suffix: i64,
    year: i32,
    with_prev: bool,
) -> Option<Field> {
    let parcel = store.parcel(parcel_id)?;
    let record = store.find_field(parcel_id, sub_suffix, year)?;
    let field_id = record.id?;
    let mut field = Field::new(parcel, &record);

    for cultivation in store.cultivations_of(field_id) {
        let Some(crop_record) = store.crop(cultivation.crop_id) else {
            warn!(crop_id = cultivation.crop_id, "cultivation references missing crop");
            continue;
        };
        field.cultivations.push(Cultivation::new(
            &cultivation,
            Crop::new(&crop_record, guidelines.clone()),
            guidelines.clone(),
        ));
    }

    for fertilization in store.fertilizations_of(field_id) {
        let Some(cultivation) = store.cultivation(fertilization.cultivation_id) else {
            warn!(
                cultivation_id = fertilization.cultivation_id,
                "fertilization references missing cultivation"
            );
            continue;
        };
        let Some(crop_record) = store.crop(cultivation.crop_id) else {
            warn!(crop_id = cultivation.crop_id, "cultivation references missing crop");
            continue;
        };
        let Some(fertilizer_record) = store.fertilizer(fertilization.fertilizer_id) else {
            warn!(
                fertilizer_id = fertilization.fertilizer_id,
                "fertilization references missing fertilizer"
            );
            continue;
        };
        field.fertilizations.push(Fertilization::new(
            &fertilization,
            Fertilizer::new(&fertilizer_record, guidelines.clone()),
            Crop::new(&crop_record, guidelines.clone()),
            cultivation.cultivation_type,
        ));
    }

    field.modifiers = store.modifiers_of(field_id);
    field.soil = create_soil(
        &store.soil_samples_of(parcel_id),
        record.field_type,
        year,
        guidelines,
    );
    if with_prev {
        field.prev_year = load_level(store, guidelines, parcel_id, sub_suffix, year - 1, false)
            .map(Box::new);
    }
    Some(field)
}

impl Field {
    pub fn new(parcel: Parcel, record: &models::Field) -> Self {
        Self {
            parcel,
            sub_suffix: record.sub_suffix,
            year: record.year,
            area: record.area,
            field_type: record.field_type,
            red_region: record.red_region,
            demand_p2o5: record.demand_p2o5,
            demand_k2o: record.demand_k2o,
            demand_mgo: record.demand_mgo,
            cultivations: Vec::new(),
            fertilizations: Vec::new(),
            modifiers: Vec::new(),
            soil: None,
            prev_year: None,
        }
    }

    pub fn demand_options(&self) -> DemandOptions {
        DemandOptions {
            p2o5: self.demand_p2o5,
            k2o: self.demand_k2o,
            mgo: self.demand_mgo,
        }
    }

    pub fn cultivation(&self, cultivation_type: CultivationType) -> Option<&Cultivation> {
        self.cultivations
            .iter()
            .find(|c| c.is_class(cultivation_type))
    }

    pub fn main_crop(&self) -> Option<&Cultivation> {
        self.cultivation(CultivationType::MainCrop)
    }

    pub fn second_main_crop(&self) -> Option<&Cultivation> {
        self.cultivation(CultivationType::SecondMainCrop)
    }

    pub fn second_crop(&self) -> Option<&Cultivation> {
        self.cultivation(CultivationType::SecondCrop)
    }

    pub fn catch_crop(&self) -> Option<&Cultivation> {
        self.cultivation(CultivationType::CatchCrop)
    }

    /// Predecessor of this year's main crop: the catch crop if one is
    /// grown, otherwise the previous year's second or main crop.
    pub fn previous_crop(&self) -> Option<&Cultivation> {
        if let Some(catch) = self.catch_crop() {
            return Some(catch);
        }
        let prev = self.prev_year.as_deref()?;
        prev.second_crop().or_else(|| prev.main_crop())
    }

    /// Total organic N over all fertilizations, restricted by the
    /// optional measure and cultivation filters.
    pub fn n_ges(
        &self,
        measure: Option<MeasureType>,
        cultivation: Option<CultivationType>,
        netto: bool,
    ) -> Decimal {
        self.fertilizations
            .iter()
            .map(|f| f.n_total(measure, cultivation, netto))
            .sum()
    }

    /// Supplied nutrients of all fertilizations of the given class.
    pub fn sum_fertilizations(&self, fert_class: Option<FertClass>) -> Balance {
        let mut sum = Balance::new("Fertilizations");
        for fertilization in &self.fertilizations {
            if fert_class.is_none_or(|fc| fertilization.fertilizer.is_class(fc)) {
                sum.add(&fertilization.nutrients(self.field_type));
            }
        }
        sum
    }

    /// Nutrient demand of all cultivations except catch crops.
    pub fn sum_demands(&self, negative: bool) -> Balance {
        let mut sum = Balance::new("Demands");
        for cultivation in &self.cultivations {
            if cultivation.crop_class() == CropClass::CatchCrop {
                continue;
            }
            sum.add(&cultivation.demand(self.demand_options(), negative));
        }
        sum
    }

    /// Every reduction granted this year: soil reserve, previous-year
    /// redelivery and the per-cultivation crop reductions.
    pub fn sum_reductions(&self) -> Balance {
        let mut sum = Balance::new("Reductions");
        sum.add(&self.soil_reductions());
        sum.add(&self.redelivery());
        for cultivation in &self.cultivations {
            sum.add(&self.crop_reductions(cultivation));
        }
        sum
    }

    /// Reductions from the soil sample in effect. Base nutrients only
    /// count when the field is fertilized for demand; the lime
    /// requirement switches to preservation once the sample is older
    /// than three years.
    pub fn soil_reductions(&self) -> Balance {
        let mut balance = Balance::new("Soil reductions");
        let Some(soil) = &self.soil else {
            return balance;
        };
        if !self.field_type.is_productive() {
            return balance;
        }
        if self.demand_p2o5 == DemandType::Demand {
            balance.p2o5 += soil.reduction_p2o5();
        }
        if self.demand_k2o == DemandType::Demand {
            balance.k2o += soil.reduction_k2o();
        }
        if self.demand_mgo == DemandType::Demand {
            balance.mgo += soil.reduction_mg();
        }
        balance.n += soil.reduction_n();
        if let Some(main) = self.main_crop() {
            balance.s += soil.reduction_s(
                main.crop.s_demand(),
                self.n_ges(None, Some(CultivationType::MainCrop), false),
            );
        }
        let preservation = soil.year + 3 < self.year;
        balance.cao += soil.reduction_cao(preservation);
        balance
    }

    /// Nutrients left over from the previous period.
    pub fn redelivery(&self) -> Balance {
        let mut balance = Balance::new("Redelivery");
        if self.prev_year.is_some() {
            balance.n += self.n_redelivery();
            balance.cao += self.cao_saldo();
        }
        balance
    }

    /// 10% of the organic N spread in the previous spring and on this
    /// year's catch crop in fall becomes available again.
    pub fn n_redelivery(&self) -> Decimal {
        let Some(prev) = self.prev_year.as_deref() else {
            return Decimal::ZERO;
        };
        let prev_spring = prev.n_ges(Some(MeasureType::OrgSpring), None, false);
        let fall = self.n_ges(
            Some(MeasureType::OrgFall),
            Some(CultivationType::CatchCrop),
            false,
        );
        (prev_spring + fall) * Decimal::new(1, 1)
    }

    /// CaO left over from the previous year: its fertilizations minus
    /// its demands, reductions deliberately not included.
    pub fn cao_saldo(&self) -> Decimal {
        match self.prev_year.as_deref() {
            Some(prev) => (prev.sum_fertilizations(None) + prev.sum_demands(true)).cao,
            None => Decimal::ZERO,
        }
    }

    fn crop_reductions(&self, cultivation: &Cultivation) -> Balance {
        let mut balance = Balance::new(cultivation.crop.name());
        balance.n += cultivation.reduction();
        balance.n += self.pre_crop_effect_for(cultivation);
        balance
    }

    /// Preceding-crop effect credited to a cultivation; only cropland
    /// successions earn one.
    fn pre_crop_effect_for(&self, cultivation: &Cultivation) -> Decimal {
        if self.field_type != FieldType::Cropland
            || cultivation.crop_class() == CropClass::CatchCrop
        {
            return Decimal::ZERO;
        }
        let predecessor = if cultivation.crop_class() == CropClass::MainCrop {
            self.previous_crop()
        } else {
            self.main_crop()
        };
        predecessor.map(|p| p.pre_crop_effect()).unwrap_or_default()
    }

    /// One balance per cultivation, titled with its crop: demand,
    /// applicable reductions and the fertilizations applied to it.
    pub fn crop_balances(&self) -> Vec<Balance> {
        CultivationType::all()
            .iter()
            .filter_map(|ct| self.cultivation(*ct))
            .map(|cultivation| self.crop_balance(cultivation))
            .collect()
    }

    fn crop_balance(&self, cultivation: &Cultivation) -> Balance {
        let mut balance = cultivation.demand(self.demand_options(), true);
        balance.title = cultivation.crop.name().to_string();
        // soil reductions count once, against the main crop
        if cultivation.is_class(CultivationType::MainCrop) {
            balance.add(&self.soil_reductions());
        }
        balance.add(&self.crop_reductions(cultivation));
        for fertilization in &self.fertilizations {
            if fertilization.cultivation_type == cultivation.cultivation_type {
                balance.add(&fertilization.nutrients(self.field_type));
            }
        }
        balance
    }

    /// Aggregated views: organic fertilizations by season, mineral
    /// fertilizations by measure, soil reductions once.
    pub fn category_balances(&self) -> Vec<Balance> {
        let mut balances = Vec::new();
        for (measure, title) in [
            (MeasureType::OrgFall, "Organic fall"),
            (MeasureType::OrgSpring, "Organic spring"),
        ] {
            let mut sum = Balance::new(title);
            for fertilization in &self.fertilizations {
                if fertilization.fertilizer.is_organic() && fertilization.measure == measure {
                    sum.add(&fertilization.nutrients(self.field_type));
                }
            }
            if !sum.is_empty() {
                balances.push(sum);
            }
        }
        for measure in MeasureType::all().iter().filter(|m| m.is_mineral()) {
            let mut sum = Balance::new(measure.as_str());
            for fertilization in &self.fertilizations {
                if fertilization.fertilizer.is_mineral() && fertilization.measure == *measure {
                    sum.add(&fertilization.nutrients(self.field_type));
                }
            }
            if !sum.is_empty() {
                balances.push(sum);
            }
        }
        balances.push(self.soil_reductions());
        balances
    }

    /// Pointwise sum of the crop balances plus the year-end carries and
    /// the field's modifiers.
    pub fn total_balance(&self) -> Balance {
        let mut total = Balance::new("Total");
        for balance in self.crop_balances() {
            total.add(&balance);
        }
        total.add(&self.redelivery());
        for modifier in &self.modifiers {
            total.add(&Balance::modifier(
                modifier.description.clone(),
                modifier.modification,
                Decimal::from(modifier.amount),
            ));
        }
        total
    }

    /// Regulatory check for a proposed autumn organic fertilization.
    /// `prior_amount` carries the stored amount when an existing
    /// fertilization is being edited, making the suggestion additive.
    /// Non-fall measures and mineral fertilizers always pass.
    pub fn check_fall_fertilization(
        &self,
        measure: MeasureType,
        fertilizer: &Fertilizer,
        amount: Decimal,
        cultivation_type: CultivationType,
        prior_amount: Option<Decimal>,
    ) -> FallCheck {
        if measure != MeasureType::OrgFall || !fertilizer.is_organic() {
            return FallCheck::Accepted;
        }
        let (sum_n, sum_nh4) = self.sum_fall_fertilizations();
        let prior = prior_amount.unwrap_or_default();
        let total_n = sum_n + (amount - prior) * fertilizer.n;
        let total_nh4 = sum_nh4 + (amount - prior) * fertilizer.nh4;

        if total_n <= Decimal::from(FALL_N_LIMIT) && total_nh4 <= Decimal::from(FALL_NH4_LIMIT) {
            return FallCheck::Accepted;
        }

        if self.counts_as_feedable_grassland(cultivation_type) {
            let cap = Decimal::from(if self.red_region {
                FALL_RED_REGION_N_LIMIT
            } else {
                FALL_FEEDABLE_N_LIMIT
            });
            if total_n < cap {
                return FallCheck::Accepted;
            }
            match max_amount_for(cap - sum_n, fertilizer.n) {
                Some(max_amount) => FallCheck::Rejected {
                    max_amount: max_amount + prior,
                },
                None => FallCheck::Accepted,
            }
        } else {
            let n_bound = max_amount_for(Decimal::from(FALL_N_LIMIT) - sum_n, fertilizer.n);
            let nh4_bound =
                max_amount_for(Decimal::from(FALL_NH4_LIMIT) - sum_nh4, fertilizer.nh4);
            let max_amount = match (n_bound, nh4_bound) {
                (Some(n), Some(nh4)) => Some(n.min(nh4)),
                (bound, None) | (None, bound) => bound,
            };
            match max_amount {
                Some(max_amount) => FallCheck::Rejected {
                    max_amount: max_amount + prior,
                },
                None => FallCheck::Accepted,
            }
        }
    }

    /// Grassland, or a feedable main crop with no following harvestable
    /// crop, falls under the higher feedable N cap.
    fn counts_as_feedable_grassland(&self, cultivation_type: CultivationType) -> bool {
        if self.field_type == FieldType::Grassland {
            return true;
        }
        let Some(cultivation) = self.cultivation(cultivation_type) else {
            return false;
        };
        cultivation_type.is_main()
            && cultivation.crop.feedable()
            && self.second_main_crop().is_none()
            && self.second_crop().is_none()
    }

    /// Brutto N and NH4 already spread in fall, over all existing
    /// organic fall fertilizations.
    fn sum_fall_fertilizations(&self) -> (Decimal, Decimal) {
        let mut sum_n = Decimal::ZERO;
        let mut sum_nh4 = Decimal::ZERO;
        for fertilization in &self.fertilizations {
            if fertilization.fertilizer.is_organic()
                && fertilization.measure == MeasureType::OrgFall
            {
                sum_n += fertilization.amount * fertilization.fertilizer.n;
                sum_nh4 += fertilization.amount * fertilization.fertilizer.nh4;
            }
        }
        (sum_n, sum_nh4)
    }
}

/// Largest amount whose contribution stays inside `headroom`; `None`
/// when the fertilizer carries none of the nutrient and the bound does
/// not apply.
fn max_amount_for(headroom: Decimal, content: Decimal) -> Option<Decimal> {
    if content <= Decimal::ZERO {
        return None;
    }
    Some((headroom / content).floor().max(Decimal::ZERO))
}
