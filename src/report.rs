//! Reporting view over fertilizations: filter by any combination of
//! fields, fertilizers, crops and year, sorted by parcel, crop,
//! fertilizer and measure.

use crate::models::MeasureType;
use crate::store::PlanStore;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// All filters optional; `None` means no restriction.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub fields: Option<Vec<i64>>,
    pub fertilizers: Option<Vec<i64>>,
    pub crops: Option<Vec<i64>>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub parcel_prefix: i64,
    pub parcel_suffix: i64,
    pub parcel_name: String,
    pub year: i32,
    pub crop_name: String,
    pub fertilizer_name: String,
    pub measure: MeasureType,
    /// Amount per ha in the fertilizer's unit.
    pub amount: Decimal,
    pub month: Option<u32>,
}

/// Resolve every fertilization into a row, apply the filter and sort by
/// `(parcel prefix, crop name, fertilizer name, measure)`. Rows whose
/// referents are missing are dropped.
pub fn report_rows<S: PlanStore + ?Sized>(store: &S, filter: &ReportFilter) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = store
        .all_fertilizations()
        .into_iter()
        .filter_map(|fertilization| {
            let field = store.field(fertilization.field_id)?;
            let parcel = store.parcel(field.parcel_id)?;
            let cultivation = store.cultivation(fertilization.cultivation_id)?;
            let crop = store.crop(cultivation.crop_id)?;
            let fertilizer = store.fertilizer(fertilization.fertilizer_id)?;

            let keep = filter
                .fields
                .as_ref()
                .is_none_or(|ids| field.id.is_some_and(|id| ids.contains(&id)))
                && filter
                    .fertilizers
                    .as_ref()
                    .is_none_or(|ids| fertilizer.id.is_some_and(|id| ids.contains(&id)))
                && filter
                    .crops
                    .as_ref()
                    .is_none_or(|ids| crop.id.is_some_and(|id| ids.contains(&id)))
                && filter.year.is_none_or(|year| field.year == year);
            if !keep {
                return None;
            }

            Some(ReportRow {
                parcel_prefix: parcel.prefix,
                parcel_suffix: parcel.suffix,
                parcel_name: parcel.name,
                year: field.year,
                crop_name: crop.name,
                fertilizer_name: fertilizer.name,
                measure: fertilization.measure,
                amount: fertilization.amount,
                month: fertilization.month,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.parcel_prefix, &a.crop_name, &a.fertilizer_name, a.measure).cmp(&(
            b.parcel_prefix,
            &b.crop_name,
            &b.fertilizer_name,
            b.measure,
        ))
    });
    rows
}

/// Total amount of each fertilizer spread by one owner in one year,
/// scaled by field area.
pub fn fertilizer_usage<S: PlanStore + ?Sized>(
    store: &S,
    user_id: i64,
    year: i32,
) -> Vec<(String, Decimal)> {
    let mut usage: BTreeMap<String, Decimal> = BTreeMap::new();
    for fertilization in store.all_fertilizations() {
        let Some(field) = store.field(fertilization.field_id) else {
            continue;
        };
        if field.year != year {
            continue;
        }
        let Some(fertilizer) = store.fertilizer(fertilization.fertilizer_id) else {
            continue;
        };
        if fertilizer.user_id != user_id {
            continue;
        }
        *usage.entry(fertilizer.name).or_default() += fertilization.amount * field.area;
    }
    usage.into_iter().collect()
}
