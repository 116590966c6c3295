//! The agronomic calculation engine: nutrient balances over the
//! `Field -> Cultivations -> Fertilizations -> Soil` object graph.
//! Everything in here is synchronous and pure over a loaded snapshot.

pub mod balance;
pub mod crop;
pub mod cultivation;
pub mod fertilization;
pub mod fertilizer;
pub mod field;
pub mod soil;

pub use balance::Balance;
pub use crop::Crop;
pub use cultivation::{Cultivation, DemandOptions};
pub use fertilization::Fertilization;
pub use fertilizer::Fertilizer;
pub use field::{load_field, FallCheck, Field};
pub use soil::{create_soil, Soil};
