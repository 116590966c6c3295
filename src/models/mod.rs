pub mod crop;
pub mod cultivation;
pub mod fertilization;
pub mod fertilizer;
pub mod field;
pub mod parcel;
pub mod soil_sample;
pub mod types;

pub use crop::*;
pub use cultivation::*;
pub use fertilization::*;
pub use fertilizer::*;
pub use field::*;
pub use parcel::*;
pub use soil_sample::*;
pub use types::*;
