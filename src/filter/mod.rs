pub mod acceptability;
pub mod relatedness;

pub use acceptability::{AcceptabilityFilter, History, Rejection};
pub use relatedness::{RelatednessFilter, StemmedWord};
