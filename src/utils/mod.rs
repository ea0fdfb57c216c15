pub mod indicator_metadata;

pub use indicator_metadata::{IndicatorSpec, ParamConstraint, ParamRange, ParameterSpace};
