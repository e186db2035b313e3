//! Implements the parameter sets needed to run a site-response analysis

mod analysis_configuration;
mod error;
mod material_properties;
mod mesh_specification;
mod param_value;
mod parameter_set;
pub use crate::base::analysis_configuration::*;
pub use crate::base::error::*;
pub use crate::base::material_properties::*;
pub use crate::base::mesh_specification::*;
pub use crate::base::param_value::*;
pub use crate::base::parameter_set::*;
