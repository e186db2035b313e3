//! Makes available common structures needed to set up a study
//!
//! You may write `use siteresp::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{AnalysisConfiguration, Error, MaterialProperties, MeshSpecification};
pub use crate::base::{ParamMap, ParamValue, ParameterSet};
pub use crate::study::{BaseParameters, GroundMotion, MissingInputPolicy, ParametricStudy, StudyConfig};
pub use crate::study::{RunConfiguration, SiteResponseEngine, StudyEvent, StudyResult, StudySummary, SweepPoint};
