//! Implements the driver of parametric site-response studies

mod ground_motion;
mod parametric_study;
mod run_configuration;
mod study_config;
mod study_event;
mod sweep;
pub use crate::study::ground_motion::*;
pub use crate::study::parametric_study::*;
pub use crate::study::run_configuration::*;
pub use crate::study::study_config::*;
pub use crate::study::study_event::*;
pub use crate::study::sweep::*;
