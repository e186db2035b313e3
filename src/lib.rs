//! Siteresp -- parameters and parametric sweeps for 1D seismic site-response analyses
//!
//! This crate derives the numerical parameters of a soil-column simulation from a few
//! physical properties and drives a parametric sweep over them:
//!
//! * [base::MaterialProperties] -- soil and rock properties with the elastic moduli G, E, and K
//! * [base::MeshSpecification] -- element size from the elements-per-wavelength criterion
//! * [base::AnalysisConfiguration] -- Newmark coefficients and Rayleigh damping
//! * [study::ParametricStudy] -- sweep definition, input validation, and execution
//!
//! The finite element solution itself is delegated to an external engine; see
//! [study::SiteResponseEngine].
//!
//! # Example
//!
//! ```
//! use siteresp::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     let material = MaterialProperties::from_fields([("Vs", 100.0), ("soilDepth", 30.0)])?;
//!     let mesh = MeshSpecification::with_resolution(&material, 25.0, 4)?;
//!     assert_eq!(mesh.num_ele(), 30);
//!     assert_eq!(mesh.num_node_y(), 62);
//!     Ok(())
//! }
//! ```

pub mod base;
pub mod prelude;
pub mod study;
