use super::{BaseParameters, MissingInputPolicy, ParametricStudy, SweepRanges};
use crate::base::{Error, ParamMap};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Holds the description of a parametric study as read from a JSON file
///
/// # Example
///
/// ```json
/// {
///   "name": "soft_clay",
///   "motion_dir": "motions",
///   "ground_motions": ["GM1.txt", "GM2.txt"],
///   "material": { "Vs": 150.0, "soilDepth": 40.0 },
///   "mesh": { "f_max": 20.0 },
///   "analysis": { "damp": 0.03, "motion_dt": 0.01 },
///   "sweep": { "material.nu": [0.0, 0.3] },
///   "missing_input": "abort"
/// }
/// ```
///
/// Only `name` and `ground_motions` are required. A relative `motion_dir` is taken with
/// respect to the root directory given to [StudyConfig::build_study].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Name of the study
    pub name: String,

    /// Directory holding the ground-motion files
    #[serde(default)]
    pub motion_dir: Option<PathBuf>,

    /// Ground-motion identifiers (file names)
    pub ground_motions: Vec<String>,

    /// Overrides of the material properties
    #[serde(default)]
    pub material: ParamMap,

    /// Overrides of the mesh specification
    #[serde(default)]
    pub mesh: ParamMap,

    /// Overrides of the analysis configuration
    #[serde(default)]
    pub analysis: ParamMap,

    /// Additional sweep dimensions
    #[serde(default)]
    pub sweep: SweepRanges,

    /// What to do with missing ground-motion files
    #[serde(default)]
    pub missing_input: MissingInputPolicy,
}

impl StudyConfig {
    /// Reads a JSON file containing this struct
    pub fn read_json<P>(full_path: &P) -> Result<Self, Error>
    where
        P: AsRef<Path> + ?Sized,
    {
        let file = File::open(full_path.as_ref())?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Returns the parameters shared by all sweep points
    pub fn base_parameters(&self) -> Result<BaseParameters, Error> {
        BaseParameters::from_mappings(&self.material, &self.mesh, &self.analysis)
    }

    /// Creates the study (and its result directory) and defines the sweep ranges
    pub fn build_study<P>(&self, root_dir: P) -> Result<ParametricStudy, Error>
    where
        P: AsRef<Path>,
    {
        let root = root_dir.as_ref();
        let mut study = ParametricStudy::new(&self.name, root)?;
        if let Some(dir) = &self.motion_dir {
            study.set_motion_dir(root.join(dir));
        }
        study
            .set_missing_input_policy(self.missing_input)
            .define_parameter_range(self.ground_motions.as_slice())?;
        for (dimension, values) in &self.sweep {
            study.add_dimension(dimension, values.clone())?;
        }
        Ok(study)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::StudyConfig;
    use crate::base::{Error, ParamValue};
    use crate::study::MissingInputPolicy;

    #[test]
    fn read_json_works() -> Result<(), Error> {
        let config = StudyConfig::read_json("data/study_sample.json")?;
        assert_eq!(config.name, "sample");
        assert_eq!(config.ground_motions, &["GM1.txt", "GM2.txt"]);
        assert_eq!(config.material["Vs"], ParamValue::Real(150.0));
        assert_eq!(config.mesh["ele_per_wave"], ParamValue::Int(8));
        assert_eq!(config.sweep["analysis.damp"].len(), 2);
        assert_eq!(config.missing_input, MissingInputPolicy::Abort);
        let base = config.base_parameters()?;
        assert_eq!(base.material.vs(), 150.0);
        assert_eq!(base.analysis.motion_dt(), 0.01);
        Ok(())
    }

    #[test]
    fn defaults_work() -> Result<(), Error> {
        let config: StudyConfig = serde_json::from_str(r#"{"name": "x", "ground_motions": ["a.txt"]}"#)?;
        assert_eq!(config.motion_dir, None);
        assert!(config.material.is_empty());
        assert!(config.sweep.is_empty());
        assert_eq!(config.missing_input, MissingInputPolicy::Abort);
        Ok(())
    }

    #[test]
    fn build_study_works() -> Result<(), Error> {
        let root = tempfile::tempdir()?;
        let config: StudyConfig = serde_json::from_str(
            r#"{
                "name": "x",
                "motion_dir": "motions",
                "ground_motions": ["a.txt", "b.txt"],
                "sweep": {"material.Vs": [100.0, 200.0]},
                "missing_input": "skip"
            }"#,
        )?;
        let study = config.build_study(root.path())?;
        assert_eq!(study.motion_dir(), root.path().join("motions"));
        assert_eq!(study.missing_input_policy(), MissingInputPolicy::Skip);
        assert_eq!(study.ranges().len(), 2);
        assert_eq!(study.sweep_points().len(), 4);

        let bad: StudyConfig = serde_json::from_str(
            r#"{"name": "y", "ground_motions": ["a.txt"], "sweep": {"material.Vp": [1.0]}}"#,
        )?;
        assert_eq!(
            bad.build_study(root.path()).err().unwrap().to_string(),
            "'MaterialProperties' has no parameter 'Vp'"
        );
        Ok(())
    }
}
