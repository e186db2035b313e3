use super::SweepPoint;
use crate::base::{AnalysisConfiguration, Error, MaterialProperties, MeshSpecification};
use crate::base::{ParamMap, ParamValue, ParameterSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Holds the parameters shared by all sweep points (before the sweep overrides)
#[derive(Clone, Debug, PartialEq)]
pub struct BaseParameters {
    /// Material properties
    pub material: MaterialProperties,

    /// Mesh fields (f_max, ele_per_wave, node_start) overriding the defaults
    ///
    /// The mesh itself depends on the material of each sweep point; thus, it is built later.
    pub mesh: ParamMap,

    /// Time-integration and damping settings
    pub analysis: AnalysisConfiguration,
}

impl BaseParameters {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        BaseParameters {
            material: MaterialProperties::new(),
            mesh: ParamMap::new(),
            analysis: AnalysisConfiguration::new(),
        }
    }

    /// Allocates a new instance from the mapping form of each parameter set
    pub fn from_mappings(material: &ParamMap, mesh: &ParamMap, analysis: &ParamMap) -> Result<Self, Error> {
        let mut base = BaseParameters::new();
        base.material.load(material)?;
        base.analysis.load(analysis)?;
        MeshSpecification::from_mapping(&base.material, mesh)?;
        base.mesh = mesh.clone();
        Ok(base)
    }
}

/// Holds the parameters of one sweep point as handed to the external engine
///
/// Each configuration owns independent parameter sets.
#[derive(Clone, Debug)]
pub struct RunConfiguration {
    /// The sweep point
    pub point: SweepPoint,

    /// Material properties with the overrides of the point
    pub material: MaterialProperties,

    /// Mesh derived from the material of the point
    pub mesh: MeshSpecification,

    /// Analysis settings; the motion path and number of steps come from the ground motion
    pub analysis: AnalysisConfiguration,
}

impl RunConfiguration {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `point` -- the sweep point
    /// * `base` -- the parameters shared by all points
    /// * `motion` -- the resolved ground-motion file and its number of samples, if any
    pub fn new(point: &SweepPoint, base: &BaseParameters, motion: Option<(&Path, usize)>) -> Result<Self, Error> {
        let mut material = base.material.clone();
        material.update(point.overrides("material"))?;

        let mut mesh_fields = base.mesh.clone();
        mesh_fields.extend(point.overrides("mesh"));
        let mesh = MeshSpecification::from_mapping(&material, &mesh_fields)?;

        let mut analysis = base.analysis.clone();
        analysis.update(point.overrides("analysis"))?;
        if let Some((path, npoint)) = motion {
            if analysis.motion_steps() != npoint {
                tracing::warn!(
                    point = point.index,
                    motion_steps = analysis.motion_steps(),
                    npoint,
                    "motion_steps replaced by the number of samples of {}",
                    path.display()
                );
            }
            analysis
                .set_motion_path(&path.to_string_lossy())?
                .set_motion_steps(npoint)?;
        }

        Ok(RunConfiguration {
            point: point.clone(),
            material,
            mesh,
            analysis,
        })
    }

    /// Returns the coefficient of the Lysmer dashpot at the base of the column
    ///
    /// `c = sizeEleX · ρrock · Vs,rock` (compliant base with elastic rock)
    pub fn dashpot_coefficient(&self) -> f64 {
        self.mesh.size_ele_x() * self.material.rock_den() * self.material.rock_vs()
    }

    /// Returns the union of the mappings of all parameter sets
    pub fn to_mapping(&self) -> ParamMap {
        let mut mapping = self.material.to_mapping();
        mapping.extend(self.mesh.to_mapping());
        mapping.extend(self.analysis.to_mapping());
        mapping.insert("dashpotCoeff".to_string(), ParamValue::Real(self.dashpot_coefficient()));
        mapping
    }

    /// Writes the mapping form to a JSON file
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), Error>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = File::create(path)?;
        serde_json::to_writer_pretty(&mut file, &self.to_mapping())?;
        Ok(())
    }
}

/// Holds the outcome of the external engine for one sweep point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyResult {
    /// The sweep point
    pub point: SweepPoint,

    /// Path of the ground-motion file used in the run
    pub motion_path: Option<PathBuf>,

    /// Scalar results reported by the engine (e.g., peak surface acceleration)
    pub output: BTreeMap<String, f64>,
}

/// Defines the interface to the external simulation engine
///
/// The engine assembles and solves the finite element model of the column.
pub trait SiteResponseEngine {
    /// Runs one simulation and returns its scalar results
    fn run(&mut self, config: &RunConfiguration) -> Result<BTreeMap<String, f64>, Error>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{BaseParameters, RunConfiguration};
    use crate::base::{Error, ParamMap, ParamValue};
    use crate::study::SweepPoint;
    use russell_lab::approx_eq;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn sample_point() -> SweepPoint {
        let mut values = BTreeMap::new();
        values.insert("ground_motion".to_string(), ParamValue::from("GM1.txt"));
        values.insert("material.Vs".to_string(), ParamValue::Real(200.0));
        values.insert("mesh.ele_per_wave".to_string(), ParamValue::Int(8));
        values.insert("analysis.damp".to_string(), ParamValue::Real(0.05));
        SweepPoint { index: 3, values }
    }

    #[test]
    fn from_mappings_works() -> Result<(), Error> {
        let mut material = ParamMap::new();
        material.insert("soilDepth".to_string(), ParamValue::Real(40.0));
        let mut mesh = ParamMap::new();
        mesh.insert("f_max".to_string(), ParamValue::Real(20.0));
        let analysis = ParamMap::new();
        let base = BaseParameters::from_mappings(&material, &mesh, &analysis)?;
        assert_eq!(base.material.soil_depth(), 40.0);
        assert_eq!(base.mesh, mesh);

        mesh.insert("ele_per_wave".to_string(), ParamValue::Int(0));
        assert_eq!(
            BaseParameters::from_mappings(&material, &mesh, &analysis).err().unwrap().to_string(),
            "MeshSpecification.ele_per_wave = 0 is incorrect; it must be ≥ 1 and ≤ 1000000"
        );
        Ok(())
    }

    #[test]
    fn new_applies_overrides() -> Result<(), Error> {
        let base = BaseParameters::new();
        let point = sample_point();
        let config = RunConfiguration::new(&point, &base, Some((Path::new("/data/GM1.txt"), 7990)))?;
        assert_eq!(config.material.vs(), 200.0);
        assert_eq!(config.mesh.ele_per_wave(), 8);
        // λ = 200/25 = 8, h = 1 → 30 elements
        assert_eq!(config.mesh.num_ele(), 30);
        assert_eq!(config.analysis.damp(), 0.05);
        assert_eq!(config.analysis.motion_path(), "/data/GM1.txt");
        assert_eq!(config.analysis.motion_steps(), 7990);
        approx_eq(config.dashpot_coefficient(), 1.0 * 2.4 * 760.0, 1e-12);

        // the base parameters are not modified
        assert_eq!(base, BaseParameters::new());
        Ok(())
    }

    #[test]
    fn new_rejects_invalid_overrides() {
        let base = BaseParameters::new();
        let mut point = sample_point();
        point.values.insert("material.nu".to_string(), ParamValue::Real(0.5));
        assert_eq!(
            RunConfiguration::new(&point, &base, None).err().unwrap().to_string(),
            "MaterialProperties.nu = 0.5 is incorrect; it must be 0.0 ≤ ν < 0.5"
        );

        // the mesh of a very soft column would exceed the maximum number of elements
        point.values.insert("material.nu".to_string(), ParamValue::Real(0.3));
        point.values.insert("material.Vs".to_string(), ParamValue::Real(1e-10));
        let err = RunConfiguration::new(&point, &base, None).err().unwrap();
        assert!(matches!(err, Error::InvalidParameter { key: "numEle", .. }));
    }

    #[test]
    fn to_mapping_and_write_json_work() -> Result<(), Error> {
        let base = BaseParameters::new();
        let config = RunConfiguration::new(&sample_point(), &base, None)?;
        let mapping = config.to_mapping();
        assert_eq!(mapping.len(), 14 + 7 + 8 + 1);
        assert_eq!(mapping["Vs"], ParamValue::Real(200.0));
        assert_eq!(mapping["numNodeY"], ParamValue::Int(62));
        assert_eq!(mapping["damp"], ParamValue::Real(0.05));

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("runs").join("point-3.json");
        config.write_json(&path)?;
        let text = std::fs::read_to_string(&path)?;
        let back: ParamMap = serde_json::from_str(&text)?;
        assert_eq!(back, mapping);
        Ok(())
    }
}
