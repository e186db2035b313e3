use crate::base::{AnalysisConfiguration, Error, MaterialProperties, MeshSpecification, ParamValue, ParameterSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Defines the name of the sweep dimension holding the ground-motion files
pub const DIM_GROUND_MOTION: &str = "ground_motion";

/// Holds the candidate values of each sweep dimension
pub type SweepRanges = BTreeMap<String, Vec<ParamValue>>;

/// Defines the parameter set addressed by a sweep dimension
#[derive(Clone, Debug, PartialEq)]
pub enum SweepTarget {
    /// The `ground_motion` dimension
    GroundMotion,

    /// A `material.<key>` dimension
    Material(String),

    /// A `mesh.<key>` dimension
    Mesh(String),

    /// An `analysis.<key>` dimension
    Analysis(String),
}

impl SweepTarget {
    /// Parses a dimension name
    ///
    /// The key must be a settable field of the addressed parameter set.
    pub fn parse(dimension: &str) -> Result<Self, Error> {
        if dimension == DIM_GROUND_MOTION {
            return Ok(SweepTarget::GroundMotion);
        }
        let (prefix, key) = dimension
            .split_once('.')
            .ok_or_else(|| Error::BadDimension(dimension.to_string()))?;
        match prefix {
            "material" => check_key::<MaterialProperties>(key).map(|k| SweepTarget::Material(k)),
            "mesh" => check_key::<MeshSpecification>(key).map(|k| SweepTarget::Mesh(k)),
            "analysis" => check_key::<AnalysisConfiguration>(key).map(|k| SweepTarget::Analysis(k)),
            _ => Err(Error::BadDimension(dimension.to_string())),
        }
    }
}

fn check_key<T: ParameterSet>(key: &str) -> Result<String, Error> {
    if T::FIELDS.contains(&key) {
        Ok(key.to_string())
    } else if T::DERIVED.contains(&key) {
        Err(Error::DerivedParameter {
            owner: T::NAME,
            key: key.to_string(),
        })
    } else {
        Err(Error::UnknownParameter {
            owner: T::NAME,
            key: key.to_string(),
        })
    }
}

/// Holds one combination of values drawn from the sweep ranges
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Position of the point in the sweep
    pub index: usize,

    /// Value of each dimension
    pub values: BTreeMap<String, ParamValue>,
}

impl SweepPoint {
    /// Returns the ground-motion identifier, if any
    pub fn ground_motion(&self) -> Option<&str> {
        match self.values.get(DIM_GROUND_MOTION) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the overrides of a parameter set given the dimension prefix (e.g., "material")
    pub fn overrides(&self, prefix: &str) -> Vec<(String, ParamValue)> {
        self.values
            .iter()
            .filter_map(|(dimension, value)| match dimension.split_once('.') {
                Some((p, key)) if p == prefix => Some((key.to_string(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Returns all combinations of the ranges
///
/// Dimensions are taken in name order; the last one varies fastest.
/// Returns an empty list if there are no dimensions or if one dimension is empty.
pub fn sweep_combinations(ranges: &SweepRanges) -> Vec<SweepPoint> {
    if ranges.is_empty() || ranges.values().any(|values| values.is_empty()) {
        return Vec::new();
    }
    let dims: Vec<(&String, &Vec<ParamValue>)> = ranges.iter().collect();
    let total: usize = dims.iter().map(|(_, values)| values.len()).product();
    let mut points = Vec::with_capacity(total);
    let mut counter = vec![0; dims.len()];
    for index in 0..total {
        let values = dims
            .iter()
            .zip(&counter)
            .map(|((name, candidates), &k)| (name.to_string(), candidates[k].clone()))
            .collect();
        points.push(SweepPoint { index, values });
        // advance the odometer
        for d in (0..dims.len()).rev() {
            counter[d] += 1;
            if counter[d] < dims[d].1.len() {
                break;
            }
            counter[d] = 0;
        }
    }
    points
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{sweep_combinations, SweepRanges, SweepTarget};
    use crate::base::ParamValue;

    #[test]
    fn parse_works() {
        assert_eq!(SweepTarget::parse("ground_motion").unwrap(), SweepTarget::GroundMotion);
        assert_eq!(
            SweepTarget::parse("material.Vs").unwrap(),
            SweepTarget::Material("Vs".to_string())
        );
        assert_eq!(
            SweepTarget::parse("mesh.f_max").unwrap(),
            SweepTarget::Mesh("f_max".to_string())
        );
        assert_eq!(
            SweepTarget::parse("analysis.damp").unwrap(),
            SweepTarget::Analysis("damp".to_string())
        );
        assert_eq!(
            SweepTarget::parse("material.Vp").err().unwrap().to_string(),
            "'MaterialProperties' has no parameter 'Vp'"
        );
        assert_eq!(
            SweepTarget::parse("mesh.numEle").err().unwrap().to_string(),
            "'MeshSpecification' parameter 'numEle' is derived and cannot be set"
        );
        assert!(SweepTarget::parse("soil.Vs").is_err());
        assert!(SweepTarget::parse("Vs").is_err());
    }

    #[test]
    fn sweep_combinations_works() {
        let mut ranges = SweepRanges::new();
        assert_eq!(sweep_combinations(&ranges).len(), 0);

        ranges.insert(
            "ground_motion".to_string(),
            vec![ParamValue::from("GM1.txt"), ParamValue::from("GM2.txt")],
        );
        ranges.insert(
            "material.Vs".to_string(),
            vec![ParamValue::Real(100.0), ParamValue::Real(200.0), ParamValue::Real(300.0)],
        );
        let points = sweep_combinations(&ranges);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].ground_motion(), Some("GM1.txt"));
        assert_eq!(points[0].values["material.Vs"], ParamValue::Real(100.0));
        assert_eq!(points[1].values["material.Vs"], ParamValue::Real(200.0));
        assert_eq!(points[3].ground_motion(), Some("GM2.txt"));
        assert_eq!(points[3].values["material.Vs"], ParamValue::Real(100.0));
        assert_eq!(points[5].index, 5);
        assert_eq!(points[5].overrides("material"), vec![("Vs".to_string(), ParamValue::Real(300.0))]);
        assert_eq!(points[5].overrides("mesh"), Vec::new());

        ranges.insert("mesh.f_max".to_string(), Vec::new());
        assert_eq!(sweep_combinations(&ranges).len(), 0);
    }
}
