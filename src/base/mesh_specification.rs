use super::{check_real, write_mapping, Error, MaterialProperties, ParamMap, ParamValue, ParameterSet};
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;
use std::fmt;

/// Defines the default maximum frequency to be resolved (Hz)
pub const MESH_DEFAULT_F_MAX: f64 = 25.0;

/// Defines the default number of elements per wavelength
pub const MESH_DEFAULT_ELE_PER_WAVE: usize = 4;

/// Defines the default tag of the first node given to the external engine
pub const MESH_DEFAULT_NODE_START: usize = 1;

/// Defines the maximum number of elements of the column
pub const MESH_MAX_NUM_ELE: usize = 1_000_000;

/// Defines the maximum tag of the first node (tags are 32-bit signed integers in the engine)
pub const MESH_MAX_NODE_START: usize = 2_147_483_647;

/// Holds the vertical discretization of the soil column
///
/// The element size follows the elements-per-wavelength criterion for the highest frequency
/// of interest:
///
/// ```text
/// λ = Vs / f_max
/// h_trial = λ / ele_per_wave
/// numEle = ⌈H / h_trial⌉
/// eleSize = H / numEle  ≤  h_trial
/// ```
///
/// where `H` is the depth of the soil column. The column is a plane-strain strip of square
/// elements with two nodes at each elevation.
///
/// `H / h_trial` must not exceed [MESH_MAX_NUM_ELE]; constructors and setters reject
/// combinations that would.
///
/// **Note:** `Vs` and `H` are copied from the [MaterialProperties] given to the constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSpecification {
    /// Shear-wave velocity of the soil (from the material)
    vs: f64,

    /// Depth of the soil column (from the material)
    soil_depth: f64,

    /// Maximum frequency to be resolved
    f_max: f64,

    /// Number of elements per wavelength
    ele_per_wave: usize,

    /// Tag of the first node
    node_start: usize,
}

impl MeshSpecification {
    /// Allocates a new instance with the default resolution
    pub fn new(material: &MaterialProperties) -> Result<Self, Error> {
        MeshSpecification::with_resolution(material, MESH_DEFAULT_F_MAX, MESH_DEFAULT_ELE_PER_WAVE)
    }

    /// Allocates a new instance with the given resolution
    pub fn with_resolution(material: &MaterialProperties, f_max: f64, ele_per_wave: usize) -> Result<Self, Error> {
        let mesh = MeshSpecification {
            vs: material.vs(),
            soil_depth: material.soil_depth(),
            f_max: check_f_max(f_max)?,
            ele_per_wave: check_ele_per_wave(ele_per_wave)?,
            node_start: MESH_DEFAULT_NODE_START,
        };
        mesh.check_num_ele()?;
        Ok(mesh)
    }

    /// Allocates a new instance from a mapping with f_max, ele_per_wave, and node_start
    ///
    /// Missing fields take the default values. The resolution is checked once all fields
    /// are known; thus, the order of the fields does not matter.
    pub fn from_mapping(material: &MaterialProperties, fields: &ParamMap) -> Result<Self, Error> {
        let f_max = match fields.get("f_max") {
            Some(value) => value.as_f64(Self::NAME, "f_max")?,
            None => MESH_DEFAULT_F_MAX,
        };
        let ele_per_wave = match fields.get("ele_per_wave") {
            Some(value) => value.as_usize(Self::NAME, "ele_per_wave")?,
            None => MESH_DEFAULT_ELE_PER_WAVE,
        };
        let mut mesh = MeshSpecification::with_resolution(material, f_max, ele_per_wave)?;
        mesh.load(fields)?;
        Ok(mesh)
    }

    pub fn f_max(&self) -> f64 {
        self.f_max
    }

    pub fn ele_per_wave(&self) -> usize {
        self.ele_per_wave
    }

    pub fn node_start(&self) -> usize {
        self.node_start
    }

    /// Sets the maximum frequency to be resolved
    pub fn set_f_max(&mut self, value: f64) -> Result<&mut Self, Error> {
        let trial = MeshSpecification {
            f_max: check_f_max(value)?,
            ..self.clone()
        };
        trial.check_num_ele()?;
        *self = trial;
        Ok(self)
    }

    /// Sets the number of elements per wavelength
    pub fn set_ele_per_wave(&mut self, value: usize) -> Result<&mut Self, Error> {
        let trial = MeshSpecification {
            ele_per_wave: check_ele_per_wave(value)?,
            ..self.clone()
        };
        trial.check_num_ele()?;
        *self = trial;
        Ok(self)
    }

    /// Sets the tag of the first node
    pub fn set_node_start(&mut self, value: usize) -> Result<&mut Self, Error> {
        if value > MESH_MAX_NODE_START {
            return Err(Error::InvalidParameter {
                owner: Self::NAME,
                key: "node_start",
                value: value.to_string(),
                rule: "≤ 2147483647",
            });
        }
        self.node_start = value;
        Ok(self)
    }

    /// Checks that H / h_trial does not exceed the maximum number of elements
    fn check_num_ele(&self) -> Result<(), Error> {
        let ratio = self.soil_depth / self.trial_size();
        if !(ratio <= MESH_MAX_NUM_ELE as f64) {
            return Err(Error::InvalidParameter {
                owner: Self::NAME,
                key: "numEle",
                value: format!("{:?}", f64::ceil(ratio)),
                rule: "≤ 1000000 (reduce f_max or ele_per_wave)",
            });
        }
        Ok(())
    }

    /// Returns the wavelength of the highest frequency `λ = Vs / f_max`
    pub fn wavelength(&self) -> f64 {
        self.vs / self.f_max
    }

    /// Returns the largest element size allowed by the resolution criterion
    pub fn trial_size(&self) -> f64 {
        self.wavelength() / (self.ele_per_wave as f64)
    }

    /// Returns the smallest number of elements satisfying the resolution criterion
    pub fn num_ele(&self) -> usize {
        let trial = self.trial_size();
        let mut n = f64::max(f64::ceil(self.soil_depth / trial), 1.0) as usize;
        // correct round-off in H / h_trial
        while n > 1 && self.soil_depth / ((n - 1) as f64) <= trial {
            n -= 1;
        }
        while self.soil_depth / (n as f64) > trial {
            n += 1;
        }
        n
    }

    /// Returns the (vertical) element size `H / numEle`
    pub fn ele_size(&self) -> f64 {
        self.soil_depth / (self.num_ele() as f64)
    }

    /// Returns the number of nodes along the column (two per elevation)
    pub fn num_node_y(&self) -> usize {
        2 * (self.num_ele() + 1)
    }

    /// Returns the horizontal element size (square elements)
    pub fn size_ele_x(&self) -> f64 {
        self.ele_size()
    }

    /// Returns the tag given to the external engine for a point of the column mesh
    ///
    /// Returns None if the point is not in the column mesh.
    pub fn node_tag(&self, point_id: usize) -> Option<usize> {
        if point_id < self.num_node_y() {
            Some(self.node_start + point_id)
        } else {
            None
        }
    }

    /// Generates the column mesh with Qua4 cells
    ///
    /// ```text
    ///  y = H   2n----2n+1
    ///           |     |
    ///           :     :
    ///           2-----3
    ///           | [0] |
    ///  y = 0    0-----1
    ///          x=0   x=sizeEleX
    /// ```
    ///
    /// Point `2j` is on the left side and `2j+1` on the right side of elevation `j`.
    /// All cells have attribute 1.
    pub fn column_mesh(&self) -> Mesh {
        let n = self.num_ele();
        let h = self.ele_size();
        let dx = self.size_ele_x();
        let mut points = Vec::with_capacity(self.num_node_y());
        for j in 0..(n + 1) {
            let y = if j == n { self.soil_depth } else { (j as f64) * h };
            points.push(Point {
                id: 2 * j,
                marker: 0,
                coords: vec![0.0, y],
            });
            points.push(Point {
                id: 2 * j + 1,
                marker: 0,
                coords: vec![dx, y],
            });
        }
        let cells = (0..n)
            .map(|i| Cell {
                id: i,
                attribute: 1,
                kind: GeoKind::Qua4,
                points: vec![2 * i, 2 * i + 1, 2 * i + 3, 2 * i + 2],
            })
            .collect();
        Mesh {
            ndim: 2,
            points,
            cells,
        }
    }
}

fn check_f_max(value: f64) -> Result<f64, Error> {
    check_real(MeshSpecification::NAME, "f_max", value, |x| x > 0.0, "> 0.0")
}

fn check_ele_per_wave(value: usize) -> Result<usize, Error> {
    if value < 1 || value > MESH_MAX_NUM_ELE {
        return Err(Error::InvalidParameter {
            owner: MeshSpecification::NAME,
            key: "ele_per_wave",
            value: value.to_string(),
            rule: "≥ 1 and ≤ 1000000",
        });
    }
    Ok(value)
}

impl ParameterSet for MeshSpecification {
    const NAME: &'static str = "MeshSpecification";
    const FIELDS: &'static [&'static str] = &["f_max", "ele_per_wave", "node_start"];
    const DERIVED: &'static [&'static str] = &["numEle", "eleSize", "numNodeY", "sizeEleX"];

    fn get(&self, key: &str) -> Option<ParamValue> {
        match key {
            "f_max" => Some(self.f_max.into()),
            "ele_per_wave" => Some(self.ele_per_wave.into()),
            "node_start" => Some(self.node_start.into()),
            "numEle" => Some(self.num_ele().into()),
            "eleSize" => Some(self.ele_size().into()),
            "numNodeY" => Some(self.num_node_y().into()),
            "sizeEleX" => Some(self.size_ele_x().into()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &ParamValue) -> Result<(), Error> {
        match key {
            "f_max" => self.set_f_max(value.as_f64(Self::NAME, key)?)?,
            "ele_per_wave" => self.set_ele_per_wave(value.as_usize(Self::NAME, key)?)?,
            "node_start" => self.set_node_start(value.as_usize(Self::NAME, key)?)?,
            _ => {
                return Err(Error::UnknownParameter {
                    owner: Self::NAME,
                    key: key.to_string(),
                })
            }
        };
        Ok(())
    }
}

impl fmt::Display for MeshSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mapping(f, "Mesh specification", &self.to_mapping())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
