use super::{check_real, write_mapping, Error, ParamValue, ParameterSet};
use std::fmt;

/// Holds the properties of the soil column and of the underlying (elastic) rock
///
/// The elastic moduli are computed on demand from `rho`, `Vs`, and `nu`; hence they
/// always agree with the current state.
///
/// # Units
///
/// Any consistent system may be used. The defaults assume m, s, Mg/m³, and kPa.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialProperties {
    /// Shear-wave velocity of the soil `Vs`
    vs: f64,

    /// Mass density of the soil `rho`
    rho: f64,

    /// Poisson's coefficient `nu`; 0.0 ≤ ν < 0.5
    nu: f64,

    /// Cohesion (undrained shear strength)
    cohesion: f64,

    /// Peak shear strain
    peak_strain: f64,

    /// Reference confining pressure
    ref_press: f64,

    /// Friction angle in degrees
    phi: f64,

    /// Pressure-dependency coefficient
    press_coeff: f64,

    /// Shear-wave velocity of the rock
    rock_vs: f64,

    /// Mass density of the rock
    rock_den: f64,

    /// Depth of the soil column
    soil_depth: f64,
}

impl MaterialProperties {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        MaterialProperties {
            vs: 100.0,
            rho: 1.7,
            nu: 0.0,
            cohesion: 95.0,
            peak_strain: 0.05,
            ref_press: 100.0,
            phi: 0.0,
            press_coeff: 0.0,
            rock_vs: 760.0,
            rock_den: 2.4,
            soil_depth: 30.0,
        }
    }

    /// Allocates a new instance with the defaults overridden by the given fields
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let mut material = MaterialProperties::new();
        material.update(fields)?;
        Ok(material)
    }

    pub fn vs(&self) -> f64 {
        self.vs
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    pub fn cohesion(&self) -> f64 {
        self.cohesion
    }

    pub fn peak_strain(&self) -> f64 {
        self.peak_strain
    }

    pub fn ref_press(&self) -> f64 {
        self.ref_press
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn press_coeff(&self) -> f64 {
        self.press_coeff
    }

    pub fn rock_vs(&self) -> f64 {
        self.rock_vs
    }

    pub fn rock_den(&self) -> f64 {
        self.rock_den
    }

    pub fn soil_depth(&self) -> f64 {
        self.soil_depth
    }

    /// Sets the shear-wave velocity of the soil
    pub fn set_vs(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.vs = check_real(Self::NAME, "Vs", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    /// Sets the mass density of the soil
    pub fn set_rho(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.rho = check_real(Self::NAME, "rho", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    /// Sets Poisson's coefficient
    ///
    /// The bulk modulus is undefined at ν = 0.5; thus, incompressible materials are rejected.
    pub fn set_nu(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.nu = check_real(Self::NAME, "nu", value, |x| x >= 0.0 && x < 0.5, "0.0 ≤ ν < 0.5")?;
        Ok(self)
    }

    pub fn set_cohesion(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.cohesion = check_real(Self::NAME, "cohesion", value, |x| x >= 0.0, "≥ 0.0")?;
        Ok(self)
    }

    pub fn set_peak_strain(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.peak_strain = check_real(Self::NAME, "peakStrain", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    pub fn set_ref_press(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.ref_press = check_real(Self::NAME, "refPress", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    /// Sets the friction angle (degrees)
    pub fn set_phi(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.phi = check_real(Self::NAME, "phi", value, |x| x >= 0.0 && x < 90.0, "0.0 ≤ φ < 90.0")?;
        Ok(self)
    }

    pub fn set_press_coeff(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.press_coeff = check_real(Self::NAME, "pressCoeff", value, |x| x >= 0.0, "≥ 0.0")?;
        Ok(self)
    }

    pub fn set_rock_vs(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.rock_vs = check_real(Self::NAME, "rock_Vs", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    pub fn set_rock_den(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.rock_den = check_real(Self::NAME, "rockDen", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    /// Sets the depth of the soil column
    pub fn set_soil_depth(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.soil_depth = check_real(Self::NAME, "soilDepth", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    /// Returns the shear modulus `G = ρ Vs²`
    pub fn shear_modulus(&self) -> f64 {
        self.rho * self.vs * self.vs
    }

    /// Returns Young's modulus `E = 2 G (1 + ν)`
    pub fn young_modulus(&self) -> f64 {
        2.0 * self.shear_modulus() * (1.0 + self.nu)
    }

    /// Returns the bulk modulus `K = E / (3 (1 - 2ν))`
    pub fn bulk_modulus(&self) -> f64 {
        self.young_modulus() / (3.0 * (1.0 - 2.0 * self.nu))
    }

    /// Returns the fundamental period of the soil column `T = 4 H / Vs`
    pub fn site_period(&self) -> f64 {
        4.0 * self.soil_depth / self.vs
    }

    /// Returns the soil-to-rock impedance ratio `(ρ Vs) / (ρr Vsr)`
    pub fn impedance_ratio(&self) -> f64 {
        (self.rho * self.vs) / (self.rock_den * self.rock_vs)
    }
}

impl ParameterSet for MaterialProperties {
    const NAME: &'static str = "MaterialProperties";

    const FIELDS: &'static [&'static str] = &[
        "Vs",
        "rho",
        "nu",
        "cohesion",
        "peakStrain",
        "refPress",
        "phi",
        "pressCoeff",
        "rock_Vs",
        "rockDen",
        "soilDepth",
    ];

    const DERIVED: &'static [&'static str] = &["G", "E", "K"];

    fn get(&self, key: &str) -> Option<ParamValue> {
        let value = match key {
            "Vs" => self.vs,
            "rho" => self.rho,
            "nu" => self.nu,
            "cohesion" => self.cohesion,
            "peakStrain" => self.peak_strain,
            "refPress" => self.ref_press,
            "phi" => self.phi,
            "pressCoeff" => self.press_coeff,
            "rock_Vs" => self.rock_vs,
            "rockDen" => self.rock_den,
            "soilDepth" => self.soil_depth,
            "G" => self.shear_modulus(),
            "E" => self.young_modulus(),
            "K" => self.bulk_modulus(),
            _ => return None,
        };
        Some(ParamValue::Real(value))
    }

    fn set_field(&mut self, key: &str, value: &ParamValue) -> Result<(), Error> {
        let x = value.as_f64(Self::NAME, key)?;
        match key {
            "Vs" => self.set_vs(x)?,
            "rho" => self.set_rho(x)?,
            "nu" => self.set_nu(x)?,
            "cohesion" => self.set_cohesion(x)?,
            "peakStrain" => self.set_peak_strain(x)?,
            "refPress" => self.set_ref_press(x)?,
            "phi" => self.set_phi(x)?,
            "pressCoeff" => self.set_press_coeff(x)?,
            "rock_Vs" => self.set_rock_vs(x)?,
            "rockDen" => self.set_rock_den(x)?,
            "soilDepth" => self.set_soil_depth(x)?,
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

impl fmt::Display for MaterialProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mapping(f, "Material properties", &self.to_mapping())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MaterialProperties;
    use crate::base::{Error, ParamValue, ParameterSet};
    use russell_lab::approx_eq;

    #[test]
    fn new_works() {
        let mat = MaterialProperties::new();
        assert_eq!(mat.vs(), 100.0);
        assert_eq!(mat.rho(), 1.7);
        assert_eq!(mat.nu(), 0.0);
        assert_eq!(mat.cohesion(), 95.0);
        assert_eq!(mat.peak_strain(), 0.05);
        assert_eq!(mat.ref_press(), 100.0);
        assert_eq!(mat.phi(), 0.0);
        assert_eq!(mat.press_coeff(), 0.0);
        assert_eq!(mat.rock_vs(), 760.0);
        assert_eq!(mat.rock_den(), 2.4);
        assert_eq!(mat.soil_depth(), 30.0);
    }

    #[test]
    fn moduli_work() {
        let mat = MaterialProperties::new();
        approx_eq(mat.shear_modulus(), 17000.0, 1e-10);
        approx_eq(mat.young_modulus(), 34000.0, 1e-10);
        approx_eq(mat.bulk_modulus(), 34000.0 / 3.0, 1e-10);
        approx_eq(mat.site_period(), 1.2, 1e-15);
        approx_eq(mat.impedance_ratio(), 170.0 / 1824.0, 1e-15);
    }

    #[test]
    fn moduli_follow_mutations() -> Result<(), Error> {
        let mut mat = MaterialProperties::new();
        for rho in [1.5, 1.9, 2.1] {
            for vs in [80.0, 250.0, 600.0] {
                for nu in [0.0, 0.25, 0.3, 0.49] {
                    mat.update([("rho", rho), ("Vs", vs), ("nu", nu)])?;
                    let gg = rho * vs * vs;
                    let ee = 2.0 * gg * (1.0 + nu);
                    approx_eq(mat.shear_modulus(), gg, 1e-9);
                    approx_eq(mat.young_modulus(), ee, 1e-9);
                    approx_eq(mat.bulk_modulus(), ee / (3.0 * (1.0 - 2.0 * nu)), 1e-6);
                }
            }
        }
        mat.set_vs(200.0)?.set_rho(2.0)?.set_nu(0.25)?;
        approx_eq(mat.shear_modulus(), 80000.0, 1e-10);
        approx_eq(mat.young_modulus(), 200000.0, 1e-10);
        approx_eq(mat.bulk_modulus(), 200000.0 / 1.5, 1e-9);
        Ok(())
    }

    #[test]
    fn from_fields_works() -> Result<(), Error> {
        let mat = MaterialProperties::from_fields([("Vs", 250.0), ("soilDepth", 45.0), ("rockDen", 2.5)])?;
        assert_eq!(mat.vs(), 250.0);
        assert_eq!(mat.soil_depth(), 45.0);
        assert_eq!(mat.rock_den(), 2.5);
        assert_eq!(mat.rho(), 1.7);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut mat = MaterialProperties::new();
        assert_eq!(
            mat.set_nu(0.5).err().unwrap().to_string(),
            "MaterialProperties.nu = 0.5 is incorrect; it must be 0.0 ≤ ν < 0.5"
        );
        assert_eq!(
            mat.set_vs(0.0).err().unwrap().to_string(),
            "MaterialProperties.Vs = 0.0 is incorrect; it must be > 0.0"
        );
        assert_eq!(
            mat.set_soil_depth(-30.0).err().unwrap().to_string(),
            "MaterialProperties.soilDepth = -30.0 is incorrect; it must be > 0.0"
        );
        assert_eq!(
            mat.set_phi(90.0).err().unwrap().to_string(),
            "MaterialProperties.phi = 90.0 is incorrect; it must be 0.0 ≤ φ < 90.0"
        );
        assert!(mat.set_rho(f64::NAN).is_err());
        assert_eq!(mat, MaterialProperties::new());
    }

    #[test]
    fn unknown_and_derived_keys_leave_fields_unchanged() {
        let mut mat = MaterialProperties::new();
        assert_eq!(
            mat.set("Vp", &ParamValue::Real(300.0)).err().unwrap().to_string(),
            "'MaterialProperties' has no parameter 'Vp'"
        );
        assert_eq!(
            mat.set("G", &ParamValue::Real(1.0)).err().unwrap().to_string(),
            "'MaterialProperties' parameter 'G' is derived and cannot be set"
        );
        assert_eq!(
            mat.set("Vs", &ParamValue::from("fast")).err().unwrap().to_string(),
            "MaterialProperties.Vs = \"fast\" is incorrect; expected a number"
        );
        assert_eq!(mat, MaterialProperties::new());
    }

    #[test]
    fn to_mapping_works() {
        let mat = MaterialProperties::new();
        let map = mat.to_mapping();
        assert_eq!(map.len(), 14);
        assert_eq!(map["Vs"], ParamValue::Real(100.0));
        assert_eq!(map["soilDepth"], ParamValue::Real(30.0));
        match map["G"] {
            ParamValue::Real(gg) => approx_eq(gg, 17000.0, 1e-10),
            _ => panic!("G must be real"),
        }
        let mut other = MaterialProperties::new();
        other.set_vs(500.0).unwrap();
        let mut fields = map.clone();
        fields.retain(|key, _| !MaterialProperties::DERIVED.contains(&key.as_str()));
        other.load(&fields).unwrap();
        assert_eq!(other, mat);
    }

    #[test]
    fn display_works() {
        let mat = MaterialProperties::new();
        let text = format!("{}", mat);
        assert!(text.starts_with("Material properties\n===================\n"));
        assert!(text.contains("Vs = 100.0\n"));
        assert!(text.contains("soilDepth = 30.0\n"));
    }
}
