use super::{check_real, write_mapping, Error, ParamValue, ParameterSet};
use russell_lab::math::PI;
use std::fmt;

/// Defines the lower frequency (Hz) where the Rayleigh damping matches the target ratio
pub const RAYLEIGH_FREQ_1: f64 = 0.2;

/// Defines the upper frequency (Hz) where the Rayleigh damping matches the target ratio
pub const RAYLEIGH_FREQ_2: f64 = 20.0;

/// Holds the time-integration and damping settings given to the external solver
///
/// The Rayleigh coefficients are computed on demand such that the damping ratio
/// `ξ(ω) = a0/(2ω) + a1·ω/2` equals `damp` at both [RAYLEIGH_FREQ_1] and [RAYLEIGH_FREQ_2]:
///
/// ```text
/// ω1 = 2π f1,  ω2 = 2π f2
/// a0 = 2 ξ ω1 ω2 / (ω1 + ω2)    (mass-proportional)
/// a1 = 2 ξ / (ω1 + ω2)          (stiffness-proportional)
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfiguration {
    /// Newmark coefficient γ
    gamma: f64,

    /// Newmark coefficient β
    beta: f64,

    /// Target damping ratio ξ
    damp: f64,

    /// Time step of the input motion
    motion_dt: f64,

    /// Number of samples of the input motion
    motion_steps: usize,

    /// Path to the ground-motion record
    motion_path: String,
}

impl AnalysisConfiguration {
    /// Allocates a new instance with default values
    ///
    /// The defaults correspond to the average-acceleration Newmark method (γ = 1/2, β = 1/4)
    /// with 2% damping.
    pub fn new() -> Self {
        AnalysisConfiguration {
            gamma: 0.5,
            beta: 0.25,
            damp: 0.02,
            motion_dt: 0.005,
            motion_steps: 7990,
            motion_path: String::new(),
        }
    }

    /// Allocates a new instance with the defaults overridden by the given fields
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let mut analysis = AnalysisConfiguration::new();
        analysis.update(fields)?;
        Ok(analysis)
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn damp(&self) -> f64 {
        self.damp
    }

    pub fn motion_dt(&self) -> f64 {
        self.motion_dt
    }

    pub fn motion_steps(&self) -> usize {
        self.motion_steps
    }

    pub fn motion_path(&self) -> &str {
        &self.motion_path
    }

    /// Sets the Newmark coefficient γ; 0 < γ ≤ 1
    pub fn set_gamma(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.gamma = check_real(Self::NAME, "gamma", value, |x| x > 0.0 && x <= 1.0, "0.0 < γ ≤ 1.0")?;
        Ok(self)
    }

    /// Sets the Newmark coefficient β; 0 < β ≤ 0.5
    pub fn set_beta(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.beta = check_real(Self::NAME, "beta", value, |x| x > 0.0 && x <= 0.5, "0.0 < β ≤ 0.5")?;
        Ok(self)
    }

    /// Sets the target damping ratio; 0 ≤ ξ < 1
    pub fn set_damp(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.damp = check_real(Self::NAME, "damp", value, |x| x >= 0.0 && x < 1.0, "0.0 ≤ ξ < 1.0")?;
        Ok(self)
    }

    pub fn set_motion_dt(&mut self, value: f64) -> Result<&mut Self, Error> {
        self.motion_dt = check_real(Self::NAME, "motion_dt", value, |x| x > 0.0, "> 0.0")?;
        Ok(self)
    }

    pub fn set_motion_steps(&mut self, value: usize) -> Result<&mut Self, Error> {
        self.motion_steps = value;
        Ok(self)
    }

    pub fn set_motion_path(&mut self, value: &str) -> Result<&mut Self, Error> {
        self.motion_path = value.to_string();
        Ok(self)
    }

    /// Returns the pair of angular frequencies (ω1, ω2) where the damping is matched
    pub fn rayleigh_omegas() -> (f64, f64) {
        (2.0 * PI * RAYLEIGH_FREQ_1, 2.0 * PI * RAYLEIGH_FREQ_2)
    }

    /// Returns the mass-proportional Rayleigh coefficient
    pub fn a0(&self) -> f64 {
        let (w1, w2) = AnalysisConfiguration::rayleigh_omegas();
        2.0 * self.damp * w1 * w2 / (w1 + w2)
    }

    /// Returns the stiffness-proportional Rayleigh coefficient
    pub fn a1(&self) -> f64 {
        let (w1, w2) = AnalysisConfiguration::rayleigh_omegas();
        2.0 * self.damp / (w1 + w2)
    }

    /// Returns the damping ratio produced by the Rayleigh coefficients at a frequency (Hz)
    pub fn damping_ratio_at(&self, freq: f64) -> f64 {
        let w = 2.0 * PI * freq;
        self.a0() / (2.0 * w) + self.a1() * w / 2.0
    }

    /// Returns whether the Newmark method is unconditionally stable (γ ≥ 1/2, β ≥ (γ + 1/2)²/4)
    pub fn is_unconditionally_stable(&self) -> bool {
        let g = self.gamma + 0.5;
        self.gamma >= 0.5 && self.beta >= 0.25 * g * g
    }

    /// Returns the duration of the input motion
    pub fn duration(&self) -> f64 {
        self.motion_dt * (self.motion_steps as f64)
    }
}

impl ParameterSet for AnalysisConfiguration {
    const NAME: &'static str = "AnalysisConfiguration";
    const FIELDS: &'static [&'static str] = &["gamma", "beta", "damp", "motion_dt", "motion_steps", "motion_path"];
    const DERIVED: &'static [&'static str] = &["a0", "a1"];

    fn get(&self, key: &str) -> Option<ParamValue> {
        match key {
            "gamma" => Some(self.gamma.into()),
            "beta" => Some(self.beta.into()),
            "damp" => Some(self.damp.into()),
            "motion_dt" => Some(self.motion_dt.into()),
            "motion_steps" => Some(self.motion_steps.into()),
            "motion_path" => Some(self.motion_path.as_str().into()),
            "a0" => Some(self.a0().into()),
            "a1" => Some(self.a1().into()),
            _ => None,
        }
    }

    fn set_field(&mut self, key: &str, value: &ParamValue) -> Result<(), Error> {
        match key {
            "gamma" => self.set_gamma(value.as_f64(Self::NAME, key)?)?,
            "beta" => self.set_beta(value.as_f64(Self::NAME, key)?)?,
            "damp" => self.set_damp(value.as_f64(Self::NAME, key)?)?,
            "motion_dt" => self.set_motion_dt(value.as_f64(Self::NAME, key)?)?,
            "motion_steps" => self.set_motion_steps(value.as_usize(Self::NAME, key)?)?,
            "motion_path" => self.set_motion_path(value.as_str(Self::NAME, key)?)?,
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

impl fmt::Display for AnalysisConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mapping(f, "Analysis configuration", &self.to_mapping())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
