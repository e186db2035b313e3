use super::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Defines the largest real converted to an integer (2⁵³; above it, reals are not exact integers)
const MAX_INTEGRAL_REAL: f64 = 9007199254740992.0;

/// Holds the mapping form of a parameter set (name → value)
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Holds a scalar parameter value
///
/// The JSON form is untagged: `4` is an integer, `4.0` is a real, and `"GM1"` is text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl ParamValue {
    /// Returns the value as a real number (integers are widened)
    pub fn as_f64(&self, owner: &'static str, key: &str) -> Result<f64, Error> {
        match self {
            ParamValue::Int(v) => Ok(*v as f64),
            ParamValue::Real(v) => Ok(*v),
            ParamValue::Text(_) => Err(self.wrong_type(owner, key, "a number")),
        }
    }

    /// Returns the value as a non-negative integer
    ///
    /// Reals are accepted if they have no fractional part (e.g., 4.0 from a JSON file)
    /// and do not exceed 2⁵³.
    pub fn as_usize(&self, owner: &'static str, key: &str) -> Result<usize, Error> {
        let converted = match self {
            ParamValue::Int(v) => usize::try_from(*v).ok(),
            ParamValue::Real(v) if *v >= 0.0 && *v <= MAX_INTEGRAL_REAL && v.fract() == 0.0 => {
                usize::try_from(*v as u64).ok()
            }
            _ => None,
        };
        converted.ok_or_else(|| self.wrong_type(owner, key, "a non-negative integer"))
    }

    /// Returns the value as text
    pub fn as_str(&self, owner: &'static str, key: &str) -> Result<&str, Error> {
        match self {
            ParamValue::Text(s) => Ok(s.as_str()),
            _ => Err(self.wrong_type(owner, key, "text")),
        }
    }

    fn wrong_type(&self, owner: &'static str, key: &str, expected: &'static str) -> Error {
        Error::WrongType {
            owner,
            key: key.to_string(),
            value: self.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Real(v) => write!(f, "{:?}", v),
            ParamValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Real(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(v) => ParamValue::Int(v),
            Err(_) => ParamValue::Real(value as f64),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&ParamValue> for ParamValue {
    fn from(value: &ParamValue) -> Self {
        value.clone()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ParamMap, ParamValue};

    #[test]
    fn conversions_work() {
        let v = ParamValue::from(4);
        assert_eq!(v.as_f64("T", "k").unwrap(), 4.0);
        assert_eq!(v.as_usize("T", "k").unwrap(), 4);
        assert_eq!(ParamValue::from(4.0).as_usize("T", "k").unwrap(), 4);
        assert_eq!(
            ParamValue::from(4.5).as_usize("T", "k").err().unwrap().to_string(),
            "T.k = 4.5 is incorrect; expected a non-negative integer"
        );
        assert_eq!(
            ParamValue::from(-1).as_usize("T", "k").err().unwrap().to_string(),
            "T.k = -1 is incorrect; expected a non-negative integer"
        );
        assert_eq!(ParamValue::from(9007199254740992.0).as_usize("T", "k").unwrap(), 1 << 53);
        assert_eq!(
            ParamValue::from(1e300).as_usize("T", "k").err().unwrap().to_string(),
            "T.k = 1e300 is incorrect; expected a non-negative integer"
        );
        assert!(ParamValue::from(f64::INFINITY).as_usize("T", "k").is_err());
        assert!(ParamValue::from(f64::NAN).as_usize("T", "k").is_err());
        assert_eq!(ParamValue::from(i64::MAX).as_usize("T", "k").unwrap(), i64::MAX as usize);
        assert_eq!(ParamValue::from(usize::MAX), ParamValue::Real(usize::MAX as f64));
        assert_eq!(ParamValue::from("GM1").as_str("T", "k").unwrap(), "GM1");
        assert_eq!(
            ParamValue::from("GM1").as_f64("T", "k").err().unwrap().to_string(),
            "T.k = \"GM1\" is incorrect; expected a number"
        );
    }

    #[test]
    fn serde_works() {
        let json = r#"{"Vs": 150.0, "ele_per_wave": 8, "motion_path": "GM1.txt"}"#;
        let map: ParamMap = serde_json::from_str(json).unwrap();
        assert_eq!(map["Vs"], ParamValue::Real(150.0));
        assert_eq!(map["ele_per_wave"], ParamValue::Int(8));
        assert_eq!(map["motion_path"], ParamValue::Text("GM1.txt".to_string()));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Vs":150.0,"ele_per_wave":8,"motion_path":"GM1.txt"}"#);
    }
}
