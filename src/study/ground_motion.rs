use crate::base::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Holds a ground-motion record sampled with a uniform time step
///
/// The file holds one sample per line (several whitespace-separated samples per line are
/// also accepted). Empty lines and lines starting with `#` are ignored.
#[derive(Clone, Debug)]
pub struct GroundMotion {
    /// Path of the file
    pub path: PathBuf,

    /// Samples in file order
    pub samples: Vec<f64>,
}

impl GroundMotion {
    /// Reads the whole record
    pub fn read<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::MissingInput(path));
        }
        let reader = BufReader::new(File::open(&path)?);
        let mut samples = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for token in trimmed.split_whitespace() {
                let value = token.parse::<f64>().map_err(|_| Error::MotionParse {
                    path: path.clone(),
                    line: index + 1,
                    token: token.to_string(),
                })?;
                samples.push(value);
            }
        }
        if samples.is_empty() {
            return Err(Error::EmptyMotion(path));
        }
        Ok(GroundMotion { path, samples })
    }

    /// Returns the number of samples
    pub fn npoint(&self) -> usize {
        self.samples.len()
    }

    /// Returns the duration of the record given the time step
    pub fn duration(&self, dt: f64) -> f64 {
        dt * (self.samples.len() as f64)
    }

    /// Returns the largest absolute sample (e.g., the PGA of an acceleration record)
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, x| f64::max(acc, x.abs()))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
