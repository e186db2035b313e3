use super::{sweep_combinations, GroundMotion, MissingInputPolicy, StudyEvent, SweepPoint, SweepRanges, SweepTarget};
use super::{BaseParameters, RunConfiguration, SiteResponseEngine, StudyResult, DIM_GROUND_MOTION};
use crate::base::{Error, ParamValue};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Defines the prefix of the result directory of a study
pub const RESULTS_DIR_PREFIX: &str = "Results_";

/// Defines the filename of the study summary
pub const SUMMARY_FILENAME: &str = "study-summary.json";

/// Orchestrates a parametric site-response study
///
/// The study goes through the following stages:
///
/// 1. [ParametricStudy::new] creates the result directory `Results_<name>`
/// 2. [ParametricStudy::define_parameter_range] (and [ParametricStudy::add_dimension]) define the sweep
/// 3. [ParametricStudy::prepare_inputs] checks that every ground-motion file exists
/// 4. [ParametricStudy::execute] calls the external engine once per sweep point
///
/// The sweep is sequential. Results and log entries are appended in sweep order.
pub struct ParametricStudy {
    /// Name of the study
    name: String,

    /// Directory holding the results of the study
    out_dir: PathBuf,

    /// Directory where relative ground-motion identifiers are resolved
    motion_dir: PathBuf,

    /// What to do with missing ground-motion files
    policy: MissingInputPolicy,

    /// Candidate values of each sweep dimension
    ranges: SweepRanges,

    /// Number of samples of each validated ground motion (in list order)
    motion_samples: Vec<(String, usize)>,

    /// Ground motions removed from the sweep because their file is missing
    skipped: Vec<String>,

    /// Indicates that the inputs have been validated after the last change of ranges
    prepared: bool,

    /// Results produced by the engine
    pub results: Vec<StudyResult>,

    /// Log of study events
    pub study_log: Vec<StudyEvent>,
}

impl ParametricStudy {
    /// Allocates a new instance and creates the result directory
    ///
    /// The directory is `<root_dir>/Results_<study_name>`. An existing directory is reused
    /// and its contents are kept. Ground-motion identifiers are resolved in `root_dir` unless
    /// [ParametricStudy::set_motion_dir] is called.
    pub fn new<P>(study_name: &str, root_dir: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let root = root_dir.as_ref();
        let out_dir = root.join(format!("{}{}", RESULTS_DIR_PREFIX, study_name));
        fs::create_dir_all(&out_dir).map_err(|source| Error::OutputDir {
            path: out_dir.clone(),
            source,
        })?;
        info!(study = study_name, out_dir = %out_dir.display(), "study created");
        Ok(ParametricStudy {
            name: study_name.to_string(),
            out_dir,
            motion_dir: root.to_path_buf(),
            policy: MissingInputPolicy::Abort,
            ranges: SweepRanges::new(),
            motion_samples: Vec::new(),
            skipped: Vec::new(),
            prepared: false,
            results: Vec::new(),
            study_log: Vec::new(),
        })
    }

    /// Sets the directory where relative ground-motion identifiers are resolved
    pub fn set_motion_dir<P>(&mut self, motion_dir: P) -> &mut Self
    where
        P: AsRef<Path>,
    {
        self.motion_dir = motion_dir.as_ref().to_path_buf();
        self.prepared = false;
        self
    }

    /// Sets what to do with missing ground-motion files
    pub fn set_missing_input_policy(&mut self, policy: MissingInputPolicy) -> &mut Self {
        self.policy = policy;
        self.prepared = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn motion_dir(&self) -> &Path {
        &self.motion_dir
    }

    pub fn missing_input_policy(&self) -> MissingInputPolicy {
        self.policy
    }

    pub fn ranges(&self) -> &SweepRanges {
        &self.ranges
    }

    /// Returns the number of samples of each validated ground motion
    pub fn motion_samples(&self) -> &[(String, usize)] {
        &self.motion_samples
    }

    /// Returns the ground motions removed from the sweep
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Returns whether the inputs have been validated
    pub fn inputs_prepared(&self) -> bool {
        self.prepared
    }

    /// Defines the ground-motion dimension of the sweep
    pub fn define_parameter_range<S>(&mut self, ground_motions: &[S]) -> Result<&mut Self, Error>
    where
        S: AsRef<str>,
    {
        let values = ground_motions.iter().map(|s| ParamValue::from(s.as_ref())).collect();
        self.add_dimension(DIM_GROUND_MOTION, values)
    }

    /// Adds (or replaces) a sweep dimension
    ///
    /// The name is `ground_motion`, `material.<key>`, `mesh.<key>`, or `analysis.<key>`.
    pub fn add_dimension(&mut self, name: &str, values: Vec<ParamValue>) -> Result<&mut Self, Error> {
        let target = SweepTarget::parse(name)?;
        if values.is_empty() {
            return Err(Error::EmptyRange(name.to_string()));
        }
        if target == SweepTarget::GroundMotion {
            for value in &values {
                value.as_str("ParametricStudy", name)?;
            }
        }
        info!(study = %self.name, dimension = name, count = values.len(), "range defined");
        self.study_log.push(StudyEvent::RangeDefined {
            dimension: name.to_string(),
            count: values.len(),
        });
        self.ranges.insert(name.to_string(), values);
        self.prepared = false;
        Ok(self)
    }

    /// Returns the path of a ground-motion file given its identifier
    pub fn resolve_motion(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.motion_dir.join(path)
        }
    }

    /// Validates the ground-motion files
    ///
    /// The candidates are checked in list order. With [MissingInputPolicy::Abort], the first
    /// missing file stops the preparation and the remaining candidates are not checked.
    /// With [MissingInputPolicy::Skip], the missing file is removed from the sweep.
    ///
    /// Returns the number of validated ground motions.
    pub fn prepare_inputs(&mut self) -> Result<usize, Error> {
        self.prepared = false;
        self.motion_samples.clear();
        self.skipped.clear();
        let candidates = self
            .ranges
            .get(DIM_GROUND_MOTION)
            .cloned()
            .ok_or_else(|| Error::EmptyRange(DIM_GROUND_MOTION.to_string()))?;
        for candidate in &candidates {
            let motion = candidate.as_str("ParametricStudy", DIM_GROUND_MOTION)?;
            let path = self.resolve_motion(motion);
            if !path.is_file() {
                self.study_log.push(StudyEvent::InputMissing {
                    motion: motion.to_string(),
                    path: path.clone(),
                });
                match self.policy {
                    MissingInputPolicy::Abort => {
                        warn!(study = %self.name, path = %path.display(), "missing ground motion; study aborted");
                        return Err(Error::MissingInput(path));
                    }
                    MissingInputPolicy::Skip => {
                        warn!(study = %self.name, path = %path.display(), "missing ground motion; skipped");
                        self.study_log.push(StudyEvent::InputSkipped {
                            motion: motion.to_string(),
                        });
                        self.skipped.push(motion.to_string());
                        continue;
                    }
                }
            }
            let record = GroundMotion::read(&path)?;
            debug!(motion, npoint = record.npoint(), "ground motion validated");
            self.study_log.push(StudyEvent::InputValidated {
                motion: motion.to_string(),
                npoint: record.npoint(),
            });
            self.motion_samples.push((motion.to_string(), record.npoint()));
        }
        let count = self.motion_samples.len();
        info!(study = %self.name, count, skipped = self.skipped.len(), "inputs ready");
        self.study_log.push(StudyEvent::InputsReady { count });
        self.prepared = true;
        Ok(count)
    }

    /// Returns the sweep points (without the skipped ground motions)
    pub fn sweep_points(&self) -> Vec<SweepPoint> {
        let mut ranges = self.ranges.clone();
        if let Some(motions) = ranges.get_mut(DIM_GROUND_MOTION) {
            motions.retain(|value| match value {
                ParamValue::Text(s) => !self.skipped.contains(s),
                _ => true,
            });
        }
        sweep_combinations(&ranges)
    }

    /// Returns the number of samples recorded for a ground motion
    pub fn motion_npoint(&self, motion: &str) -> Option<usize> {
        self.motion_samples
            .iter()
            .find(|(name, _)| name == motion)
            .map(|(_, npoint)| *npoint)
    }

    /// Builds the configuration of a sweep point
    pub fn run_configuration(&self, point: &SweepPoint, base: &BaseParameters) -> Result<RunConfiguration, Error> {
        match point.ground_motion() {
            Some(motion) => {
                let npoint = self
                    .motion_npoint(motion)
                    .ok_or_else(|| Error::InputsNotPrepared(self.name.clone()))?;
                let path = self.resolve_motion(motion);
                RunConfiguration::new(point, base, Some((&path, npoint)))
            }
            None => RunConfiguration::new(point, base, None),
        }
    }

    /// Runs the engine once per sweep point
    ///
    /// A point whose configuration is invalid, or whose run fails, is logged and the sweep
    /// continues with the next point.
    ///
    /// Returns the number of completed points.
    pub fn execute<E>(&mut self, base: &BaseParameters, engine: &mut E) -> Result<usize, Error>
    where
        E: SiteResponseEngine + ?Sized,
    {
        if !self.prepared {
            return Err(Error::InputsNotPrepared(self.name.clone()));
        }
        let mut completed = 0;
        for point in self.sweep_points() {
            let index = point.index;
            self.study_log.push(StudyEvent::PointStarted { index });
            let outcome = self
                .run_configuration(&point, base)
                .and_then(|config| engine.run(&config).map(|output| (config, output)));
            match outcome {
                Ok((config, output)) => {
                    info!(study = %self.name, point = index, "point completed");
                    let motion_path = match config.analysis.motion_path() {
                        "" => None,
                        p => Some(PathBuf::from(p)),
                    };
                    self.results.push(StudyResult {
                        point,
                        motion_path,
                        output,
                    });
                    self.study_log.push(StudyEvent::PointCompleted { index });
                    completed += 1;
                }
                Err(err) => {
                    warn!(study = %self.name, point = index, "point failed: {}", err);
                    self.study_log.push(StudyEvent::PointFailed {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(completed)
    }

    /// Writes the configuration of every sweep point as `point-#####.json` in the result directory
    ///
    /// These files are the input of an external engine run outside this process.
    pub fn write_run_configs(&self, base: &BaseParameters) -> Result<Vec<PathBuf>, Error> {
        if !self.prepared {
            return Err(Error::InputsNotPrepared(self.name.clone()));
        }
        let mut paths = Vec::new();
        for point in self.sweep_points() {
            let config = self.run_configuration(&point, base)?;
            let path = self.out_dir.join(format!("point-{:0>5}.json", point.index));
            config.write_json(&path)?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Returns a summary of the study
    pub fn summary(&self) -> StudySummary {
        StudySummary {
            name: self.name.clone(),
            out_dir: self.out_dir.clone(),
            ranges: self.ranges.clone(),
            motion_samples: self.motion_samples.clone(),
            skipped: self.skipped.clone(),
            results: self.results.clone(),
            study_log: self.study_log.clone(),
        }
    }

    /// Writes the summary to `study-summary.json` in the result directory
    pub fn write_summary(&self) -> Result<PathBuf, Error> {
        let path = self.out_dir.join(SUMMARY_FILENAME);
        self.summary().write_json(&path)?;
        Ok(path)
    }
}

/// Holds the state of a study as saved in the result directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    pub name: String,
    pub out_dir: PathBuf,
    pub ranges: SweepRanges,
    pub motion_samples: Vec<(String, usize)>,
    pub skipped: Vec<String>,
    pub results: Vec<StudyResult>,
    pub study_log: Vec<StudyEvent>,
}

impl StudySummary {
    /// Reads a JSON file containing this struct
    pub fn read_json<P>(full_path: &P) -> Result<Self, Error>
    where
        P: AsRef<Path> + ?Sized,
    {
        let file = File::open(full_path.as_ref())?;
        let summary = serde_json::from_reader(BufReader::new(file))?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), Error>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
