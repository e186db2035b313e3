use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Defines what happens when a ground-motion file is missing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInputPolicy {
    /// Stops the preparation at the first missing file; the study cannot run
    #[default]
    Abort,

    /// Records the missing file and removes it from the sweep
    Skip,
}

/// Holds an entry of the study log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StudyEvent {
    /// A sweep dimension has been defined
    RangeDefined { dimension: String, count: usize },

    /// A ground-motion file exists and has been read
    InputValidated { motion: String, npoint: usize },

    /// A ground-motion file does not exist
    InputMissing { motion: String, path: PathBuf },

    /// A missing ground motion was removed from the sweep
    InputSkipped { motion: String },

    /// All inputs have been validated
    InputsReady { count: usize },

    /// The engine was called for a sweep point
    PointStarted { index: usize },

    /// The engine finished a sweep point
    PointCompleted { index: usize },

    /// The sweep point could not be configured or the engine failed
    PointFailed { index: usize, reason: String },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{MissingInputPolicy, StudyEvent};

    #[test]
    fn serde_works() {
        let event = StudyEvent::InputValidated {
            motion: "GM1.txt".to_string(),
            npoint: 7990,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"input_validated","motion":"GM1.txt","npoint":7990}"#);
        let back: StudyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);

        assert_eq!(MissingInputPolicy::default(), MissingInputPolicy::Abort);
        let policy: MissingInputPolicy = serde_json::from_str(r#""skip""#).unwrap();
        assert_eq!(policy, MissingInputPolicy::Skip);
    }
}
