use std::path::PathBuf;
use thiserror::Error;

/// Defines the error type of this crate
#[derive(Error, Debug)]
pub enum Error {
    /// The parameter set has no field with the given name
    #[error("'{owner}' has no parameter '{key}'")]
    UnknownParameter { owner: &'static str, key: String },

    /// The field is computed from other fields and cannot be set
    #[error("'{owner}' parameter '{key}' is derived and cannot be set")]
    DerivedParameter { owner: &'static str, key: String },

    /// The value is outside the physically meaningful range
    #[error("{owner}.{key} = {value} is incorrect; it must be {rule}")]
    InvalidParameter {
        owner: &'static str,
        key: &'static str,
        value: String,
        rule: &'static str,
    },

    /// The value has the wrong type for the field (e.g., text given to a real field)
    #[error("{owner}.{key} = {value} is incorrect; expected {expected}")]
    WrongType {
        owner: &'static str,
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A ground-motion file required by the study does not exist
    #[error("ground-motion file '{}' does not exist", .0.display())]
    MissingInput(PathBuf),

    /// A ground-motion file has a token that is not a number
    #[error("cannot parse ground-motion file '{}' at line {line}: '{token}'", .path.display())]
    MotionParse { path: PathBuf, line: usize, token: String },

    /// A ground-motion file has no samples
    #[error("ground-motion file '{}' has no samples", .0.display())]
    EmptyMotion(PathBuf),

    /// The result directory of the study cannot be created
    #[error("cannot create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sweep was requested before the inputs have been validated
    #[error("inputs of study '{0}' have not been prepared")]
    InputsNotPrepared(String),

    /// A sweep dimension was given no candidate values
    #[error("sweep dimension '{0}' has no candidate values")]
    EmptyRange(String),

    /// A sweep dimension name does not address a known parameter set
    #[error("sweep dimension '{0}' is invalid; it must be ground_motion, material.<key>, mesh.<key>, or analysis.<key>")]
    BadDimension(String),

    /// The external simulation engine reported a failure
    #[error("engine failed at sweep point {index}: {message}")]
    Engine { index: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
