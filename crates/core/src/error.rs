use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter specification: {}", .0)]
    InvalidSpecification(String),

    #[error(
        "For a special parameter, only one of `glob`, `range` or `groups` should be defined, found: {}",
        .0.join(", ")
    )]
    AmbiguousSpecialParameter(Vec<&'static str>),

    #[error("A special parameter must define one of `glob`, `range` or `groups`.")]
    MissingResolutionMode,

    #[error("No match for glob `{}`", .pattern)]
    NoGlobMatch { pattern: String },

    #[error("Parameter `{}` resolved to no values.", .key)]
    EmptyResolution { key: String },

    #[error("Invalid glob pattern: {}", .0)]
    GlobPattern(#[from] glob::PatternError),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Parameter `{}` is not in the format key=value", .0)]
    ParameterFormat(String),
}

impl Error {
    pub fn invalid_specification(reason: impl Into<String>) -> Self {
        Self::InvalidSpecification(reason.into())
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}
