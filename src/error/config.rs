use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// Check `.env.example` for the variables the engine expects.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but does not hold a valid value.
    ///
    /// # Fields
    /// - `name` - Variable name
    /// - `value` - Raw value that failed to parse
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },
}
