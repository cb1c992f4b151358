use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Invalid range: from ({from}) must not exceed to ({to})")]
    Construction { from: f64, to: f64 },

    #[error("Integer range [{from}, {to}] contains no integer")]
    EmptyIntegerRange { from: f64, to: f64 },

    #[error("String generator has no character classes or pool literals")]
    StringGenerator,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error("Stage '{0}' has already been defined, set override to replace it")]
    StageExists(String),

    #[error("Stage '{0}' was not found")]
    StageNotFound(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropsError {
    #[error("Cannot declare both fixed arguments and fixture dependencies")]
    BothArgumentKinds,

    #[error("Fixed arguments are set, clear them before setting fixture dependencies")]
    FixedArgsSet,

    #[error("Fixture dependencies are set, clear them before setting fixed arguments")]
    FixtureDepsSet,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("Fixture key not found: {0}")]
    Key(String),

    #[error("Cannot go deeper than first level fixtures: {0}")]
    NestingTooDeep(String),

    #[error("Assertion variable '{0}' has no descriptor")]
    DescriptorMissing(String),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Props(#[from] PropsError),
}
