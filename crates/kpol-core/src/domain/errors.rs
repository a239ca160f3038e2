use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KpolResult<T> = Result<T, KpolError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Rejected while building an object, before any numeric work.
    Configuration,
    /// A single evaluation was requested outside the domain of definition.
    Domain,
    /// Quadrature, differentiation or tail matching could not produce a
    /// trustworthy number.
    NumericalFailure,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::Domain => "DomainError",
            Self::NumericalFailure => "NumericalFailure",
        }
    }

    pub const fn placeholder_prefix(self) -> &'static str {
        match self {
            Self::Configuration => "CONFIG",
            Self::Domain => "DOMAIN",
            Self::NumericalFailure => "NUMERIC",
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Errors of every module report the class they belong to.
pub trait Categorized {
    fn category(&self) -> ErrorCategory;

    /// Stable short code, e.g. `CONFIG.SUBTRACTION_ORDER`.
    fn placeholder(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpolError {
    category: ErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl KpolError {
    pub fn new(
        category: ErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Configuration, placeholder, message)
    }

    pub fn domain(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Domain, placeholder, message)
    }

    pub fn numerical_failure(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::NumericalFailure, placeholder, message)
    }

    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for KpolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for KpolError {}

/// Lifts any categorized module error into the crate-wide error.
pub fn classify<E>(error: E) -> KpolError
where
    E: Categorized + Display,
{
    KpolError::new(error.category(), error.placeholder(), error.to_string())
}
