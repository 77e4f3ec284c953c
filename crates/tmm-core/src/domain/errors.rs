use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TmmResult<T> = Result<T, TmmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmmErrorCategory {
    ConfigurationError,
    DomainError,
    NumericalError,
}

impl TmmErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::DomainError => "DomainError",
            Self::NumericalError => "NumericalError",
        }
    }

    /// Configuration and domain failures are caught before a sweep starts.
    pub const fn is_pre_sweep(self) -> bool {
        matches!(self, Self::ConfigurationError | Self::DomainError)
    }
}

impl Display for TmmErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmmError {
    category: TmmErrorCategory,
    placeholder: &'static str,
    message: String,
    sample: Option<SampleLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleLocation {
    pub index: usize,
    pub wavelength: f64,
}

impl TmmError {
    pub fn new(
        category: TmmErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
            sample: None,
        }
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(TmmErrorCategory::ConfigurationError, placeholder, message)
    }

    pub fn domain(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(TmmErrorCategory::DomainError, placeholder, message)
    }

    pub fn numerical(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(TmmErrorCategory::NumericalError, placeholder, message)
    }

    /// Attach the wavelength sample that was being evaluated when the error occurred.
    pub fn at_sample(mut self, index: usize, wavelength: f64) -> Self {
        self.sample = Some(SampleLocation { index, wavelength });
        self
    }

    pub const fn category(&self) -> TmmErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sample(&self) -> Option<SampleLocation> {
        self.sample
    }

    pub fn sample_index(&self) -> Option<usize> {
        self.sample.map(|sample| sample.index)
    }

    pub fn diagnostic_line(&self) -> String {
        match self.sample {
            Some(sample) => format!(
                "ERROR: [{}] sample {} (wavelength {:.6e} m): {}",
                self.placeholder, sample.index, sample.wavelength, self.message
            ),
            None => format!("ERROR: [{}] {}", self.placeholder, self.message),
        }
    }
}

impl Display for TmmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )?;
        if let Some(sample) = self.sample {
            write!(
                f,
                " (sample {}, wavelength {:e} m)",
                sample.index, sample.wavelength
            )?;
        }
        Ok(())
    }
}

impl Error for TmmError {}
