//! Base correlation surface configuration.
//!
//! A serializable description of a surface: conventions, tenor and loss
//! grids, date generation and interpolation. Quotes are supplied separately
//! when the surface is built.
//!
//! # Example
//!
//! ```rust
//! use basecorr_credit::config::{BaseCorrelationConfig, Validate};
//!
//! let config = BaseCorrelationConfig::from_json(r#"{
//!     "name": "CDX.NA.IG",
//!     "tenors": ["3Y", "5Y", "7Y"],
//!     "loss_levels": [0.03, 0.07, 0.15],
//!     "rule": "CDS2015"
//! }"#).unwrap();
//! assert!(config.is_valid());
//! ```

use std::fmt;
use std::sync::Arc;

use basecorr_core::calendars::{BusinessDayConvention, CalendarId};
use basecorr_core::daycounts::DayCountConvention;
use basecorr_core::quotes::Quote;
use basecorr_core::schedule::{is_cds_tenor, DateGenerationRule};
use basecorr_core::settings::EvaluationDate;
use basecorr_core::types::{Date, Period};
use basecorr_math::interpolation2d::Interpolation2DMethod;
use serde::{Deserialize, Serialize};

use crate::base_correlation::{BaseCorrelationBuilder, BaseCorrelationTermStructure};
use crate::error::{CorrelationError, CorrelationResult};
use crate::validation::{check_loss_levels, check_tenors};

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
    /// Validation rule that was violated.
    pub rule: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Creates a validation error with a rule name.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref rule) = self.rule {
            write!(f, "{}: {} (rule: {})", self.field, self.message, rule)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> CorrelationResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(CorrelationError::config(messages.join("; ")))
    }
}

/// Configuration of a base correlation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCorrelationConfig {
    /// Configuration name/identifier, e.g. the index series.
    pub name: String,

    /// Description of this configuration.
    #[serde(default)]
    pub description: Option<String>,

    /// Settlement lag in business days.
    #[serde(default)]
    pub settlement_days: u32,

    /// Calendar.
    #[serde(default)]
    pub calendar: CalendarId,

    /// Business day convention.
    #[serde(default)]
    pub business_day_convention: BusinessDayConvention,

    /// Day count convention for tranche times.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Tranche tenors such as `"3Y"`, sorted.
    pub tenors: Vec<String>,

    /// Detachment loss levels, sorted fractions in (0, 1].
    pub loss_levels: Vec<f64>,

    /// Date tenors are applied to (`YYYY-MM-DD`). Defaults to the reference date.
    #[serde(default)]
    pub start_date: Option<String>,

    /// Date generation rule. Without one maturities are calendar advances.
    #[serde(default)]
    pub rule: Option<DateGenerationRule>,

    /// Interpolation scheme.
    #[serde(default)]
    pub interpolation: Interpolation2DMethod,

    /// Allow queries outside the grid.
    #[serde(default)]
    pub extrapolation: bool,
}

impl BaseCorrelationConfig {
    /// Creates a configuration with default conventions.
    pub fn new(name: impl Into<String>, tenors: &[&str], loss_levels: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settlement_days: 0,
            calendar: CalendarId::default(),
            business_day_convention: BusinessDayConvention::default(),
            day_count: DayCountConvention::default(),
            tenors: tenors.iter().map(|t| (*t).to_string()).collect(),
            loss_levels,
            start_date: None,
            rule: None,
            interpolation: Interpolation2DMethod::default(),
            extrapolation: false,
        }
    }

    /// Sets the date generation rule.
    #[must_use]
    pub fn with_rule(mut self, rule: DateGenerationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Sets the start date.
    #[must_use]
    pub fn with_start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date.to_string());
        self
    }

    /// Sets the interpolation scheme.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation2DMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the settlement lag.
    #[must_use]
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> CorrelationResult<Self> {
        serde_json::from_str(json).map_err(|e| CorrelationError::config(format!("invalid JSON: {e}")))
    }

    /// Parses a configuration from TOML.
    pub fn from_toml(text: &str) -> CorrelationResult<Self> {
        toml::from_str(text).map_err(|e| CorrelationError::config(format!("invalid TOML: {e}")))
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> CorrelationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CorrelationError::config(e.to_string()))
    }

    /// Parsed tenors.
    pub fn parsed_tenors(&self) -> CorrelationResult<Vec<Period>> {
        self.tenors
            .iter()
            .map(|t| t.parse::<Period>().map_err(CorrelationError::from))
            .collect()
    }

    /// Parsed start date, if any.
    pub fn parsed_start_date(&self) -> CorrelationResult<Option<Date>> {
        self.start_date
            .as_deref()
            .map(|s| Date::parse(s).map_err(CorrelationError::from))
            .transpose()
    }

    /// Validates the configuration and returns a builder following
    /// `evaluation_date`.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::Config` if the configuration is invalid.
    pub fn to_builder(
        &self,
        quotes: Vec<Vec<Arc<dyn Quote>>>,
        evaluation_date: Arc<EvaluationDate>,
    ) -> CorrelationResult<BaseCorrelationBuilder<Interpolation2DMethod>> {
        self.validate_or_error()?;

        let mut builder = BaseCorrelationBuilder::new()
            .with_settlement_days(self.settlement_days)
            .with_calendar(self.calendar.to_calendar())
            .with_convention(self.business_day_convention)
            .with_day_count(self.day_count)
            .with_tenors(self.parsed_tenors()?)
            .with_loss_levels(self.loss_levels.clone())
            .with_quotes(quotes)
            .with_evaluation_date(evaluation_date)
            .with_extrapolation(self.extrapolation)
            .with_interpolation(self.interpolation);

        if let Some(start) = self.parsed_start_date()? {
            builder = builder.with_start_date(start);
        }
        if let Some(rule) = self.rule {
            builder = builder.with_rule(rule);
        }
        Ok(builder)
    }

    /// Builds the surface described by this configuration.
    ///
    /// # Errors
    ///
    /// As for [`BaseCorrelationConfig::to_builder`] and
    /// [`BaseCorrelationBuilder::build`].
    pub fn build(
        &self,
        quotes: Vec<Vec<Arc<dyn Quote>>>,
        evaluation_date: Arc<EvaluationDate>,
    ) -> CorrelationResult<BaseCorrelationTermStructure> {
        let surface = self.to_builder(quotes, evaluation_date)?.build()?;
        tracing::debug!("built base correlation surface '{}'", self.name);
        Ok(surface)
    }
}

impl Validate for BaseCorrelationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        let mut tenors = Vec::with_capacity(self.tenors.len());
        for (i, text) in self.tenors.iter().enumerate() {
            match text.parse::<Period>() {
                Ok(tenor) => tenors.push(tenor),
                Err(e) => errors.push(ValidationError::new(format!("tenors[{i}]"), e.to_string())),
            }
        }
        if tenors.len() == self.tenors.len() {
            if let Err(e) = check_tenors(&tenors) {
                errors.push(ValidationError::with_rule("tenors", e.to_string(), "increasing_tenors"));
            }
        }

        if self.rule.is_some_and(|r| r.is_cds()) {
            for (i, tenor) in tenors.iter().enumerate() {
                if !is_cds_tenor(*tenor) {
                    errors.push(ValidationError::with_rule(
                        format!("tenors[{i}]"),
                        format!("Tenor {tenor} is not a multiple of 3 months"),
                        "cds_tenor",
                    ));
                }
            }
        }

        if let Err(e) = check_loss_levels(&self.loss_levels) {
            errors.push(ValidationError::with_rule(
                "loss_levels",
                e.to_string(),
                "increasing_loss_levels",
            ));
        }

        if let Some(ref start) = self.start_date {
            if let Err(e) = Date::parse(start) {
                errors.push(ValidationError::new("start_date", e.to_string()));
            }
        }

        errors
    }
}
