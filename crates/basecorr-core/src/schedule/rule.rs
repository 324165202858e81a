//! Date generation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Rule used to generate the dates of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateGenerationRule {
    /// Backward from the termination date to the effective date.
    #[default]
    Backward,
    /// Forward from the effective date to the termination date.
    Forward,
    /// No intermediate dates between the effective and termination dates.
    Zero,
    /// Intermediate dates are the third Wednesday of their month.
    ThirdWednesday,
    /// All dates but the effective date are the 20th of a month.
    Twentieth,
    /// All dates but the effective date are the 20th of an IMM month
    /// (March, June, September, December).
    TwentiethIMM,
    /// Same as `TwentiethIMM` with unrestricted date ends and a 30-day
    /// short front stub limit.
    OldCDS,
    /// Credit derivatives standard rule (Big Bang 2009).
    CDS,
    /// Credit derivatives standard rule with the December 2015 semi-annual
    /// roll amendment.
    CDS2015,
}

impl DateGenerationRule {
    /// Returns true for the three CDS roll rules.
    #[must_use]
    pub fn is_cds(&self) -> bool {
        matches!(
            self,
            DateGenerationRule::OldCDS | DateGenerationRule::CDS | DateGenerationRule::CDS2015
        )
    }

    /// Returns true for the rules that roll on the 20th of a month.
    #[must_use]
    pub fn is_twentieth(&self) -> bool {
        matches!(
            self,
            DateGenerationRule::Twentieth | DateGenerationRule::TwentiethIMM
        ) || self.is_cds()
    }

    /// Returns true for the rules restricted to IMM months.
    #[must_use]
    pub fn is_imm_twentieth(&self) -> bool {
        matches!(self, DateGenerationRule::TwentiethIMM) || self.is_cds()
    }

    /// Parses a rule name, ignoring case and separators.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSchedule` for unknown names.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        match key.as_str() {
            "BACKWARD" => Ok(DateGenerationRule::Backward),
            "FORWARD" => Ok(DateGenerationRule::Forward),
            "ZERO" => Ok(DateGenerationRule::Zero),
            "THIRDWEDNESDAY" => Ok(DateGenerationRule::ThirdWednesday),
            "TWENTIETH" => Ok(DateGenerationRule::Twentieth),
            "TWENTIETHIMM" => Ok(DateGenerationRule::TwentiethIMM),
            "OLDCDS" => Ok(DateGenerationRule::OldCDS),
            "CDS" => Ok(DateGenerationRule::CDS),
            "CDS2015" => Ok(DateGenerationRule::CDS2015),
            _ => Err(CoreError::invalid_schedule(format!(
                "unknown date generation rule '{s}'"
            ))),
        }
    }
}

impl fmt::Display for DateGenerationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateGenerationRule::Backward => "Backward",
            DateGenerationRule::Forward => "Forward",
            DateGenerationRule::Zero => "Zero",
            DateGenerationRule::ThirdWednesday => "ThirdWednesday",
            DateGenerationRule::Twentieth => "Twentieth",
            DateGenerationRule::TwentiethIMM => "TwentiethIMM",
            DateGenerationRule::OldCDS => "OldCDS",
            DateGenerationRule::CDS => "CDS",
            DateGenerationRule::CDS2015 => "CDS2015",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_families() {
        assert!(DateGenerationRule::CDS2015.is_cds());
        assert!(DateGenerationRule::OldCDS.is_twentieth());
        assert!(DateGenerationRule::Twentieth.is_twentieth());
        assert!(!DateGenerationRule::Twentieth.is_imm_twentieth());
        assert!(!DateGenerationRule::Forward.is_twentieth());
    }

    #[test]
    fn test_parse_roundtrips_display() {
        for rule in [
            DateGenerationRule::Backward,
            DateGenerationRule::ThirdWednesday,
            DateGenerationRule::TwentiethIMM,
            DateGenerationRule::CDS2015,
        ] {
            assert_eq!(DateGenerationRule::parse(&rule.to_string()).unwrap(), rule);
        }
        assert_eq!(DateGenerationRule::parse("old-cds").unwrap(), DateGenerationRule::OldCDS);
        assert!(DateGenerationRule::parse("sideways").is_err());
    }

    #[test]
    fn test_serde_uses_variant_names() {
        assert_eq!(serde_json::to_string(&DateGenerationRule::CDS2015).unwrap(), "\"CDS2015\"");
        let rule: DateGenerationRule = serde_json::from_str("\"OldCDS\"").unwrap();
        assert_eq!(rule, DateGenerationRule::OldCDS);
    }
}
