use scoring_core::{CompanyData, CompanyValidator, ValidationResult};

/// Fallback company-wide check used when no validator is injected
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicValidator;

impl CompanyValidator for BasicValidator {
    fn validate_company_data(&self, data: &CompanyData) -> ValidationResult {
        let mut result = ValidationResult::default();

        if data.id.trim().is_empty() {
            result.critical("id", "Company id is required");
        }
        if data.basic_info.name.trim().is_empty() {
            result.critical("basicInfo.name", "Company name is required");
        }
        if data.pipeline.programs.is_empty() {
            result.critical("pipeline.programs", "At least one pipeline program is required");
        }
        if data.financials.cash_position.map_or(false, |c| c < 0.0) {
            result.error("financials.cashPosition", "Cash position cannot be negative");
        }
        if data.financials.burn_rate.map_or(false, |b| b < 0.0) {
            result.error("financials.burnRate", "Burn rate cannot be negative");
        }
        if data.last_updated.is_none() {
            result.warn(
                "lastUpdated",
                "No snapshot date; recency is measured against the current time",
                Some("Set lastUpdated for reproducible scores"),
            );
        }

        result.completeness = crate::confidence::data_completeness(data);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring_core::fixtures;

    #[test]
    fn test_sample_company_passes() {
        let result = BasicValidator.validate_company_data(&fixtures::sample_company());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.completeness, 1.0);
    }

    #[test]
    fn test_missing_identity_and_pipeline_are_critical() {
        let mut company = fixtures::sample_company();
        company.id = String::new();
        company.pipeline.programs.clear();
        company.financials.burn_rate = Some(-1.0);

        let result = BasicValidator.validate_company_data(&company);
        assert!(!result.is_valid);
        assert_eq!(result.critical_errors().count(), 2);
        assert_eq!(result.errors.len(), 3);
    }
}
