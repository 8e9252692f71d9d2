//! Industry-code eligibility rule

use crate::services::document::normalize_document;
use company_registry_client::RegistryRecord;

/// Accepts a registry record when its primary or any secondary CNAE matches
/// the allowed code. Codes are compared after stripping formatting, so
/// `"46.14-1-00"` and `4614100` are the same code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRule {
    allowed_code: String,
}

impl EligibilityRule {
    pub fn new(allowed_code: &str) -> Self {
        Self {
            allowed_code: normalize_document(allowed_code),
        }
    }

    pub fn allowed_code(&self) -> &str {
        &self.allowed_code
    }

    pub fn is_eligible(&self, record: &RegistryRecord) -> bool {
        if self.allowed_code.is_empty() {
            return false;
        }
        record
            .activity_codes()
            .any(|code| normalize_document(code) == self.allowed_code)
    }
}
