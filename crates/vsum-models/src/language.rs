//! Output language of generated summaries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Languages with localized summary section headers.
///
/// Any other requested code is summarized with English headers and the
/// code is passed through to the model verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLanguage {
    #[default]
    En,
    De,
}

impl SummaryLanguage {
    /// Pick the header set for a requested language code (case-insensitive,
    /// region suffixes ignored).
    pub fn from_code(code: &str) -> Self {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("de") {
            SummaryLanguage::De
        } else {
            SummaryLanguage::En
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLanguage::En => "en",
            SummaryLanguage::De => "de",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(SummaryLanguage::from_code("de"), SummaryLanguage::De);
        assert_eq!(SummaryLanguage::from_code("DE-at"), SummaryLanguage::De);
        assert_eq!(SummaryLanguage::from_code("en"), SummaryLanguage::En);
        assert_eq!(SummaryLanguage::from_code("fr"), SummaryLanguage::En);
        assert_eq!(SummaryLanguage::from_code(""), SummaryLanguage::En);
    }
}
