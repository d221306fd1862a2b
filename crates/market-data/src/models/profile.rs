use serde::{Deserialize, Serialize};

/// What a provider knows about the company behind a ticker.
///
/// Every field is optional: overview endpoints routinely return partial
/// records, or placeholder strings for fields they have no data for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub source: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
}

impl AssetProfile {
    /// The company name, unless it is blank or the provider's "None"
    /// placeholder.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != "None")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> AssetProfile {
        AssetProfile {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_name_is_trimmed() {
        assert_eq!(named(" Apple Inc ").display_name(), Some("Apple Inc"));
    }

    #[test]
    fn test_display_name_skips_placeholders() {
        assert_eq!(named("   ").display_name(), None);
        assert_eq!(named("None").display_name(), None);
        assert_eq!(AssetProfile::default().display_name(), None);
    }
}
