use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ownership class of a yard. Drives the aggregation buckets of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    SelfOwned,
    JointVenture,
    External,
    /// Any label outside the closed set, kept verbatim.
    ///
    /// Only reachable through stored data; new yards are created with
    /// [`Category::parse_strict`].
    Other(String),
}

impl Category {
    /// The closed set of categories accepted for new yards.
    pub const KNOWN: [Category; 3] = [
        Category::SelfOwned,
        Category::JointVenture,
        Category::External,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::SelfOwned => "Self-owned",
            Category::JointVenture => "JV Dealer",
            Category::External => "External",
            Category::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    /// Parse a label, rejecting anything outside the closed set.
    pub fn parse_strict(label: &str) -> Result<Self, UnknownCategory> {
        match Category::from(label.to_string()) {
            Category::Other(other) => Err(UnknownCategory(other)),
            known => Ok(known),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "self-owned" | "self owned" | "self_owned" | "selfowned" => Category::SelfOwned,
            "jv dealer" | "jv" | "joint-venture" | "joint venture" | "joint_venture" => {
                Category::JointVenture
            }
            "external" => Category::External,
            _ => Category::Other(label),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label outside the closed category set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: Self-owned, JV Dealer, External)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse_strict(s)
    }
}

/// A tracked inventory location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yard {
    /// Primary key, immutable once created.
    pub name: String,
    #[serde(default)]
    pub owner: String,
    pub category: Category,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
}

impl Yard {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
            category,
            min: None,
            max: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_band(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Both thresholds, when both are configured.
    pub fn band(&self) -> Option<(u32, u32)> {
        self.min.zip(self.max)
    }

    /// Check the invariants a yard must hold before it is stored.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("yard name must not be empty".to_string());
        }
        if self.name.contains('/') {
            return Err(format!("yard name '{}' must not contain '/'", self.name));
        }
        if let Some((min, max)) = self.band() {
            if min > max {
                return Err(format!(
                    "yard '{}' has min threshold {} above max threshold {}",
                    self.name, min, max
                ));
            }
        }
        Ok(())
    }
}

/// All yards keyed by name.
pub type YardCatalog = BTreeMap<String, Yard>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_roundtrip() {
        for category in Category::KNOWN {
            let label = category.label().to_string();
            assert_eq!(Category::from(label), category);
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(Category::from("self-owned".to_string()), Category::SelfOwned);
        assert_eq!(Category::from("JV".to_string()), Category::JointVenture);
        assert_eq!(
            Category::from("joint-venture".to_string()),
            Category::JointVenture
        );
        assert_eq!(Category::from(" EXTERNAL ".to_string()), Category::External);
    }

    #[test]
    fn test_unknown_category_is_kept_verbatim() {
        let category = Category::from("Consignment".to_string());
        assert_eq!(category, Category::Other("Consignment".to_string()));
        assert!(!category.is_known());
        assert_eq!(String::from(category), "Consignment");
    }

    #[test]
    fn test_parse_strict_rejects_unknown() {
        assert_eq!(Category::parse_strict("External"), Ok(Category::External));
        let err = Category::parse_strict("Consignment").unwrap_err();
        assert_eq!(err, UnknownCategory("Consignment".to_string()));
        assert!("Consignment".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::JointVenture).unwrap();
        assert_eq!(json, "\"JV Dealer\"");
        let back: Category = serde_json::from_str("\"Mystery\"").unwrap();
        assert_eq!(back, Category::Other("Mystery".to_string()));
    }

    #[test]
    fn test_band_requires_both_thresholds() {
        let yard = Yard::new("North", Category::SelfOwned).with_band(Some(10), None);
        assert_eq!(yard.band(), None);
        let yard = yard.with_band(Some(10), Some(50));
        assert_eq!(yard.band(), Some((10, 50)));
    }

    #[test]
    fn test_validate() {
        assert!(Yard::new("North", Category::External).validate().is_ok());
        assert!(Yard::new("  ", Category::External).validate().is_err());
        assert!(Yard::new("a/b", Category::External).validate().is_err());
        let inverted = Yard::new("North", Category::External).with_band(Some(50), Some(10));
        assert!(inverted.validate().is_err());
        let equal = Yard::new("North", Category::External).with_band(Some(10), Some(10));
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn test_yard_deserializes_with_defaults() {
        let yard: Yard =
            serde_json::from_str(r#"{"name":"North","category":"External"}"#).unwrap();
        assert_eq!(yard.owner, "");
        assert_eq!(yard.min, None);
        assert_eq!(yard.max, None);
    }
}
