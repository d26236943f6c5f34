//! Token vocabularies for sizes and colors.

use std::collections::BTreeSet;

use crate::errors::ProductSearchError;

/// Built-in size vocabulary.
pub const DEFAULT_SIZES: &[&str] = &["xxs", "xs", "s", "m", "l", "xl", "xxl", "xxxl"];

/// Built-in color vocabulary.
pub const DEFAULT_COLORS: &[&str] = &[
    "green", "black", "white", "blue", "yellow", "red", "brown", "orange", "grey",
];

/// Tokens of one query split by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTokens {
    /// Last size token of the query, if any.
    pub size: Option<String>,
    /// Last color token of the query, if any.
    pub color: Option<String>,
    /// Remaining tokens in input order.
    pub general: Vec<String>,
}

impl ClassifiedTokens {
    /// True when a size or color was recognized.
    pub fn has_attributes(&self) -> bool {
        self.size.is_some() || self.color.is_some()
    }

    /// General tokens joined by single spaces, or `None` when there are none.
    pub fn general_text(&self) -> Option<String> {
        if self.general.is_empty() {
            None
        } else {
            Some(self.general.join(" "))
        }
    }
}

/// Vocabulary partitioning query tokens into `size`, `color` and `general`.
///
/// Entries are stored lower-cased. The two vocabularies must be disjoint,
/// otherwise a token could belong to both categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    sizes: BTreeSet<String>,
    colors: BTreeSet<String>,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.iter().map(|s| s.to_string()).collect(),
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ClassificationTable {
    /// Create a table from custom vocabularies.
    ///
    /// Entries are trimmed and lower-cased; blank entries are ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(ClassificationTable)` - If the vocabularies are disjoint
    /// * `Err(ProductSearchError::ConfigurationError)` - If a term is both a size and a color
    pub fn new<S, C>(sizes: S, colors: C) -> Result<Self, ProductSearchError>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let sizes = normalize(sizes);
        let colors = normalize(colors);

        let overlap: Vec<&str> = sizes.intersection(&colors).map(String::as_str).collect();
        if !overlap.is_empty() {
            return Err(ProductSearchError::configuration(format!(
                "Size and color vocabularies overlap: {}",
                overlap.join(", ")
            )));
        }

        Ok(Self { sizes, colors })
    }

    pub fn is_size(&self, token: &str) -> bool {
        self.sizes.contains(token)
    }

    pub fn is_color(&self, token: &str) -> bool {
        self.colors.contains(token)
    }

    /// Lower-case the text, split it on whitespace and classify every token.
    ///
    /// When several tokens of the same category appear the last one wins.
    pub fn classify(&self, text: &str) -> ClassifiedTokens {
        let mut classified = ClassifiedTokens::default();

        for token in text.to_lowercase().split_whitespace() {
            if self.is_size(token) {
                classified.size = Some(token.to_string());
            } else if self.is_color(token) {
                classified.color = Some(token.to_string());
            } else {
                classified.general.push(token.to_string());
            }
        }

        classified
    }
}

fn normalize<I>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabularies_are_disjoint() {
        let table = ClassificationTable::default();
        assert!(ClassificationTable::new(DEFAULT_SIZES, DEFAULT_COLORS).is_ok());
        assert!(table.is_size("xxl"));
        assert!(table.is_color("grey"));
        assert!(!table.is_size("grey"));
    }

    #[test]
    fn test_classify_mixed_query() {
        let table = ClassificationTable::default();
        let tokens = table.classify("Calvin klein L blue ankle skinny jeans");

        assert_eq!(tokens.size.as_deref(), Some("l"));
        assert_eq!(tokens.color.as_deref(), Some("blue"));
        assert_eq!(
            tokens.general,
            vec!["calvin", "klein", "ankle", "skinny", "jeans"]
        );
        assert_eq!(
            tokens.general_text().as_deref(),
            Some("calvin klein ankle skinny jeans")
        );
    }

    #[test]
    fn test_last_match_wins() {
        let table = ClassificationTable::default();
        let tokens = table.classify("red S jeans blue  XL");

        assert_eq!(tokens.size.as_deref(), Some("xl"));
        assert_eq!(tokens.color.as_deref(), Some("blue"));
        assert_eq!(tokens.general, vec!["jeans"]);
    }

    #[test]
    fn test_only_attributes() {
        let tokens = ClassificationTable::default().classify("m black");
        assert!(tokens.has_attributes());
        assert!(tokens.general_text().is_none());
    }

    #[test]
    fn test_no_attributes() {
        let tokens = ClassificationTable::default().classify("skinny   jeans");
        assert!(!tokens.has_attributes());
        assert_eq!(tokens.general, vec!["skinny", "jeans"]);
    }

    #[test]
    fn test_custom_table() {
        let table = ClassificationTable::new(["Small", " Large ", ""], ["Navy"]).unwrap();
        let tokens = table.classify("navy LARGE chinos");
        assert_eq!(tokens.size.as_deref(), Some("large"));
        assert_eq!(tokens.color.as_deref(), Some("navy"));
        assert_eq!(tokens.general, vec!["chinos"]);
        // built-in vocabulary is not consulted
        assert!(!table.is_size("xl"));
    }

    #[test]
    fn test_overlapping_vocabularies_rejected() {
        let result = ClassificationTable::new(["s", "orange"], ["Orange", "red"]);
        assert!(matches!(
            result.unwrap_err(),
            ProductSearchError::ConfigurationError(msg) if msg.contains("orange")
        ));
    }
}
