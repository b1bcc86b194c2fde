//! `category.facet` field references.

use std::fmt;

/// A field reference split into its category (e.g. `donor`) and facet (e.g. `gender`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub category: String,
    pub facet: String,
}

impl Identifier {
    pub fn new(category: impl Into<String>, facet: impl Into<String>) -> Self {
        Self { category: category.into(), facet: facet.into() }
    }

    /// Reads the first two dot-separated segments. Returns `None` unless both are non-empty;
    /// any further segments are ignored.
    pub fn parse(id: &str) -> Option<Self> {
        let mut segments = id.trim().split('.');
        let category = segments.next().filter(|s| !s.is_empty())?;
        let facet = segments.next().filter(|s| !s.is_empty())?;
        Some(Self::new(category, facet))
    }

    /// Builds an identifier from separate parts, or `None` when the printed `category.facet`
    /// would not read back as the same pair: empty parts, dots, or characters outside
    /// letters, digits and underscores. The category must not start with a digit.
    pub fn from_parts(category: &str, facet: &str) -> Option<Self> {
        let starts_word = category.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_');
        (starts_word && is_segment(category) && is_segment(facet)).then(|| Self::new(category, facet))
    }
}

fn is_segment(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.facet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Identifier::parse("donor.gender"), Some(Identifier::new("donor", "gender")));
        assert_eq!(
            Identifier::parse("mutation.consequence.type"),
            Some(Identifier::new("mutation", "consequence"))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Identifier::parse("test"), None);
        assert_eq!(Identifier::parse(""), None);
        assert_eq!(Identifier::parse(".gender"), None);
        assert_eq!(Identifier::parse("donor."), None);
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(Identifier::from_parts("gene", "pathway_id2"), Some(Identifier::new("gene", "pathway_id2")));
        assert_eq!(Identifier::from_parts("", "gender"), None);
        assert_eq!(Identifier::from_parts("donor", ""), None);
        assert_eq!(Identifier::from_parts("donor.x", "y"), None);
        assert_eq!(Identifier::from_parts(".x", "id"), None);
        assert_eq!(Identifier::from_parts("donor", "a.b"), None);
        assert_eq!(Identifier::from_parts("1donor", "age"), None);
        assert_eq!(Identifier::from_parts("donor", "pathway-id"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(Identifier::new("gene", "pathwayId").to_string(), "gene.pathwayId");
    }
}
