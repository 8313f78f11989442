use std::fmt;

use x509_cert::name::Name;

/// A distinguished name in comparable form.
///
/// Names are compared by their RFC 4514 rendering, so attribute values that
/// only differ in their ASN.1 string type (PrintableString vs UTF8String)
/// are treated as the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn new(name: &Name) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_same_name_compares_equal() {
        let a = Name::from_str("CN=Root,O=Example").unwrap();
        let b = Name::from_str("CN=Root,O=Example").unwrap();
        assert_eq!(NormalizedName::new(&a), NormalizedName::new(&b));
    }

    #[test]
    fn test_different_names_differ() {
        let a = Name::from_str("CN=Root").unwrap();
        let b = Name::from_str("CN=Intermediate").unwrap();
        assert_ne!(NormalizedName::new(&a), NormalizedName::new(&b));
    }
}
