use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps personal data (traveler names) so it never reaches log output in clear.
///
/// `Debug` and `Display` keep only the first character; serialization is
/// transparent because API responses and storage need the real value.
#[derive(Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    /// True when the wrapped text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.as_ref().trim().is_empty()
    }

    fn redacted(&self) -> String {
        match self.0.as_ref().chars().next() {
            Some(first) => format!("{}***", first),
            None => String::new(),
        }
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({:?})", self.redacted())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Masked(value)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_name() {
        let name = Masked::from("Ana Lestari");
        assert_eq!(format!("{:?}", name), "Masked(\"A***\")");
        assert_eq!(name.to_string(), "A***");
    }

    #[test]
    fn test_serializes_real_value() {
        let name = Masked::from("Ana Lestari");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Ana Lestari\"");

        let back: Masked<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "Ana Lestari");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Masked::from("   ").is_blank());
        assert!(Masked::from("").is_blank());
        assert!(!Masked::from("Budi").is_blank());
    }
}
