//! Brazilian postal codes (CEP).

use serde::{Deserialize, Serialize};

/// An 8-digit CEP, digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Keep only the digits of `raw`.
    pub fn digits(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Parse `"01310-100"`, `"01310100"` and similar; must leave 8 digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = Self::digits(raw);
        (digits.len() == 8).then_some(Self(digits))
    }

    /// Get the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostalCode {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("invalid postal code: {}", raw))
    }
}

impl From<PostalCode> for String {
    fn from(cep: PostalCode) -> Self {
        cep.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", &self.0[..5], &self.0[5..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_punctuation() {
        let cep = PostalCode::parse("01310-100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
        assert_eq!(cep.to_string(), "01310-100");

        assert!(PostalCode::parse(" 12.904 290 ").is_some());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(PostalCode::parse("1234567").is_none());
        assert!(PostalCode::parse("123456789").is_none());
        assert!(PostalCode::parse("abcdefgh").is_none());
        assert!(PostalCode::parse("").is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let cep: PostalCode = serde_json::from_str(r#""12904-290""#).unwrap();
        assert_eq!(cep.to_string(), "12904-290");
        assert_eq!(serde_json::to_string(&cep).unwrap(), r#""12904290""#);

        assert!(serde_json::from_str::<PostalCode>(r#""123""#).is_err());
    }

    #[test]
    fn test_digits() {
        assert_eq!(PostalCode::digits("12a34-5"), "12345");
    }
}
