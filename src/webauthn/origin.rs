//! Web origin bound to a client

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::errors::OriginError;

/// Tuple origin: scheme, host and effective port
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Parse an origin from any URL; path, query and fragment are discarded.
    ///
    /// # Errors
    /// Returns `OriginError` if the text is not a URL or has an opaque origin.
    pub fn parse(text: &str) -> Result<Self, OriginError> {
        let url = Url::parse(text)?;
        match url.origin() {
            url::Origin::Tuple(scheme, host, port) => {
                let port = Some(port).filter(|p| Some(*p) != default_port(&scheme));
                Ok(Self {
                    scheme,
                    host: host.to_string(),
                    port,
                })
            }
            url::Origin::Opaque(_) => Err(OriginError::Opaque(text.to_string())),
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, `None` when the scheme default applies
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "example.com".to_string(),
            port: None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_path() {
        let origin = Origin::parse("https://example.com/login?next=1").unwrap();
        assert_eq!(origin.to_string(), "https://example.com");
        assert_eq!(origin, Origin::default());
    }

    #[test]
    fn test_parse_keeps_explicit_port() {
        let origin = Origin::parse("http://localhost:8080").unwrap();
        assert_eq!(origin.scheme(), "http");
        assert_eq!(origin.host(), "localhost");
        assert_eq!(origin.port(), Some(8080));
        assert_eq!(origin.to_string(), "http://localhost:8080");
    }

    #[test]
    fn test_default_port_is_normalized() {
        let origin = Origin::parse("https://example.com:443").unwrap();
        assert_eq!(origin.port(), None);
        assert_eq!(origin, Origin::default());
    }

    #[test]
    fn test_rejects_opaque_and_invalid() {
        assert!(matches!(
            Origin::parse("data:text/plain,hello"),
            Err(OriginError::Opaque(_))
        ));
        assert!(Origin::parse("not a url").is_err());
    }
}
