//! Parsing the document store connection string

use url::Url;

use crate::{Error, Result};

/// Port used when the connection string names none.
pub const DEFAULT_PORT: u16 = 27017;

/// A validated document store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAddress {
    /// The connection string as given, handed to the driver unchanged
    pub uri: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl StoreAddress {
    /// Parse `mongodb://host[:port]/database[?options]`.
    ///
    /// Host and database name are required; the port defaults to 27017.
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(invalid("connection string is empty"));
        }

        let parsed = Url::parse(uri).map_err(|e| invalid(format!("{e}")))?;

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("could not extract a host name"))?
            .to_string();
        let port = parsed.port().unwrap_or(DEFAULT_PORT);

        let database = parsed.path().trim_matches('/').to_string();
        if database.is_empty() {
            return Err(invalid("could not extract a database name"));
        }
        if database.contains('/') {
            return Err(invalid(format!("database name '{database}' contains '/'")));
        }

        Ok(Self {
            uri: uri.to_string(),
            host,
            port,
            database,
        })
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidAddress {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_host_port_and_database() {
        let addr = StoreAddress::parse("mongodb://mongo:27018/sharelatex").unwrap();
        assert_eq!(addr.host, "mongo");
        assert_eq!(addr.port, 27018);
        assert_eq!(addr.database, "sharelatex");
    }

    #[test]
    fn port_defaults_when_absent() {
        let addr = StoreAddress::parse("mongodb://mongo/sharelatex?replicaSet=overleaf").unwrap();
        assert_eq!(addr.port, DEFAULT_PORT);
        assert_eq!(addr.database, "sharelatex");
        assert!(addr.uri.ends_with("replicaSet=overleaf"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("not a url")]
    #[case("mongodb://mongo")]
    #[case("mongodb://mongo/")]
    #[case("mongodb:///sharelatex")]
    #[case("mongodb://mongo/a/b")]
    fn rejects_incomplete_addresses(#[case] uri: &str) {
        let err = StoreAddress::parse(uri).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { .. }), "{uri}: {err}");
    }
}
