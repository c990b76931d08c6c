//! Service configuration loaded from TOML.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8000"
//!
//! [cors]
//! allow_origin  = ["http://localhost:3000"]
//! allow_methods = ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"]
//! allow_headers = ["content-type", "authorization"]
//! max_age       = 86400
//! ```
//!
//! Every section is optional. Without `[cors]` no CORS middleware is
//! installed and the router echoes any `Origin`.

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::middleware::CorsOptions;
use crate::router::Router;

/// Root configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: Option<CorsOptions>,
}

/// Listener settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address, `host:port`.
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: "0.0.0.0:8000".to_owned() }
    }
}

impl Config {
    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Installs the configured middleware on `router`.
    pub fn apply(&self, router: Router) -> Router {
        match &self.cors {
            Some(cors) => router.cors(cors.clone()),
            None => router,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.server.addr, "0.0.0.0:8000");
        assert!(cfg.cors.is_none());
    }

    #[test]
    fn parses_cors_section() {
        let cfg = Config::from_toml(
            r#"
            [server]
            addr = "127.0.0.1:9000"

            [cors]
            allow_origin = ["http://x.test"]
            allow_methods = ["GET", "DELETE"]
            max_age = 60
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.addr, "127.0.0.1:9000");
        let cors = cfg.cors.unwrap();
        assert_eq!(cors.allow_origin, vec!["http://x.test"]);
        assert_eq!(cors.allow_methods, vec![Method::Get, Method::Delete]);
        assert_eq!(cors.allow_headers, vec!["content-type"]);
        assert_eq!(cors.max_age, Some(60));
    }

    #[test]
    fn unknown_method_in_cors_is_a_parse_error() {
        let err = Config::from_toml("[cors]\nallow_methods = [\"FETCH\"]").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load("/nonexistent/waypost.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/waypost.toml"));
    }

    #[test]
    fn apply_installs_cors_layer() {
        let cfg = Config::from_toml("[cors]\nallow_origin = [\"*\"]").unwrap();
        let router = cfg.apply(Router::new());
        assert!(matches!(router.origin_policy(), crate::router::OriginPolicy::AllowList(_)));
    }
}
