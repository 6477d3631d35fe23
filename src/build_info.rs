//! Build metadata advertised in the `X-Powered-By` header.

use std::fmt;

pub const PRODUCT: &str = "Webshield";
pub const PROJECT_URL: &str = "https://github.com/webshield/webshield";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub product: String,
    pub version: String,
    pub build_date: String,
    pub url: String,
}

impl BuildInfo {
    /// Values baked in at compile time. `WEBSHIELD_BUILD_DATE` is set by the
    /// release pipeline; local builds report `dev`.
    pub fn current() -> Self {
        Self::from_lookup(|key| match key {
            "VERSION" => Some(env!("CARGO_PKG_VERSION").to_string()),
            "BUILD_DATE" => option_env!("WEBSHIELD_BUILD_DATE").map(str::to_string),
            _ => None,
        })
    }

    /// Construct from a custom lookup function (useful for tests).
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            product: PRODUCT.to_string(),
            version: lookup("VERSION").unwrap_or_else(|| "0.0.0".to_string()),
            build_date: lookup("BUILD_DATE").unwrap_or_else(|| "dev".to_string()),
            url: PROJECT_URL.to_string(),
        }
    }

    /// `<product>/<version>.<build-date> <url>`
    pub fn powered_by(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}.{} <{}>",
            self.product, self.version, self.build_date, self.url
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}
