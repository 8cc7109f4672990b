//! Development server configuration types.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerOptions {
    /// Apply hot updates instead of reloading the page
    #[serde(default = "default_true")]
    pub hot: bool,

    /// Print bundle information on every rebuild
    #[serde(default)]
    pub verbose: bool,

    /// Open a browser once the server is listening
    #[serde(default = "default_true")]
    pub open: bool,

    /// Show compile errors as a full-screen overlay in the browser
    #[serde(default = "default_true")]
    pub overlay: bool,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DevServerOptions {
    fn default() -> Self {
        Self {
            hot: true,
            verbose: false,
            open: true,
            overlay: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl DevServerOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::schema("dev_server.host", "host cannot be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::schema_with_hint(
                "dev_server.port",
                "port 0 is not a fixed port",
                "Pick a port between 1 and 65535, e.g. 8080",
            ));
        }
        Ok(())
    }

    /// Address the server listens on
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    8080
}
