use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Explicit upstream nameservers, tried before the resolver files.
    #[serde(default)]
    pub name_servers: Vec<String>,

    /// Directory of override-record files. Empty means "derive from prefix".
    #[serde(default)]
    pub config_directory: String,

    #[serde(default = "default_resolv_files")]
    pub resolv_files: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            name_servers: Vec::new(),
            config_directory: String::new(),
            resolv_files: default_resolv_files(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:53".to_string()
}

fn default_resolv_files() -> Vec<String> {
    vec!["/etc/resolv.conf".to_string()]
}
