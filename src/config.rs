use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Host the HTTP server binds to.
    #[serde(default = "default_http_host")]
    pub http_host: String,

    /// HTTP port to listen on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Host the datagram receiver binds to. The submit route also
    /// sends its datagrams here.
    #[serde(default = "default_socket_host")]
    pub socket_host: String,

    /// Datagram port.
    #[serde(default = "default_socket_port")]
    pub socket_port: u16,

    /// Receive buffer for the datagram socket.
    ///
    /// Payloads larger than this are truncated by the transport; the
    /// receiver cannot detect the loss.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Root directory for the page assets and the static file tree.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Page served on GET /.
    #[serde(default = "default_index_page")]
    pub index_page: String,

    /// Page served on GET /messages.
    #[serde(default = "default_messages_page")]
    pub messages_page: String,

    /// Page served with every 404.
    #[serde(default = "default_error_page")]
    pub error_page: String,

    /// Path to the JSON store file.
    ///
    /// The file must exist and contain at least `{}` before the first
    /// submission arrives; the store writer never creates it.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Log level for tracing (e.g. "info", "debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_socket_host() -> String {
    "127.0.0.1".to_string()
}

fn default_socket_port() -> u16 {
    5000
}

fn default_buffer_size() -> usize {
    1024
}

fn default_base_dir() -> String {
    ".".to_string()
}

fn default_index_page() -> String {
    "index.html".to_string()
}

fn default_messages_page() -> String {
    "message.html".to_string()
}

fn default_error_page() -> String {
    "error.html".to_string()
}

fn default_storage_path() -> String {
    "storage/data.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            socket_host: default_socket_host(),
            socket_port: default_socket_port(),
            buffer_size: default_buffer_size(),
            base_dir: default_base_dir(),
            index_page: default_index_page(),
            messages_page: default_messages_page(),
            error_page: default_error_page(),
            storage_path: default_storage_path(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Self {
        let file = fs::read_to_string(Path::new(path))
            .expect("Failed to read config.json");

        serde_json::from_str::<AppConfig>(&file)
            .expect("Invalid config.json")
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Self {
        if Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            Self::default()
        }
    }
}
