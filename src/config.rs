//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./vhost_server --port 8080 \
//!   --vhost a.com=./a_com_root \
//!   --vhost b.com=./b_com_root \
//!   --vhost default=./a_com_root
//! ```
//!
//! ### Archivo JSON de virtual hosts
//! ```bash
//! echo '{"a.com": "./a_com_root", "default": "./a_com_root"}' > vhosts.json
//! ./vhost_server --vhosts-file vhosts.json
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 VHOSTS=a.com=./a,default=./a ./vhost_server
//! ```

use crate::vhost::{VirtualHostError, VirtualHostTable, DEFAULT_INDEX_FILE};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Identificador que va en el header `Server`
pub const DEFAULT_SERVER_NAME: &str = concat!("vhost_server/", env!("CARGO_PKG_VERSION"));

/// Errores de configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    VirtualHost(#[from] VirtualHostError),

    #[error("could not read virtual hosts file {path}: {source}")]
    ReadVhostsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid virtual hosts file {path}: {source}")]
    ParseVhostsFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contenido de `--vhosts-file`: un objeto JSON `hostname → directorio`
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct VhostsFile {
    hosts: HashMap<String, PathBuf>,
}

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "vhost_server")]
#[command(about = "Servidor HTTP de archivos estáticos con virtual hosts")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers (conexiones atendidas en paralelo)
    #[arg(long, default_value = "50", env = "WORKERS")]
    pub workers: usize,

    /// Documento que se sirve para paths terminados en `/`
    #[arg(long = "index", default_value = DEFAULT_INDEX_FILE, env = "INDEX_FILE")]
    pub index_file: String,

    /// Virtual host con la forma HOST=DIR (repetible; `default` es el fallback)
    #[arg(long = "vhost", value_name = "HOST=DIR", env = "VHOSTS", value_delimiter = ',')]
    pub vhosts: Vec<String>,

    /// Archivo JSON `{"host": "dir", ...}` con virtual hosts adicionales
    #[arg(long = "vhosts-file", value_name = "PATH", env = "VHOSTS_FILE")]
    pub vhosts_file: Option<PathBuf>,

    /// Valor del header `Server`
    #[arg(long = "server-name", default_value = DEFAULT_SERVER_NAME, env = "SERVER_NAME")]
    pub server_name: String,

    /// Nivel de log (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use vhost_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be >= 1".to_string()));
        }

        if self.index_file.is_empty() {
            return Err(ConfigError::Invalid("index file name must not be empty".to_string()));
        }
        if self.index_file.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "index file name must not contain '/': {}",
                self.index_file
            )));
        }

        if self.vhosts.is_empty() && self.vhosts_file.is_none() {
            return Err(ConfigError::Invalid(
                "at least one virtual host is required (--vhost or --vhosts-file)".to_string(),
            ));
        }

        Ok(())
    }

    /// Arma la tabla de virtual hosts
    ///
    /// Primero se lee el archivo JSON (si hay) y después las entradas de
    /// `--vhost`, que pisan a las del archivo.
    pub fn virtual_hosts(&self) -> Result<VirtualHostTable, ConfigError> {
        let from_file = match &self.vhosts_file {
            Some(path) => Self::load_vhosts_file(path)?,
            None => VirtualHostTable::default(),
        };
        let from_cli = VirtualHostTable::from_entries(&self.vhosts)?;

        let table = from_file.merge(from_cli);
        if table.is_empty() {
            return Err(ConfigError::Invalid("virtual host table is empty".to_string()));
        }
        if !table.has_default() {
            warn!("no 'default' virtual host; unmatched hosts will get 500");
        }

        Ok(table)
    }

    /// Lee un objeto JSON `hostname → directorio`
    fn load_vhosts_file(path: &Path) -> Result<VirtualHostTable, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadVhostsFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file: VhostsFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseVhostsFile {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(VirtualHostTable::new(file.hosts))
    }

    /// Loguea un resumen de la configuración efectiva
    pub fn print_summary(&self, hosts: &VirtualHostTable) {
        info!(
            address = %self.address(),
            workers = self.workers,
            index = %self.index_file,
            server = %self.server_name,
            "configuration"
        );

        for (host, root) in hosts.entries() {
            info!(host, root = %root.display(), "virtual host");
        }
    }
}

impl Default for Config {
    /// Configuración por defecto (sin virtual hosts)
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            workers: 50,
            index_file: DEFAULT_INDEX_FILE.to_string(),
            vhosts: Vec::new(),
            vhosts_file: None,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_vhosts(entries: &[&str]) -> Config {
        Config {
            vhosts: entries.iter().map(|e| e.to_string()).collect(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 50);
        assert_eq!(config.index_file, "index.html");
        assert!(config.server_name.starts_with("vhost_server/"));
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "vhost_server",
            "--port",
            "9000",
            "--workers",
            "8",
            "--vhost",
            "a.com=/srv/a",
            "--vhost",
            "default=/srv/a,b.com=/srv/b",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.vhosts, vec!["a.com=/srv/a", "default=/srv/a", "b.com=/srv/b"]);
    }

    #[test]
    fn test_validate_success() {
        assert!(with_vhosts(&["default=."]).validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = with_vhosts(&["default=."]);
        config.workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_validate_index_file() {
        let mut config = with_vhosts(&["default=."]);
        config.index_file = String::new();
        assert!(config.validate().is_err());

        config.index_file = "../index.html".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_vhosts() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("virtual host"));
    }

    #[test]
    fn test_virtual_hosts_from_cli() {
        let table = with_vhosts(&["a.com=/srv/a", "default=/srv/d"]).virtual_hosts().unwrap();

        assert_eq!(table.resolve(Some("a.com")).unwrap(), Path::new("/srv/a"));
        assert_eq!(table.resolve(None).unwrap(), Path::new("/srv/d"));
    }

    #[test]
    fn test_virtual_hosts_invalid_entry() {
        let result = with_vhosts(&["a.com"]).virtual_hosts();
        assert!(matches!(
            result,
            Err(ConfigError::VirtualHost(VirtualHostError::InvalidEntry(_)))
        ));
    }

    #[test]
    fn test_virtual_hosts_duplicate_entry() {
        let result = with_vhosts(&["a.com=/x", "a.com=/y"]).virtual_hosts();
        assert!(matches!(
            result,
            Err(ConfigError::VirtualHost(VirtualHostError::DuplicateHost(_)))
        ));
    }

    #[test]
    fn test_virtual_hosts_file_merged_with_cli() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("vhosts.json");
        fs::write(&file, r#"{"a.com": "/file/a", "b.com": "/file/b", "default": "/file/a"}"#).unwrap();

        let mut config = with_vhosts(&["a.com=/cli/a"]);
        config.vhosts_file = Some(file);

        let table = config.virtual_hosts().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve(Some("a.com")).unwrap(), Path::new("/cli/a"));
        assert_eq!(table.resolve(Some("b.com")).unwrap(), Path::new("/file/b"));
    }

    #[test]
    fn test_virtual_hosts_file_missing() {
        let mut config = Config::default();
        config.vhosts_file = Some(PathBuf::from("/definitely/not/here.json"));

        assert!(matches!(
            config.virtual_hosts(),
            Err(ConfigError::ReadVhostsFile { .. })
        ));
    }

    #[test]
    fn test_virtual_hosts_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("vhosts.json");
        fs::write(&file, r#"["not", "an", "object"]"#).unwrap();

        let mut config = Config::default();
        config.vhosts_file = Some(file);

        assert!(matches!(
            config.virtual_hosts(),
            Err(ConfigError::ParseVhostsFile { .. })
        ));
    }

    #[test]
    fn test_virtual_hosts_without_default_is_allowed() {
        let table = with_vhosts(&["a.com=/srv/a"]).virtual_hosts().unwrap();
        assert!(!table.has_default());
    }

    #[test]
    fn test_print_summary() {
        let config = with_vhosts(&["default=."]);
        let table = config.virtual_hosts().unwrap();
        // No debe hacer panic
        config.print_summary(&table);
    }
}
