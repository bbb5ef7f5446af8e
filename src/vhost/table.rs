//! # Tabla de Virtual Hosts
//! src/vhost/table.rs
//!
//! Mapa inmutable `hostname → directorio raíz`. Se arma una vez al arrancar
//! y después sólo se lee, así que los workers la comparten detrás de un `Arc`
//! sin ningún lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Clave reservada del host de fallback
pub const DEFAULT_HOST: &str = "default";

/// Errores de la tabla de virtual hosts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VirtualHostError {
    /// Ni el host pedido ni `default` tienen raíz
    #[error("No root directory for host {0:?} and no default host configured")]
    NoRootConfigured(Option<String>),

    /// Entrada que no tiene la forma `HOST=DIR`
    #[error("Invalid virtual host entry {0:?}: expected HOST=DIR")]
    InvalidEntry(String),

    /// El mismo host aparece dos veces
    #[error("Virtual host {0:?} configured more than once")]
    DuplicateHost(String),
}

/// Mapa de hostname a directorio raíz, con fallback `default`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualHostTable {
    hosts: HashMap<String, PathBuf>,
}

impl VirtualHostTable {
    /// Crea la tabla a partir de un mapa ya armado
    pub fn new(hosts: HashMap<String, PathBuf>) -> Self {
        Self { hosts }
    }

    /// Crea la tabla desde entradas `HOST=DIR`
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::vhost::VirtualHostTable;
    ///
    /// let table = VirtualHostTable::from_entries(["a.com=/srv/a", "default=/srv/a"]).unwrap();
    /// assert_eq!(table.resolve(Some("a.com")).unwrap().to_str(), Some("/srv/a"));
    /// assert!(table.has_default());
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Result<Self, VirtualHostError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hosts = HashMap::new();

        for entry in entries {
            let (host, root) = Self::parse_entry(entry.as_ref())?;
            if hosts.contains_key(&host) {
                return Err(VirtualHostError::DuplicateHost(host));
            }
            hosts.insert(host, root);
        }

        Ok(Self { hosts })
    }

    /// Parsea una entrada `HOST=DIR`
    pub fn parse_entry(entry: &str) -> Result<(String, PathBuf), VirtualHostError> {
        let (host, root) = entry
            .split_once('=')
            .ok_or_else(|| VirtualHostError::InvalidEntry(entry.to_string()))?;

        let host = host.trim();
        let root = root.trim();
        if host.is_empty() || root.is_empty() {
            return Err(VirtualHostError::InvalidEntry(entry.to_string()));
        }

        Ok((host.to_string(), PathBuf::from(root)))
    }

    /// Combina dos tablas; las entradas de `other` pisan a las de `self`
    pub fn merge(mut self, other: VirtualHostTable) -> Self {
        self.hosts.extend(other.hosts);
        self
    }

    /// Raíz para el host pedido
    ///
    /// Orden: el host exacto, después `default`. Sin ninguno de los dos
    /// se retorna `NoRootConfigured`.
    pub fn resolve(&self, host: Option<&str>) -> Result<&Path, VirtualHostError> {
        host.and_then(|name| self.hosts.get(name))
            .or_else(|| self.hosts.get(DEFAULT_HOST))
            .map(PathBuf::as_path)
            .ok_or_else(|| VirtualHostError::NoRootConfigured(host.map(str::to_string)))
    }

    /// Indica si hay entrada `default`
    pub fn has_default(&self) -> bool {
        self.hosts.contains_key(DEFAULT_HOST)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Entradas ordenadas por hostname
    pub fn entries(&self) -> Vec<(&str, &Path)> {
        let mut entries: Vec<(&str, &Path)> = self
            .hosts
            .iter()
            .map(|(host, root)| (host.as_str(), root.as_path()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
