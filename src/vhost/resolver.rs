//! # Resolución segura de paths
//! src/vhost/resolver.rs
//!
//! Combina la raíz de un virtual host con el path de la request y verifica
//! que el resultado quede dentro de la raíz.
//!
//! La verificación se hace sobre paths canónicos (symlinks resueltos, sin
//! `.` ni `..`) y comparando componente por componente, de modo que
//! `/srv/site-evil` nunca cuenta como dentro de `/srv/site`.

use std::borrow::Cow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Documento que se sirve cuando el path termina en `/`
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Resultado de resolver un path contra una raíz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub root_directory: PathBuf,

    /// `root_directory` unido al path pedido, sin canonicalizar
    pub candidate_path: PathBuf,

    /// Path canónico del candidato, si existe
    pub canonical_path: Option<PathBuf>,

    pub is_contained: bool,
    pub is_readable: bool,
}

impl ResolvedTarget {
    /// Sólo se sirve lo que está dentro de la raíz y se puede leer
    pub fn is_servable(&self) -> bool {
        self.is_contained && self.is_readable
    }

    /// Path a leer, únicamente si el target es servible
    pub fn servable_path(&self) -> Option<&Path> {
        if self.is_servable() {
            self.canonical_path.as_deref()
        } else {
            None
        }
    }
}

/// Resuelve paths de request contra raíces de virtual hosts
#[derive(Debug, Clone)]
pub struct PathResolver {
    index_file: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_FILE)
    }
}

impl PathResolver {
    pub fn new(index_file: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
        }
    }

    /// Path pedido con el documento índice agregado si termina en `/`
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::vhost::PathResolver;
    ///
    /// let resolver = PathResolver::default();
    /// assert_eq!(resolver.target_name("/docs/"), "/docs/index.html");
    /// assert_eq!(resolver.target_name("/a.css"), "/a.css");
    /// ```
    pub fn target_name<'a>(&self, request_path: &'a str) -> Cow<'a, str> {
        if request_path.ends_with('/') {
            Cow::Owned(format!("{}{}", request_path, self.index_file))
        } else {
            Cow::Borrowed(request_path)
        }
    }

    /// Resuelve `request_path` dentro de `root`
    pub fn resolve(&self, root: &Path, request_path: &str) -> ResolvedTarget {
        let target = self.target_name(request_path);
        let target: &str = &target;
        let relative = target.strip_prefix('/').unwrap_or(target);
        let candidate_path = root.join(relative);

        let canonical_root = fs::canonicalize(root).ok();
        let canonical_path = fs::canonicalize(&candidate_path).ok();

        let is_contained = match (&canonical_root, &canonical_path) {
            (Some(root), Some(candidate)) => is_within(root, candidate),
            _ => false,
        };
        let is_readable = canonical_path.as_deref().map_or(false, is_readable_file);

        ResolvedTarget {
            root_directory: root.to_path_buf(),
            candidate_path,
            canonical_path,
            is_contained,
            is_readable,
        }
    }
}

/// `candidate` es `root` o un descendiente, componente por componente
fn is_within(root: &Path, candidate: &Path) -> bool {
    let mut candidate_components = candidate.components();
    root.components()
        .all(|component| candidate_components.next() == Some(component))
}

fn is_readable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => File::open(path).is_ok(),
        _ => false,
    }
}
