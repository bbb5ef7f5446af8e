//! # Virtual Hosts
//! src/vhost/mod.rs
//!
//! Todo lo que decide *qué archivo* corresponde a una request:
//!
//! ```text
//! Host header → VirtualHostTable → raíz
//! raíz + path → PathResolver    → ResolvedTarget (contenido + legible)
//! ```

pub mod resolver;
pub mod table;

pub use resolver::{PathResolver, ResolvedTarget, DEFAULT_INDEX_FILE};
pub use table::{VirtualHostError, VirtualHostTable, DEFAULT_HOST};
