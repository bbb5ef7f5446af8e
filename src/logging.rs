//! # Logging
//! src/logging.rs
//!
//! Inicializa el subscriber de `tracing`. `RUST_LOG` tiene prioridad sobre
//! el nivel configurado.

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Si ya había uno instalado (por ejemplo en tests) no hace nada.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init("debug");
        init("info");
        tracing::info!("still logging");
    }
}
