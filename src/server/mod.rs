//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y acepta conexiones
//! 2. `pool`: workers de tamaño fijo que atienden las conexiones aceptadas
//! 3. `handler`: request → virtual host → archivo → response, una conexión

pub mod handler;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use handler::{ConnectionHandler, RequestError};
pub use pool::WorkerPool;
pub use tcp::{Server, ServerError};
