//! # Servidor TCP con pool de workers
//! src/server/tcp.rs
//!
//! El thread principal sólo acepta conexiones; cada conexión aceptada se
//! encola en el `WorkerPool` y la atiende un `ConnectionHandler` de principio
//! a fin.

use crate::config::{Config, ConfigError};
use crate::server::handler::ConnectionHandler;
use crate::server::pool::WorkerPool;
use crate::vhost::PathResolver;
use std::io;
use std::net::{SocketAddr, TcpListener};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errores que impiden arrancar el servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("could not bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("could not start worker pool: {0}")]
    Pool(#[source] io::Error),
}

/// Servidor de archivos estáticos multi-host
pub struct Server {
    listener: TcpListener,
    pool: WorkerPool,
    handler: ConnectionHandler,
}

impl Server {
    /// Valida la configuración, arma la tabla de hosts y hace bind
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        config.validate()?;
        let hosts = config.virtual_hosts()?;
        config.print_summary(&hosts);

        let handler = ConnectionHandler::new(
            hosts,
            PathResolver::new(config.index_file.as_str()),
            &config.server_name,
        );
        Self::bind(&config.address(), config.workers, handler)
    }

    /// Hace bind en `address` y arranca `workers` threads
    ///
    /// Con puerto 0 el sistema elige uno libre; ver [`Server::local_addr`].
    pub fn bind(address: &str, workers: usize, handler: ConnectionHandler) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address).map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;
        let pool = WorkerPool::new(workers).map_err(ServerError::Pool)?;

        Ok(Self {
            listener,
            pool,
            handler,
        })
    }

    /// Dirección en la que quedó escuchando
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de aceptación; no retorna
    ///
    /// Un error al aceptar una conexión se loguea y el loop sigue.
    pub fn run(&self) {
        match self.local_addr() {
            Ok(addr) => info!(address = %addr, workers = self.pool.size(), "accepting connections"),
            Err(e) => warn!(error = %e, "accepting connections on unknown address"),
        }

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let handler = self.handler.clone();
                    self.pool.execute(move || handler.handle(stream));
                    debug!(queued = self.pool.queued(), "connection dispatched");
                }
                Err(e) => {
                    warn!(error = %e, "error accepting connection");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vhost::VirtualHostTable;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::{Shutdown, TcpStream};
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn handler_for(root: &TempDir) -> ConnectionHandler {
        let hosts = VirtualHostTable::from_entries([format!("default={}", root.path().display())]).unwrap();
        ConnectionHandler::new(hosts, PathResolver::default(), "test-server")
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let root = TempDir::new().unwrap();
        let server = Server::bind("127.0.0.1:0", 2, handler_for(&root)).unwrap();

        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_bind_port_in_use() {
        let root = TempDir::new().unwrap();
        let first = Server::bind("127.0.0.1:0", 1, handler_for(&root)).unwrap();
        let address = first.local_addr().unwrap().to_string();

        let second = Server::bind(&address, 1, handler_for(&root));
        assert!(matches!(second, Err(ServerError::Bind { .. })));
    }

    #[test]
    fn test_run_serves_connection() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("hello.txt"), "hello").unwrap();

        let server = Arc::new(Server::bind("127.0.0.1:0", 2, handler_for(&root)).unwrap());
        let addr = server.local_addr().unwrap();
        thread::spawn({
            let server = Arc::clone(&server);
            move || server.run()
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /hello.txt HTTP/1.0\r\n\r\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("hello"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        let root = TempDir::new().unwrap();
        let server = Arc::new(Server::bind("127.0.0.1:0", 1, handler_for(&root)).unwrap());
        let addr = server.local_addr().unwrap();
        thread::spawn({
            let server = Arc::clone(&server);
            move || server.run()
        });

        // Conectar y cerrar sin mandar nada no debe tumbar al worker
        drop(TcpStream::connect(addr).unwrap());

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /missing HTTP/1.0\r\n\r\n").unwrap();
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        assert!(String::from_utf8_lossy(&buf).contains("404 File Not Found"));
    }
}
