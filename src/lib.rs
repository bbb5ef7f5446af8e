//! # VHost Server
//! src/lib.rs
//!
//! Servidor HTTP de archivos estáticos con virtual hosts: cada request se
//! resuelve, según su header `Host`, contra el directorio raíz de ese host.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de la request, responses, status codes, content-type
//! - `vhost`: tabla de virtual hosts y resolución segura de paths
//! - `server`: listener TCP, pool de workers y manejo de cada conexión
//! - `config`: argumentos CLI / variables de entorno
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use vhost_server::server::{ConnectionHandler, Server};
//! use vhost_server::vhost::{PathResolver, VirtualHostTable};
//!
//! let hosts = VirtualHostTable::from_entries(["a.com=./a_com_root", "default=./a_com_root"]).unwrap();
//! let handler = ConnectionHandler::new(hosts, PathResolver::default(), "vhost_server");
//! let server = Server::bind("127.0.0.1:8080", 50, handler).unwrap();
//! server.run();
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod server;
pub mod vhost;
