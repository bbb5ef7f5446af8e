//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.0 que necesita un servidor de archivos:
//!
//! - Parsing de la request line y del header `Host`
//! - Construcción y escritura de responses
//! - Códigos de estado
//! - Content-type según la extensión del archivo
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.0\r\n
//! Host: a.com\r\n
//! \r\n
//! ```
//!
//! No se leen bodies ni se mantienen conexiones persistentes: una request
//! por conexión.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

pub use mime::content_type_for;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
