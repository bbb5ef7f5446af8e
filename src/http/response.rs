//! # Construcción y escritura de respuestas
//! src/http/response.rs
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Server: vhost_server/0.1.0\r\n
//! Content-length: 13\r\n
//! Content-type: text/html\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```
//!
//! Si la request no traía una versión `HTTP/...`, sólo se envía el body.

use super::StatusCode;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Content-type de las páginas de error
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Representa una respuesta completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta vacía con content-type HTML
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: HTML_CONTENT_TYPE.to_string(),
            body: Vec::new(),
        }
    }

    /// Cambia el content-type
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Respuesta 200 con el contenido de un archivo
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::http::{Response, StatusCode};
    ///
    /// let response = Response::file(b"hola".to_vec(), "text/plain");
    /// assert_eq!(response.status(), StatusCode::Ok);
    /// assert_eq!(response.content_length(), 4);
    /// ```
    pub fn file(contents: Vec<u8>, content_type: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type(content_type)
            .with_body_bytes(contents)
    }

    /// Página de error HTML para el código dado
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound);
    /// let body = String::from_utf8(response.body().to_vec()).unwrap();
    /// assert!(body.contains("HTTP Error 404: File Not Found"));
    /// ```
    pub fn error(status: StatusCode) -> Self {
        let body = format!(
            "<HTML><HEAD><TITLE>{}</TITLE></HEAD><BODY><H1>HTTP Error {}: {}</H1></BODY></HTML>",
            status.title(),
            status.as_u16(),
            status.reason_phrase()
        );
        Self::new(status).with_body_bytes(body.into_bytes())
    }

    /// Serializa la respuesta
    ///
    /// Con `include_head = false` sólo se devuelve el body (clientes sin
    /// versión HTTP en la request line).
    pub fn to_bytes(&self, include_head: bool, server: &str, now: DateTime<Utc>) -> Vec<u8> {
        if !include_head {
            return self.body.clone();
        }

        let head = format!(
            "{}\r\nDate: {}\r\nServer: {}\r\nContent-length: {}\r\nContent-type: {}\r\n\r\n",
            self.status.status_line(),
            http_date(now),
            server,
            self.body.len(),
            self.content_type
        );

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    /// Escribe la respuesta en el socket y hace flush
    pub fn write_to<W: Write>(&self, out: &mut W, include_head: bool, server: &str) -> io::Result<()> {
        out.write_all(&self.to_bytes(include_head, server, Utc::now()))?;
        out.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el content-type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Largo del body en bytes
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

/// Fecha en formato IMF-fixdate: `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
