//! # Parsing de Requests
//! src/http/request.rs
//!
//! Parser mínimo: sólo interesan la request line y el header `Host`.
//!
//! ## Formato aceptado
//!
//! ```text
//! GET /path HTTP/1.0\r\n
//! User-Agent: curl/7.68.0\r\n
//! Host: a.com:8080\r\n
//! \r\n
//! ```
//!
//! También se acepta una request "pelada" sin versión (`GET /path`), al estilo
//! HTTP/0.9. En ese caso la respuesta no lleva status line ni headers.
//!
//! Los headers se leen sólo hasta encontrar `Host:`; lo que venga después
//! no se consume.

use std::io::{self, BufRead};
use thiserror::Error;

/// Prefijo literal del único header que se interpreta
const HOST_PREFIX: &str = "Host:";

/// Método HTTP de la request line
///
/// Sólo `GET` se sirve; el resto existe para poder loguear y responder 501.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    /// Cualquier otro token, tal cual vino
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

/// Request parseada: método, path crudo, versión y host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,

    /// Path tal cual vino en la request line (sin decodificar)
    path: String,

    /// Versión de protocolo, o string vacío si no vino
    version: String,

    /// Valor del header `Host` sin puerto
    host: Option<String>,
}

/// Errores que pueden ocurrir al leer o parsear una request
#[derive(Debug, Error)]
pub enum ParseError {
    /// La request line no tiene ningún token
    #[error("Malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// El peer falló a mitad de la lectura
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

/// Resultado de examinar una línea de header
#[derive(Debug, PartialEq, Eq)]
enum HeaderLine {
    /// Línea vacía: fin de headers
    End,
    /// Header `Host`, con su valor si es utilizable
    Host(Option<String>),
    /// Cualquier otro header, se ignora
    Other,
}

impl Request {
    /// Parsea una request a partir de la request line y las líneas de header
    ///
    /// Las líneas de header se consumen hasta la primera línea vacía o hasta
    /// encontrar `Host:`, lo que ocurra primero.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use vhost_server::http::Request;
    ///
    /// let request = Request::parse("GET /a.html HTTP/1.0", ["Host: a.com:8080", ""]).unwrap();
    ///
    /// assert_eq!(request.path(), "/a.html");
    /// assert_eq!(request.host(), Some("a.com"));
    /// assert!(request.is_http_like());
    /// ```
    pub fn parse<I, S>(request_line: &str, header_lines: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (method, path, version) = Self::parse_request_line(request_line)?;

        let mut host = None;
        for line in header_lines {
            match Self::scan_header(line.as_ref()) {
                HeaderLine::End => break,
                HeaderLine::Host(value) => {
                    host = value;
                    break;
                }
                HeaderLine::Other => {}
            }
        }

        Ok(Request {
            method,
            path,
            version,
            host,
        })
    }

    /// Lee una request desde el socket, línea por línea
    ///
    /// Retorna `Ok(None)` si el peer cerró sin mandar nada.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Option<Self>, ParseError> {
        let request_line = match Self::read_line(reader)? {
            Some(line) => line,
            None => return Ok(None),
        };

        let (method, path, version) = Self::parse_request_line(&request_line)?;

        let mut host = None;
        while let Some(line) = Self::read_line(reader)? {
            match Self::scan_header(&line) {
                HeaderLine::End => break,
                HeaderLine::Host(value) => {
                    host = value;
                    break;
                }
                HeaderLine::Other => {}
            }
        }

        Ok(Some(Request {
            method,
            path,
            version,
            host,
        }))
    }

    /// Lee una línea terminada en `\n` (con o sin `\r`)
    ///
    /// Los bytes que no son UTF-8 se reemplazan en vez de fallar.
    fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
        let mut buffer = Vec::new();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }

        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }

        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    /// Parsea la request line: `METHOD [PATH [VERSION]]`
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let mut tokens = line.split_whitespace();

        let method = match tokens.next() {
            Some(token) => Method::from_token(token),
            None => return Err(ParseError::MalformedRequestLine(line.to_string())),
        };
        let path = tokens.next().unwrap_or("/").to_string();
        let version = tokens.next().unwrap_or("").to_string();

        Ok((method, path, version))
    }

    /// Clasifica una línea de header
    fn scan_header(line: &str) -> HeaderLine {
        if line.is_empty() {
            return HeaderLine::End;
        }

        let rest = match line.strip_prefix(HOST_PREFIX) {
            Some(rest) => rest,
            None => return HeaderLine::Other,
        };

        // El valor es lo que sigue al primer espacio
        let value = match line.split_once(' ') {
            Some((_, after_space)) => after_space.trim(),
            None => rest.trim(),
        };

        // Quitar el puerto
        let value = match value.split_once(':') {
            Some((name, _port)) => name,
            None => value,
        };

        if value.is_empty() {
            HeaderLine::Host(None)
        } else {
            HeaderLine::Host(Some(value.to_string()))
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path crudo del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP (puede ser vacía)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el host pedido, sin puerto
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Indica si la versión parece HTTP (`HTTP/...`)
    ///
    /// Sólo en ese caso la respuesta lleva status line y headers.
    pub fn is_http_like(&self) -> bool {
        self.version.starts_with("HTTP/")
    }
}
