//! # Manejo de una conexión
//! src/server/handler.rs
//!
//! Cada conexión pasa por:
//!
//! ```text
//! request line → headers → host → archivo → respuesta → cerrar
//! ```
//!
//! Todo error queda dentro de la conexión: se responde con la página de
//! error correspondiente o, si falló el socket, se loguea y se cierra.

use crate::http::{content_type_for, Method, ParseError, Request, Response, StatusCode};
use crate::vhost::{PathResolver, VirtualHostTable};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

/// Motivos por los que una request no se sirve con 200
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("no root directory configured for host {0:?}")]
    NoRootConfigured(Option<String>),

    /// Archivo inexistente, ilegible o fuera de la raíz; no se distinguen
    #[error("file not found")]
    FileUnreadableOrUnsafe,

    #[error("method {0} not implemented")]
    UnsupportedMethod(String),
}

impl RequestError {
    /// Código de estado con el que se responde
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MalformedRequestLine => StatusCode::BadRequest,
            RequestError::NoRootConfigured(_) => StatusCode::InternalServerError,
            RequestError::FileUnreadableOrUnsafe => StatusCode::NotFound,
            RequestError::UnsupportedMethod(_) => StatusCode::NotImplemented,
        }
    }
}

/// Estado compartido (sólo lectura) por todos los workers
#[derive(Debug)]
struct HandlerContext {
    hosts: VirtualHostTable,
    resolver: PathResolver,
    server_name: String,
}

/// Atiende conexiones de principio a fin; barato de clonar
#[derive(Debug, Clone)]
pub struct ConnectionHandler {
    context: Arc<HandlerContext>,
}

impl ConnectionHandler {
    pub fn new(hosts: VirtualHostTable, resolver: PathResolver, server_name: &str) -> Self {
        Self {
            context: Arc::new(HandlerContext {
                hosts,
                resolver,
                server_name: server_name.to_string(),
            }),
        }
    }

    /// Atiende una conexión y la cierra
    ///
    /// El stream se consume: al volver, el socket ya está cerrado sin
    /// importar cómo terminó la request.
    pub fn handle(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let span = info_span!("connection", peer = %peer);
        let _enter = span.enter();

        let mut reader = BufReader::new(&stream);
        let mut writer = &stream;

        if let Err(e) = self.serve(&mut reader, &mut writer) {
            warn!(error = %e, "error talking to peer");
        }

        if let Err(e) = stream.shutdown(Shutdown::Both) {
            debug!(error = %e, "error closing socket");
        }
    }

    /// Lee una request de `reader` y escribe la respuesta en `writer`
    ///
    /// Retorna el status enviado, o `None` si el peer no mandó nada.
    pub fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> io::Result<Option<StatusCode>>
    where
        R: BufRead,
        W: Write,
    {
        let server_name = self.context.server_name.as_str();

        let request = match Request::read_from(reader) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("peer closed before sending a request");
                return Ok(None);
            }
            Err(ParseError::Io(e)) => return Err(e),
            Err(ParseError::MalformedRequestLine(line)) => {
                warn!(line = %line, "malformed request line");
                let status = RequestError::MalformedRequestLine.status();
                // Sin versión no hay headers
                Response::error(status).write_to(writer, false, server_name)?;
                return Ok(Some(status));
            }
        };

        info!(
            method = request.method().as_str(),
            path = request.path(),
            version = request.version(),
            host = request.host().unwrap_or("-"),
            "request"
        );

        let response = match self.respond(&request) {
            Ok(response) => response,
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    warn!(reason = %e, status = status.as_u16(), "answering with error page");
                } else {
                    debug!(reason = %e, status = status.as_u16(), "answering with error page");
                }
                Response::error(status)
            }
        };

        response.write_to(writer, request.is_http_like(), server_name)?;
        info!(
            status = response.status().as_u16(),
            bytes = response.content_length(),
            "response sent"
        );

        Ok(Some(response.status()))
    }

    /// Decide la respuesta para una request ya parseada
    pub fn respond(&self, request: &Request) -> Result<Response, RequestError> {
        let root = self
            .context
            .hosts
            .resolve(request.host())
            .map_err(|_| RequestError::NoRootConfigured(request.host().map(str::to_string)))?;

        if request.method() != &Method::GET {
            return Err(RequestError::UnsupportedMethod(request.method().as_str().to_string()));
        }

        let resolver = &self.context.resolver;
        let target = resolver.resolve(root, request.path());
        debug!(
            candidate = %target.candidate_path.display(),
            contained = target.is_contained,
            readable = target.is_readable,
            "resolved target"
        );

        let path = target
            .servable_path()
            .ok_or(RequestError::FileUnreadableOrUnsafe)?;
        let contents = fs::read(path).map_err(|e| {
            debug!(error = %e, "file vanished or became unreadable");
            RequestError::FileUnreadableOrUnsafe
        })?;

        let content_type = content_type_for(&resolver.target_name(request.path()));
        Ok(Response::file(contents, &content_type))
    }
}
