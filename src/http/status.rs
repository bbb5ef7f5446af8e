//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que usa el servidor de archivos. Las reason phrases
//! siguen el formato histórico del servidor (`404 File Not Found`), no las
//! del RFC.

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - El archivo existe y se sirve completo
    Ok = 200,

    /// 400 Bad Request - La request line no tiene ni siquiera un método
    BadRequest = 400,

    /// 404 File Not Found - Archivo inexistente, ilegible o fuera de la raíz
    NotFound = 404,

    /// 500 Internal Server Error - No hay raíz para el host (ni `default`)
    InternalServerError = 500,

    /// 501 Not Implemented - Cualquier método distinto de GET
    NotImplemented = 501,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::http::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "File Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "File Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Título corto que va en el `<TITLE>` de las páginas de error
    pub fn title(&self) -> &'static str {
        match self {
            StatusCode::InternalServerError => "Server Error",
            other => other.reason_phrase(),
        }
    }

    /// Status line completa, sin el `\r\n` final
    ///
    /// # Ejemplo
    /// ```
    /// use vhost_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.status_line(), "HTTP/1.1 200 OK");
    /// ```
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {}", self)
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
