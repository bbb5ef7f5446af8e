//! # Content-type por extensión
//! src/http/mime.rs

/// Content-type para un nombre de archivo, según su extensión
///
/// Extensiones desconocidas dan `application/octet-stream`.
///
/// # Ejemplo
/// ```
/// use vhost_server::http::content_type_for;
///
/// assert_eq!(content_type_for("/docs/index.html"), "text/html");
/// assert_eq!(content_type_for("/blob.unknownext"), "application/octet-stream");
/// ```
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
