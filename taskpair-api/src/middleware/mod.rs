/// HTTP middleware for the API server
///
/// # Modules
///
/// - `security`: Security response headers applied to every response

pub mod security;
