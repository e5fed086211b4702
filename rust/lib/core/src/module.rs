use axum::Router;

/// A service module that contributes HTTP routes.
///
/// `masters` and `identity` implement this; the server binary collects
/// the modules and nests each router under `/{name}`.
pub trait Module: Send + Sync {
    /// Module name, used for logging and as the route prefix.
    fn name(&self) -> &str;

    /// Return the module's routes, to be nested under `/{name}`.
    fn routes(&self) -> Router;
}
