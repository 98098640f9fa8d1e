use axum::Router;

use courier_server::routes;

/// Build the router under test.
pub fn setup_test_app() -> Router {
    routes::router()
}
