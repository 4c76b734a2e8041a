use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    auth::{AuthState, COOKIE_TOKEN, set_auth_cookie},
    build_router,
    endpoints::format_endpoint,
};

const TEST_LOG_IN_ROUTE: &str = "/test/log_in/{user_id}";

async fn stub_log_in_route(
    State(state): State<AuthState>,
    Path(user_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<PrivateCookieJar, Error> {
    set_auth_cookie(jar, UserID::new(user_id), state.cookie_duration)
}

/// A test server for the full app, backed by an in-memory database, plus a route for logging in
/// as any user.
pub(crate) fn get_test_server(image_dir: &std::path::Path) -> (TestServer, AppState) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = AppState::new(connection, "42", image_dir).expect("Could not create app state.");

    let app = build_router(state.clone()).merge(
        Router::new()
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state.clone()),
    );

    let server = TestServer::try_new(app).expect("Could not create test server.");

    (server, state)
}

/// Get an auth cookie for `user_id`.
pub(crate) async fn log_in_as(server: &TestServer, user_id: i64) -> Cookie<'static> {
    let response = server
        .post(&format_endpoint(TEST_LOG_IN_ROUTE, user_id))
        .await;

    response.assert_status_ok();

    response.cookie(COOKIE_TOKEN)
}
