//! Route guards that only let requests with a live session through.

use axum::{
    extract::{FromRef, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::{Duration, UtcOffset};

use crate::{
    AppState,
    auth::{
        build_log_in_redirect_url,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    },
    timezone::get_local_offset,
};

/// Every authenticated request keeps the session alive for at least this long.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

// Lets `PrivateCookieJar` be extracted in handlers using `AuthState`.
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Run `request` as the user of its session, or answer with `reject` given
/// the log-in URL.
async fn guard(
    state: AuthState,
    mut request: Request,
    next: Next,
    reject: impl FnOnce(String) -> Response,
) -> Response {
    let jar = PrivateCookieJar::from_headers(request.headers(), state.cookie_key.clone());

    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!("No session for {} {}: {error}", request.method(), request.uri());
            return reject(build_log_in_redirect_url(&request));
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Unknown timezone {}, sending the user to log in",
            state.local_timezone
        );
        return reject(build_log_in_redirect_url(&request));
    };

    request.extensions_mut().insert(user_id);
    let response = next.run(request).await;

    with_extended_session(response, jar, local_offset)
}

/// Add the auth cookie with a refreshed expiry to `response`.
fn with_extended_session(
    mut response: Response,
    jar: PrivateCookieJar,
    local_offset: UtcOffset,
) -> Response {
    let jar = match extend_auth_cookie_duration_if_needed(jar, SESSION_EXTENSION, local_offset) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Could not extend the session, keeping the old cookie: {error}");
            return response;
        }
    };

    let cookie_response = jar.into_response();
    for cookie in cookie_response.headers().get_all(SET_COOKIE) {
        response.headers_mut().append(SET_COOKIE, cookie.clone());
    }

    response
}

/// Guard for pages. Requests without a session are redirected to the log-in
/// page, which returns the user to the requested page afterwards.
///
/// Handlers receive the user with `Extension(user_id): Extension<UserID>`.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, |log_in_url| {
        Redirect::to(&log_in_url).into_response()
    })
    .await
}

/// Guard for `/api` routes called by htmx. Requests without a session get an
/// `HX-Redirect` to the log-in page, which returns the user to the page that
/// made the request.
///
/// Handlers receive the user with `Extension(user_id): Extension<UserID>`.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, |log_in_url| {
        (HxRedirect(log_in_url), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, UserID, auth_guard, auth_guard_hx,
            set_auth_cookie,
        },
        endpoints,
    };

    const TEST_USER: i64 = 42;

    async fn current_user(Extension(user_id): Extension<UserID>) -> String {
        user_id.as_i64().to_string()
    }

    async fn log_in_test_user(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(
            jar,
            UserID::new(TEST_USER),
            state.cookie_duration,
            UtcOffset::UTC,
        )
    }

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let state = AuthState {
            cookie_key: Key::from(&sha2::Sha512::digest("nafstenoas")),
            cookie_duration,
            local_timezone: "America/Sao_Paulo".to_owned(),
        };

        let pages = Router::new()
            .route(endpoints::REPORTS_VIEW, get(current_user))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));
        let api = Router::new()
            .route(endpoints::WISHLIST_API, post(current_user))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

        let app = pages
            .merge(api)
            .route(endpoints::LOG_IN_API, post(log_in_test_user))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server.post(endpoints::LOG_IN_API).await;
        response.assert_status_ok();

        response.cookie(COOKIE_TOKEN)
    }

    #[track_caller]
    fn assert_expires_close_to(cookie: &Cookie, want: OffsetDateTime) {
        let got = cookie.expires_datetime().expect("cookie has no expiry");
        assert!(
            (got - want).abs() < Duration::seconds(1),
            "got expiry {got:?}, want {want:?}"
        );
    }

    #[tokio::test]
    async fn page_is_served_as_the_session_user() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::REPORTS_VIEW).add_cookie(cookie).await;

        response.assert_status_ok();
        assert_eq!(response.text(), TEST_USER.to_string());
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_log_in_and_back() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get("/reports?period=year").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location").to_str().unwrap(),
            "/log_in?redirect_url=%2Freports%3Fperiod%3Dyear"
        );
    }

    #[tokio::test]
    async fn unencrypted_token_is_rejected() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let forged = Cookie::new(
            COOKIE_TOKEN,
            r#"{"user_id":1,"expires_at":"2999-01-01 00:00:00.0 +00:00:00"}"#,
        );

        let response = server
            .get(endpoints::REPORTS_VIEW)
            .add_cookie(forged)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn expired_session_redirects_to_log_in() {
        let server = get_test_server(Duration::seconds(-1));
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::REPORTS_VIEW).add_cookie(cookie).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location").to_str().unwrap(),
            "/log_in?redirect_url=%2Freports"
        );
    }

    #[tokio::test]
    async fn htmx_request_without_session_returns_to_current_page() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .post(endpoints::WISHLIST_API)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", "http://localhost:3000/wishlist")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect").to_str().unwrap(),
            "/log_in?redirect_url=%2Fwishlist"
        );
        assert!(response.headers().get("location").is_none());
    }

    #[tokio::test]
    async fn htmx_request_with_session_reaches_endpoint() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::WISHLIST_API)
            .add_header("HX-Request", "true")
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), TEST_USER.to_string());
    }

    #[tokio::test]
    async fn short_session_is_extended_to_five_minutes() {
        let server = get_test_server(Duration::seconds(5));
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::REPORTS_VIEW).add_cookie(cookie).await;

        let cookie = response.cookie(COOKIE_TOKEN);
        assert_expires_close_to(&cookie, OffsetDateTime::now_utc() + Duration::minutes(5));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn remembered_session_keeps_its_expiry() {
        let server = get_test_server(Duration::days(7));
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::REPORTS_VIEW).add_cookie(cookie).await;

        assert_expires_close_to(
            &response.cookie(COOKIE_TOKEN),
            OffsetDateTime::now_utc() + Duration::days(7),
        );
    }
}
