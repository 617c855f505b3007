//! Where to send a user once they have logged in.

use axum::{
    extract::Request,
    http::{HeaderMap, Uri},
};
use axum_htmx::{HX_CURRENT_URL, HX_REQUEST};

use crate::endpoints;

/// Pages that a user should never be sent back to after logging in.
const NON_RETURNABLE_PAGES: [&str; 3] = [
    endpoints::LOG_IN_VIEW,
    endpoints::REGISTER_VIEW,
    endpoints::INTERNAL_ERROR_VIEW,
];

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// The path and query of `uri` if it is a page of this site worth returning to.
fn returnable_page(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?;
    let path = path_and_query.path();

    let is_returnable = path.starts_with('/')
        && !path.starts_with("//")
        && !is_api_path(path)
        && !NON_RETURNABLE_PAGES.contains(&path);

    is_returnable.then(|| path_and_query.as_str().to_owned())
}

/// Check a user supplied `redirect_url`, returning its path and query if it
/// points to a page on this site.
///
/// Absolute URLs are rejected so that links cannot send users to other sites.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    returnable_page(&uri)
}

/// The log-in page with a `redirect_url` that returns the user to `page`.
pub fn log_in_url_returning_to(page: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", page)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {page}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The log-in page URL for an unauthenticated `request`.
///
/// Page requests return to the requested page. htmx requests to `/api` routes
/// return to the page that sent them, taken from `HX-Current-URL`. Anything
/// else returns to the dashboard.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let page = if is_api_path(request.uri().path()) {
        page_of_htmx_request(request.headers())
    } else {
        returnable_page(request.uri())
    };

    let page = page.unwrap_or_else(|| {
        tracing::warn!(
            "No page to return to after log-in for {}, using the dashboard",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    log_in_url_returning_to(&page)
}

fn page_of_htmx_request(headers: &HeaderMap) -> Option<String> {
    let is_htmx = headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"));

    if !is_htmx {
        tracing::warn!("/api request without the HX-Request header");
        return None;
    }

    let Some(current_url) = headers
        .get(HX_CURRENT_URL)
        .and_then(|value| value.to_str().ok())
    else {
        tracing::warn!("htmx request without a readable HX-Current-URL header");
        return None;
    };

    // HX-Current-URL is absolute, only the path and query are kept.
    let page = current_url
        .parse::<Uri>()
        .ok()
        .and_then(|uri| returnable_page(&uri));

    if page.is_none() {
        tracing::warn!("Cannot return to HX-Current-URL {current_url}");
    }

    page
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use super::{build_log_in_redirect_url, log_in_url_returning_to, normalize_redirect_url};

    #[test]
    fn keeps_local_pages_with_their_query() {
        assert_eq!(
            normalize_redirect_url("/reports?period=year&calendar=2025-03").as_deref(),
            Some("/reports?period=year&calendar=2025-03")
        );
    }

    #[test]
    fn rejects_pages_that_cannot_be_returned_to() {
        for url in [
            "https://exemplo.com/dashboard",
            "//exemplo.com/dashboard",
            "dashboard",
            "/log_in?redirect_url=%2Fdashboard",
            "/register",
            "/error",
            "/api/wishlist",
        ] {
            assert_eq!(normalize_redirect_url(url), None, "{url} should be rejected");
        }
    }

    #[test]
    fn encodes_page_in_log_in_url() {
        assert_eq!(
            log_in_url_returning_to("/calendar?month=2025-10"),
            "/log_in?redirect_url=%2Fcalendar%3Fmonth%3D2025-10"
        );
    }

    #[test]
    fn page_request_returns_to_requested_page() {
        let request = Request::builder()
            .uri("/fixed-expenses?month=Mar%C3%A7o")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            log_in_url_returning_to("/fixed-expenses?month=Mar%C3%A7o")
        );
    }

    #[test]
    fn htmx_request_returns_to_current_page() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/settings/name")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/settings")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fsettings"
        );
    }

    #[test]
    fn api_request_without_htmx_returns_to_dashboard() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/wishlist")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fdashboard"
        );
    }
}
