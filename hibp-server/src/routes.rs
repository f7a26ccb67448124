//! Translates `/pwnedpassword/*` and `/range/*` paths into calls on
//! [`crate::handlers`]. Anything else is a 404.

use std::convert::Infallible;
use std::sync::Arc;

use hibp_verifier::Engine;
use http::{Request, Response, StatusCode};
use hyper::body::Incoming;

use crate::error::HttpError;
use crate::handlers::{self, ResponseBody};

pub async fn route(
    req: Request<Incoming>,
    engine: Arc<Engine>,
) -> Result<Response<ResponseBody>, Infallible> {
    let path = req.uri().path().to_string();
    let mut segments = path.trim_start_matches('/').splitn(2, '/');

    let result = match (segments.next(), segments.next()) {
        (Some("pwnedpassword"), Some(value)) if !value.is_empty() => {
            handlers::pwnedpassword(&engine, value).await
        }
        (Some("range"), Some(prefix5)) if !prefix5.is_empty() => handlers::range(engine, prefix5),
        _ => Err(HttpError::NotFound),
    };

    Ok(render(result))
}

fn render(result: Result<ResponseBody, HttpError>) -> Response<ResponseBody> {
    match result {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "text/plain")
            .body(body)
            .expect("static response parts are always valid"),
        Err(err) => {
            tracing::debug!(status = %err.status(), error = %err, "request failed");
            Response::builder()
                .status(err.status())
                .header("content-type", "text/plain")
                .body(handlers::full_body(err.body()))
                .expect("static response parts are always valid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> (Option<&str>, Option<&str>) {
        let mut segments = path.trim_start_matches('/').splitn(2, '/');
        (segments.next(), segments.next())
    }

    #[test]
    fn splits_pwnedpassword_path() {
        assert_eq!(split("/pwnedpassword/password"), (Some("pwnedpassword"), Some("password")));
    }

    #[test]
    fn splits_range_path() {
        assert_eq!(split("/range/5BAA6"), (Some("range"), Some("5BAA6")));
    }

    #[test]
    fn unknown_path_does_not_match_known_segments() {
        let (first, _) = split("/healthz");
        assert_ne!(first, Some("pwnedpassword"));
        assert_ne!(first, Some("range"));
    }
}
