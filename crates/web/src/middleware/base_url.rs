use std::sync::Arc;

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::IntoResponse};

/// Scheme, host and path prefix the client used to reach the api. Honors the
/// `x-forwarded-*` headers set by reverse proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    proto: String,
    host: String,
    prefix: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let proto = header(headers, "x-forwarded-proto").unwrap_or("http");
        let host = header(headers, "x-forwarded-host")
            .or_else(|| header(headers, "host"))
            .unwrap_or("localhost");
        let prefix = header(headers, "x-forwarded-prefix")
            .unwrap_or("")
            .trim_end_matches('/');

        Self {
            proto: proto.to_owned(),
            host: host.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    pub fn full_url<S: Into<String>>(&self, path: S) -> String {
        format!("{}://{}{}{}", self.proto, self.host, self.prefix, path.into())
    }
}

pub async fn base_url_middleware(mut req: Request, next: Next) -> impl IntoResponse {
    let base_url = BaseUrl::from_headers(req.headers());
    req.extensions_mut().insert(Arc::new(base_url));

    next.run(req).await
}
