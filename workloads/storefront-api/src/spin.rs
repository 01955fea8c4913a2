//! Spin HTTP component entry point.

use crate::{logging, ApiRequest, ApiResponse, StoreConfig, StorefrontApp};
use encore_cache::Cache;
use encore_data::SpinTransport;
use spin_sdk::http::{IntoResponse, Method as SpinMethod, Request, Response};
use spin_sdk::http_component;
use std::sync::Arc;

#[http_component]
async fn handle_storefront(req: Request) -> anyhow::Result<impl IntoResponse> {
    logging::init();

    let config = StoreConfig::from_runtime();
    let cache = Cache::open_default()?;
    let app = StorefrontApp::with_embedded_catalog(config, cache, Arc::new(SpinTransport))?;

    let response = app.handle(api_request(&req)?).await;
    Ok(spin_response(response))
}

fn api_request(req: &Request) -> anyhow::Result<ApiRequest> {
    let method = match req.method() {
        SpinMethod::Get => http::Method::GET,
        SpinMethod::Post => http::Method::POST,
        SpinMethod::Put => http::Method::PUT,
        SpinMethod::Delete => http::Method::DELETE,
        SpinMethod::Patch => http::Method::PATCH,
        SpinMethod::Head => http::Method::HEAD,
        SpinMethod::Options => http::Method::OPTIONS,
        SpinMethod::Connect => http::Method::CONNECT,
        SpinMethod::Trace => http::Method::TRACE,
        SpinMethod::Other(other) => http::Method::from_bytes(other.as_bytes())?,
    };

    let path = req.path_and_query().unwrap_or("/");
    let mut request = ApiRequest::new(method, path);
    for (name, value) in req.headers() {
        if let Some(value) = value.as_str() {
            request = request.with_header(name, value);
        }
    }
    Ok(request.with_body(req.body().to_vec()))
}

fn spin_response(response: ApiResponse) -> Response {
    let mut builder = Response::builder();
    builder.status(response.status);
    for (name, value) in &response.headers {
        builder.header(name.as_str(), value.as_str());
    }
    builder.body(response.body).build()
}
