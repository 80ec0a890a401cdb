use std::collections::HashMap;
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::types::{ApiEndpoint, ApiResponse, BackgroundEvent, RequestConfig};

/// Executes an HTTP request for the given endpoint in the background.
/// The response (or the error that replaced it) is sent over `tx`.
pub fn execute_request_background(
    endpoint: ApiEndpoint,
    config: RequestConfig,
    base_url: String,
    token: Option<String>,
    tx: UnboundedSender<BackgroundEvent>,
) {
    tokio::spawn(async move {
        let endpoint_key = endpoint.key();
        let response = match build_url_with_params(
            &base_url,
            &endpoint.path,
            &config.path_params,
            &config.query_params,
        ) {
            Ok(url) => {
                let method = to_method(&endpoint.method);
                tracing::info!(%method, %url, "executing request");
                execute_request(&url, method, &config, &endpoint, token.as_deref()).await
            }
            Err(e) => ApiResponse::error(format!("Failed to build URL: {}", e)),
        };

        if let Some(message) = &response.error_message {
            tracing::warn!(endpoint = %endpoint_key, error = %message, "request failed");
        } else {
            tracing::info!(
                endpoint = %endpoint_key,
                status = response.status,
                elapsed_ms = response.duration.as_millis() as u64,
                "request finished"
            );
        }

        let _ = tx.send(BackgroundEvent::Response {
            endpoint_key,
            response,
        });
    });
}

fn to_method(method: &str) -> reqwest::Method {
    reqwest::Method::from_bytes(method.to_uppercase().as_bytes()).unwrap_or(reqwest::Method::GET)
}

async fn execute_request(
    url: &str,
    method: reqwest::Method,
    config: &RequestConfig,
    endpoint: &ApiEndpoint,
    token: Option<&str>,
) -> ApiResponse {
    let client = reqwest::Client::new();
    let mut request_builder = client.request(method, url);

    for (name, value) in &config.header_params {
        if !value.is_empty() {
            request_builder = request_builder.header(name.as_str(), value.as_str());
        }
    }

    if endpoint.supports_body() {
        let content_type = endpoint
            .request_body
            .as_ref()
            .map(|body| body.content_type.as_str())
            .unwrap_or("application/json");
        let body = config.body.clone().unwrap_or_else(|| "{}".to_string());
        request_builder = request_builder
            .header("Content-Type", content_type)
            .body(body);
    }

    if let Some(token) = token {
        request_builder = request_builder.bearer_auth(token);
    }

    let start = Instant::now();

    match request_builder.send().await {
        Ok(response) => {
            let duration = start.elapsed();

            let status = response.status().as_u16();
            let status_text = response
                .status()
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string();

            // Keys normalized to lowercase
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(key, value)| {
                    (
                        key.as_str().to_lowercase(),
                        value.to_str().unwrap_or("").to_string(),
                    )
                })
                .collect();

            match response.text().await {
                Ok(body) => ApiResponse {
                    status,
                    status_text,
                    headers,
                    body,
                    duration,
                    is_error: false,
                    error_message: None,
                },
                Err(e) => ApiResponse {
                    duration,
                    ..ApiResponse::error(format!("Failed to read response body: {}", e))
                },
            }
        }
        // No HTTP response at all (timeout, connection refused, ...)
        Err(e) => ApiResponse {
            duration: start.elapsed(),
            ..ApiResponse::error(format!("Request failed: {}", e))
        },
    }
}

/// Substitute `{name}` placeholders, join onto the base URL and append the
/// non-empty query parameters
pub(crate) fn build_url_with_params(
    base_url: &str,
    path_template: &str,
    path_params: &HashMap<String, String>,
    query_params: &HashMap<String, String>,
) -> Result<String, String> {
    let path = path_params
        .iter()
        .fold(path_template.to_string(), |path, (key, value)| {
            path.replace(&format!("{{{}}}", key), value)
        });

    let full_path = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&full_path).map_err(|e| format!("Invalid URL: {}", e))?;

    // Sorted so the resulting URL is stable between sends
    let mut pairs: Vec<(&String, &String)> =
        query_params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort();
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}
