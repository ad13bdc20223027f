//! Catch-all request forwarder
//!
//! Orchestrates one request end to end: parse the body, resolve the
//! algorithm, select a worker, layer the override payload, forward, observe
//! the outcome, and emit telemetry off the response path. Steps that talk
//! to side channels (counter, learner, broker) never surface their failures
//! to the client; the only client-visible failures are a malformed JSON
//! body, an empty selection, and an unreachable worker.

use crate::api::body::{parse_json_body, ParsedBody};
use crate::api::error::ClientError;
use crate::learner::LearnerContext;
use crate::overrides::{self, OverrideFields, RouterOverrides};
use crate::routing::RoutingAlgorithm;
use crate::telemetry::{
    self, FailureRecord, ObservedOutcome, RoutingDecision, TelemetryContext, TelemetryInput,
};
use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Response header carrying the chosen worker URL.
pub const WORKER_URL_HEADER: &str = "x-magnetar-worker-url";
/// Response header echoing the algorithm that routed the request.
pub const ALGO_USED_HEADER: &str = "x-algo-used";
/// Request header requesting an algorithm (lowest-precedence input).
pub const ALGO_HEADER: &str = "x-magnetar-algo";
/// Request header identifying the calling client for telemetry.
pub const CLIENT_ID_HEADER: &str = "x-magnetar-client-id";

/// Forward any inbound request to a selected worker.
pub async fn handle(State(state): State<Arc<super::AppState>>, request: Request) -> Response {
    let request_start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let (parts, inbound_body) = request.into_parts();
    let method = parts.method;
    let original_url = parts.uri.to_string();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(str::to_string);
    let headers = parts.headers;

    let payload_bytes = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    // GET and HEAD never read a body.
    let has_request_body = method != Method::GET && method != Method::HEAD;

    let mut parsed_json = false;
    let mut raw_body: Option<Bytes> = None;
    let mut body_algo: Option<RoutingAlgorithm> = None;
    let mut base_payload: Option<OverrideFields> = None;
    let mut router_overrides: Option<RouterOverrides> = None;

    if has_request_body {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let bytes = match to_bytes(inbound_body, super::MAX_BODY_SIZE).await {
            Ok(bytes) => bytes,
            Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
        };

        if content_type.contains("application/json") {
            match parse_json_body(&bytes) {
                ParsedBody::Empty => parsed_json = true,
                ParsedBody::Parsed(parsed) => {
                    parsed_json = true;
                    body_algo = parsed.algo.as_deref().and_then(|value| value.parse().ok());
                    router_overrides = parsed.router_config;
                    if !parsed.payload.is_empty() {
                        base_payload = Some(parsed.payload);
                    }
                }
                ParsedBody::Invalid(parse_error) => {
                    warn!(error = %parse_error, "Rejecting unparseable JSON body");
                    return ClientError::InvalidJsonPayload.into_response();
                }
            }
        } else if !bytes.is_empty() {
            // Non-JSON bodies bypass the override engine entirely.
            raw_body = Some(bytes);
        }
    }

    // Body field wins, then query parameter, then header; unrecognized
    // values fall through instead of erroring.
    let algo = body_algo
        .or_else(|| query_algo(query.as_deref()))
        .or_else(|| header_algo(&headers))
        .unwrap_or_default();

    let learner_context = LearnerContext {
        path: &path,
        query: query.as_deref(),
        request_id: &request_id,
    };
    let Some(worker_url) = state.selector.select_worker(algo, Some(&learner_context)).await
    else {
        metrics::counter!("magnetar_routing_failures_total", "reason" => "no_worker").increment(1);
        return ClientError::NoWorkerAvailable.into_response();
    };

    let target_url = match query.as_deref() {
        Some(query) => format!("{}{}?{}", worker_url.trim_end_matches('/'), path, query),
        None => format!("{}{}", worker_url.trim_end_matches('/'), path),
    };

    // Layer the override chain: body payload, then router defaults, then
    // the matching worker profile.
    let mut forwarded_payload = base_payload;
    if parsed_json {
        let (default_overrides, worker_profiles) = match &router_overrides {
            Some(config) => (
                config.default_overrides.as_ref(),
                config.worker_profiles.as_deref(),
            ),
            None => (None, None),
        };
        forwarded_payload = overrides::merge(forwarded_payload, default_overrides);
        let profile = overrides::profile_overrides(&worker_url, worker_profiles);
        forwarded_payload = overrides::merge(forwarded_payload, profile);
    }
    let forwarded_body_json = forwarded_payload
        .as_ref()
        .and_then(|payload| serde_json::to_string(payload).ok());

    let mut forward_headers = headers.clone();
    forward_headers.remove(header::CONTENT_LENGTH);
    forward_headers.remove(header::HOST);
    forward_headers.remove(header::TRANSFER_ENCODING);

    let mut outbound = state
        .http_client
        .request(method.clone(), &target_url)
        .headers(forward_headers);
    if let Some(payload) = &forwarded_payload {
        // Forces the outbound content-type to JSON.
        outbound = outbound.json(payload);
    } else if let Some(bytes) = raw_body {
        outbound = outbound.body(bytes);
    }

    let upstream = match outbound.send().await {
        Ok(response) => response,
        Err(send_error) => {
            warn!(error = %send_error, worker = %worker_url, "Failed to forward request");
            metrics::counter!("magnetar_routing_failures_total", "reason" => "forward")
                .increment(1);
            return ClientError::ForwardFailed {
                details: send_error.to_string(),
            }
            .into_response();
        }
    };

    let status = upstream.status();
    let latency_ms = request_start.elapsed().as_millis() as u64;

    metrics::counter!("magnetar_requests_total",
        "algo" => algo.as_str(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("magnetar_upstream_latency_seconds", "algo" => algo.as_str())
        .record(latency_ms as f64 / 1000.0);

    let mut response_headers = upstream.headers().clone();
    // Hop-by-hop headers are re-negotiated on our side of the connection.
    response_headers.remove(header::TRANSFER_ENCODING);
    response_headers.remove(header::CONNECTION);
    if let Ok(value) = HeaderValue::from_str(&worker_url) {
        response_headers.insert(HeaderName::from_static(WORKER_URL_HEADER), value);
    }
    response_headers.insert(
        HeaderName::from_static(ALGO_USED_HEADER),
        HeaderValue::from_static(algo.as_str()),
    );

    let decision = RoutingDecision {
        algo,
        worker_url: worker_url.clone(),
        target_url: target_url.clone(),
        worker_count: state.selector.pool_size(),
    };
    let record = telemetry::collect(TelemetryInput {
        context: TelemetryContext {
            request_id: request_id.clone(),
            method: method.to_string(),
            path,
            query,
            client_id: headers
                .get(CLIENT_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            has_request_body,
            payload_bytes,
        },
        decision,
        outcome: ObservedOutcome {
            status_code: status.as_u16(),
            latency_ms,
            success: None,
        },
        reward: None,
        telemetry_id: None,
        captured_at: None,
    });

    info!(
        request_id = %request_id,
        algo = %algo,
        worker = %worker_url,
        status = status.as_u16(),
        latency_ms,
        "Forwarded request"
    );

    // A 5xx outcome needs the response body twice: once for the failure
    // snippet and once for the client. Buffer it so neither read consumes
    // the other's copy. Everything else streams straight through.
    let (response_body, failure_record) = if status.is_server_error() {
        let bytes = upstream.bytes().await.unwrap_or_default();
        let snippet = telemetry::truncate_snippet(&String::from_utf8_lossy(&bytes));
        let failure = FailureRecord {
            failure_id: uuid::Uuid::new_v4().to_string(),
            captured_at: Utc::now(),
            worker_url,
            target_url,
            original_url,
            method: method.to_string(),
            algo,
            response_status: status.as_u16(),
            response_status_text: status.canonical_reason().unwrap_or("").to_string(),
            forwarded_body: forwarded_body_json,
            response_snippet: (!snippet.is_empty()).then_some(snippet),
        };
        (Body::from(bytes), Some(failure))
    } else {
        (Body::from_stream(upstream.bytes_stream()), None)
    };

    // Emit telemetry (always) and the failure record (5xx only), strictly
    // after the client response below has been assembled.
    let broker = state.broker.clone();
    let telemetry_topic = state.config.broker.telemetry_topic.clone();
    let failures_topic = state.config.broker.failures_topic.clone();
    let publish = async move {
        if let Err(publish_error) = broker
            .produce(&telemetry_topic, &record.telemetry_id, &record)
            .await
        {
            metrics::counter!("magnetar_publish_failures_total", "topic" => telemetry_topic.clone())
                .increment(1);
            error!(error = %publish_error, "Failed to publish telemetry record");
        }
        if let Some(failure) = failure_record {
            if let Err(publish_error) = broker
                .produce(&failures_topic, &failure.failure_id, &failure)
                .await
            {
                metrics::counter!("magnetar_publish_failures_total", "topic" => failures_topic.clone())
                    .increment(1);
                error!(error = %publish_error, "Failed to publish failure record");
            }
        }
    };
    state.dispatcher.submit(publish).await;

    let mut response = Response::new(response_body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}

/// Extract an `algo` query parameter. The wire values never need percent
/// decoding.
fn query_algo(query: Option<&str>) -> Option<RoutingAlgorithm> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("algo="))
        .and_then(|value| value.parse().ok())
}

/// Extract the algorithm request header.
fn header_algo(headers: &HeaderMap) -> Option<RoutingAlgorithm> {
    headers.get(ALGO_HEADER)?.to_str().ok()?.parse().ok()
}
