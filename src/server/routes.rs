use crate::server::api;
use crate::server::ServerState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(
    state: &mut ServerState,
    method: &str,
    path: &str,
    body: &str,
    token: Option<&str>,
) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);

    match (method, path) {
        ("GET", "/api/health") => match api::health_payload(&state.service) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/characters") => match api::characters_payload(&state.service) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/frames") => match api::frames_payload(&state.service, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(api::FramesPayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::FramesPayloadError::Frame(err)) => {
                log::error!("frames request failed: {err}");
                error_response(500, "Internal Server Error", &err.to_string())
            }
        },
        ("POST", "/api/reload") => {
            if let Some(expected) = state.token.as_deref() {
                if token != Some(expected) {
                    return error_response(
                        401,
                        "Unauthorized",
                        "missing or invalid menat-token header",
                    );
                }
            }
            match api::reload_payload(&mut state.service) {
                Ok(payload) => HttpResponse::json(payload),
                Err(err) => {
                    log::warn!("{err}");
                    error_response(500, "Internal Server Error", &err.to_string())
                }
            }
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
