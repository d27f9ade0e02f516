//! 请求执行与响应解析
//!
//! The transport builds the multipart request; these helpers send it, map
//! the status and turn the body into a [`SubmissionReply`].

use reqwest::RequestBuilder;

use crate::error::{Result, TransportError};
use crate::types::SubmissionReply;
use crate::utils::log_sanitizer::truncate_for_log;

/// Status and body of an answered request
#[derive(Debug)]
pub(crate) struct Answer {
    pub status: u16,
    pub body: String,
}

impl Answer {
    /// Body of a 2xx answer, [`TransportError::HttpStatus`] otherwise
    ///
    /// The client follows redirects itself, so a 3xx that reaches this point
    /// is a failure too.
    pub fn into_success(self, endpoint: &str) -> Result<String> {
        if (200..300).contains(&self.status) {
            return Ok(self.body);
        }
        Err(TransportError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: self.status,
            body: (!self.body.is_empty()).then(|| truncate_for_log(&self.body)),
        })
    }
}

/// Send `request` and read the whole body, whatever the status
pub(crate) async fn send(request: RequestBuilder, endpoint: &str) -> Result<Answer> {
    let response = request.send().await.map_err(|e| {
        let detail = e.to_string();
        let endpoint = endpoint.to_string();
        if e.is_timeout() {
            TransportError::Timeout { endpoint, detail }
        } else {
            TransportError::NetworkError { endpoint, detail }
        }
    })?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| TransportError::NetworkError {
        endpoint: endpoint.to_string(),
        detail: format!("reading body: {e}"),
    })?;
    log::debug!("[http] {endpoint} answered {status}: {}", truncate_for_log(&body));

    Ok(Answer { status, body })
}

/// Parse a success body; anything but JSON is a response failure
pub(crate) fn parse_reply(body: &str, endpoint: &str) -> Result<SubmissionReply> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(SubmissionReply::from_value(value)),
        Err(e) => {
            log::error!("[http] {endpoint} sent a non-JSON body: {}", truncate_for_log(body));
            Err(TransportError::ParseError {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(status: u16, body: &str) -> Answer {
        Answer {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn any_2xx_is_success() {
        assert_eq!(answer(200, "{}").into_success("e").unwrap(), "{}");
        assert_eq!(answer(204, "").into_success("e").unwrap(), "");
    }

    #[test]
    fn error_status_keeps_body() {
        let result = answer(404, "not found").into_success("https://x/form");
        assert!(
            matches!(
                &result,
                Err(TransportError::HttpStatus { status: 404, body: Some(b), .. }) if b == "not found"
            ),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn empty_error_body_dropped() {
        let result = answer(500, "").into_success("https://x/form");
        assert!(
            matches!(&result, Err(TransportError::HttpStatus { status: 500, body: None, .. })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn redirect_status_is_failure() {
        assert!(answer(302, "").into_success("e").is_err());
    }

    #[test]
    fn reply_fields_parsed() {
        let reply = parse_reply(r#"{"FORM_TYPE":"ticket","RK_LINK":"/pay"}"#, "e").unwrap();
        assert_eq!(reply.redirect_for("ticket"), Some("/pay"));
    }

    #[test]
    fn html_body_is_parse_error() {
        let result = parse_reply("<html>502</html>", "e");
        assert!(
            matches!(&result, Err(TransportError::ParseError { .. })),
            "unexpected result: {result:?}"
        );
    }
}
