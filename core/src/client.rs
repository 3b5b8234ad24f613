//! Validating client for the Meow Facts API.
//!
//! # Design
//! `FactsClient` holds only the upstream base URL and a shared `Transport`.
//! A lookup is split into `build_get_facts` (validate and produce an
//! `HttpRequest`) and `parse_get_facts` (check status and shape of the
//! `HttpResponse`), with `fetch` running exactly one transport call between
//! the two. Validation always happens in `build_get_facts`, so a rejected
//! request never reaches the transport.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::FactsError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{FactsPayload, FactsRequest};

/// Public endpoint of the remote fact service.
pub const DEFAULT_BASE_URL: &str = "https://meowfacts.herokuapp.com/";

/// Stateless client for the Meow Facts API. Clones share the transport.
#[derive(Clone)]
pub struct FactsClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for FactsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactsClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FactsClient {
    pub fn new(base_url: Url, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Validate `request` and describe the outbound call.
    ///
    /// Only present parameters become query keys; with none present the URL
    /// carries no query string at all.
    pub fn build_get_facts(&self, request: &FactsRequest) -> Result<HttpRequest, FactsError> {
        request.validate()?;

        let mut url = self.base_url.clone();
        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Extract the fact list from an upstream response, unmodified and in order.
    pub fn parse_get_facts(&self, response: HttpResponse) -> Result<Vec<String>, FactsError> {
        if !response.is_success() {
            return Err(FactsError::UpstreamUnavailable {
                reason: format!("upstream returned HTTP {}", response.status),
            });
        }
        let payload: FactsPayload = serde_json::from_slice(&response.body).map_err(|e| {
            FactsError::UpstreamInvalidResponse {
                reason: e.to_string(),
            }
        })?;
        Ok(payload.data)
    }

    /// Validate, call the remote service once, and parse its answer.
    pub fn fetch(&self, request: &FactsRequest) -> Result<Vec<String>, FactsError> {
        let outbound = self.build_get_facts(request)?;
        tracing::debug!(url = %outbound.url, "requesting facts");

        let result = self
            .transport
            .execute(&outbound)
            .map_err(FactsError::from)
            .and_then(|response| self.parse_get_facts(response));

        match &result {
            Ok(facts) => tracing::debug!(count = facts.len(), "received facts"),
            Err(
                FactsError::UpstreamUnavailable { reason }
                | FactsError::UpstreamInvalidResponse { reason },
            ) => tracing::warn!(url = %outbound.url, %reason, "upstream call failed"),
            Err(FactsError::InvalidParameter(_)) => {}
        }
        result
    }

    /// Fetch facts; absent arguments are omitted from the outbound query.
    pub fn get_facts(
        &self,
        count: Option<i64>,
        lang: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<String>, FactsError> {
        self.fetch(&FactsRequest::new(count, lang, id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{ParameterError, TransportError};

    /// Records every request and answers with a fixed outcome.
    struct Recording {
        calls: Mutex<Vec<HttpRequest>>,
        outcome: Result<(u16, &'static str), &'static str>,
    }

    impl Recording {
        fn responding(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome: Ok((status, body)),
            })
        }

        fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome: Err(reason),
            })
        }

        fn calls(&self) -> Vec<HttpRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for Recording {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.lock().unwrap().push(request.clone());
            match self.outcome {
                Ok((status, body)) => Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.as_bytes().to_vec(),
                }),
                Err(reason) => Err(TransportError::new(reason)),
            }
        }
    }

    fn client(transport: Arc<Recording>) -> FactsClient {
        FactsClient::new(Url::parse("http://localhost:3000/").unwrap(), transport)
    }

    fn query_keys(url: &str) -> Vec<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, _)| k.into_owned())
            .collect()
    }

    #[test]
    fn build_with_all_parameters() {
        let c = client(Recording::responding(200, "{}"));
        let req = c
            .build_get_facts(&FactsRequest::new(Some(2), Some("eng"), Some("3")))
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/?count=2&lang=eng&id=3");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_without_parameters_has_no_query() {
        let c = client(Recording::responding(200, "{}"));
        let req = c.build_get_facts(&FactsRequest::new(None, None, None)).unwrap();
        assert_eq!(req.url, "http://localhost:3000/");
        assert!(query_keys(&req.url).is_empty());
    }

    #[test]
    fn build_omits_absent_keys() {
        let c = client(Recording::responding(200, "{}"));
        let req = c
            .build_get_facts(&FactsRequest::new(None, Some("ger"), None))
            .unwrap();
        assert_eq!(query_keys(&req.url), vec!["lang"]);
    }

    #[test]
    fn build_encodes_id_verbatim() {
        let c = client(Recording::responding(200, "{}"));
        let req = c
            .build_get_facts(&FactsRequest::new(None, None, Some("a&b=c d")))
            .unwrap();
        let url = Url::parse(&req.url).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("id".to_string(), "a&b=c d".to_string())]);
    }

    #[test]
    fn build_keeps_base_path() {
        let c = FactsClient::new(
            Url::parse("http://upstream.test/v1/facts").unwrap(),
            Recording::responding(200, "{}"),
        );
        let req = c.build_get_facts(&FactsRequest::default()).unwrap();
        assert_eq!(req.url, "http://upstream.test/v1/facts?count=1");
    }

    #[test]
    fn every_count_in_range_reaches_the_network() {
        let transport = Recording::responding(200, r#"{"data":[]}"#);
        let c = client(transport.clone());
        for count in 1..=100 {
            c.get_facts(Some(count), None, None).unwrap();
        }
        assert_eq!(transport.calls().len(), 100);
    }

    #[test]
    fn out_of_range_count_makes_no_call() {
        let transport = Recording::responding(200, r#"{"data":["x"]}"#);
        let c = client(transport.clone());
        for count in [0, 101] {
            let err = c.get_facts(Some(count), None, None).unwrap_err();
            assert!(matches!(
                err,
                FactsError::InvalidParameter(ParameterError::CountOutOfRange(n)) if n == count
            ));
        }
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn unsupported_language_makes_no_call() {
        let transport = Recording::responding(200, r#"{"data":["x"]}"#);
        let c = client(transport.clone());
        let err = c.get_facts(Some(1), Some("xyz"), None).unwrap_err();
        assert!(matches!(
            err,
            FactsError::InvalidParameter(ParameterError::UnsupportedLanguage(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn supported_language_is_forwarded() {
        let transport = Recording::responding(200, r#"{"data":["x"]}"#);
        let c = client(transport.clone());
        c.get_facts(Some(1), Some("eng"), None).unwrap();
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let url = Url::parse(&calls[0].url).unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "lang" && v == "eng"));
    }

    #[test]
    fn returns_data_in_order() {
        let c = client(Recording::responding(200, r#"{"data":["fact1","fact2"]}"#));
        assert_eq!(c.get_facts(None, None, None).unwrap(), vec!["fact1", "fact2"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let c = client(Recording::responding(200, r#"{"data":["same","same"]}"#));
        assert_eq!(c.get_facts(Some(2), None, None).unwrap(), vec!["same", "same"]);
    }

    #[test]
    fn empty_data_is_valid() {
        let c = client(Recording::responding(200, r#"{"data":[]}"#));
        assert!(c.get_facts(Some(1), None, None).unwrap().is_empty());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let c = client(Recording::responding(200, r#"{"data":["a"],"meta":{"v":1}}"#));
        assert_eq!(c.get_facts(Some(1), None, None).unwrap(), vec!["a"]);
    }

    #[test]
    fn malformed_bodies_are_invalid_responses() {
        for body in [
            "not json",
            "",
            r#"{"facts":["a"]}"#,
            r#"{"data":"a"}"#,
            r#"{"data":{"0":"a"}}"#,
            r#"{"data":null}"#,
            r#"{"data":[1,2]}"#,
            r#"["a","b"]"#,
        ] {
            let c = client(Recording::responding(200, body));
            let err = c.get_facts(Some(1), None, None).unwrap_err();
            assert!(
                matches!(err, FactsError::UpstreamInvalidResponse { .. }),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn connection_failure_is_unavailable() {
        let transport = Recording::failing("connection refused");
        let c = client(transport.clone());
        let err = c.get_facts(Some(1), None, None).unwrap_err();
        assert!(matches!(err, FactsError::UpstreamUnavailable { .. }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn error_status_is_unavailable() {
        let c = client(Recording::responding(503, r#"{"data":["stale"]}"#));
        let err = c.get_facts(Some(1), None, None).unwrap_err();
        assert!(
            matches!(err, FactsError::UpstreamUnavailable { ref reason } if reason.contains("503"))
        );
    }

    #[test]
    fn non_utf8_body_is_invalid_response() {
        let c = client(Recording::failing("unused"));
        let mut body = br#"{"data":[""#.to_vec();
        body.extend_from_slice(&[0xff, 0xfe]);
        body.extend_from_slice(br#""]}"#);
        let err = c.parse_get_facts(HttpResponse::ok(body)).unwrap_err();
        assert!(matches!(err, FactsError::UpstreamInvalidResponse { .. }));
    }

    #[test]
    fn parse_without_transport() {
        let c = client(Recording::failing("unused"));
        let facts = c
            .parse_get_facts(HttpResponse::ok(r#"{"data":["only"]}"#))
            .unwrap();
        assert_eq!(facts, vec!["only"]);
    }
}
