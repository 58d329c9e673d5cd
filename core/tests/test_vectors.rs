//! Verify every endpoint against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation and its inputs, the request the client must
//! emit, and a simulated response that must come back unchanged. JSON bodies
//! are compared as parsed values so field order does not matter; form bodies
//! are compared byte for byte.

use std::sync::Mutex;

use poll_core::{
    ApiResult, AuthToken, ClientConfig, HttpMethod, HttpRequest, HttpResponse, PageRequest,
    PollServiceClient, Transport, TransportError,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000";

/// Answers with one canned response and remembers what it was asked.
struct Replay {
    response: HttpResponse,
    seen: Mutex<Option<HttpRequest>>,
}

impl Transport for Replay {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let previous = self.seen.lock().unwrap().replace(request.clone());
        assert!(previous.is_none(), "more than one request for a single call");
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn int(input: &Value, key: &str) -> i64 {
    input[key].as_i64().unwrap()
}

fn str_field<'a>(input: &'a Value, key: &str) -> &'a str {
    input[key].as_str().unwrap()
}

fn invoke(client: &PollServiceClient<&Replay>, operation: &str, input: &Value, token: &AuthToken) -> ApiResult {
    match operation {
        "register" => client.register_user(str_field(input, "username"), str_field(input, "password")),
        "login" => client.login(str_field(input, "username"), str_field(input, "password")),
        "cast_vote" => client.cast_vote(int(input, "poll_id"), int(input, "option_id"), token),
        "get_poll_results" => client.get_poll_results(int(input, "poll_id")),
        "list_polls" => match (input["skip"].as_u64(), input["limit"].as_u64()) {
            (Some(skip), Some(limit)) => client.list_polls_page(PageRequest { skip, limit }),
            _ => client.list_polls(),
        },
        "create_poll" => {
            let options = input["options"]
                .as_array()
                .unwrap()
                .iter()
                .map(|o| o.as_str().unwrap().to_string());
            client.create_poll(str_field(input, "question"), options, token)
        }
        "get_poll" => client.get_poll(int(input, "poll_id")),
        "delete_poll" => client.delete_poll(int(input, "poll_id"), token),
        other => panic!("unknown operation: {other}"),
    }
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let token = AuthToken::new(vectors["token"].as_str().unwrap_or("T"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let replay = Replay {
            response: HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
            },
            seen: Mutex::new(None),
        };
        let client = PollServiceClient::with_transport(&ClientConfig::new(BASE_URL), &replay);

        let result = invoke(&client, case["operation"].as_str().unwrap(), &case["input"], &token);
        let response = result.unwrap().unwrap_or_else(|| panic!("{name}: missing response"));

        // Verify the emitted request
        let req = replay.seen.lock().unwrap().take().unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match (expected_req.get("body"), expected_req.get("form")) {
            (Some(body), _) => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: json body");
            }
            (None, Some(form)) => {
                assert_eq!(req.body.as_deref(), form.as_str(), "{name}: form body");
            }
            (None, None) => assert!(req.body.is_none(), "{name}: body should be None"),
        }

        // Verify the response passes through untouched
        assert_eq!(response, replay.response, "{name}: response");
    }
}

#[test]
fn auth_test_vectors() {
    run_vectors(include_str!("../../test-vectors/auth.json"));
}

#[test]
fn poll_test_vectors() {
    run_vectors(include_str!("../../test-vectors/polls.json"));
}
