//! Verify builder methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs and the expected request descriptor.
//! Bodies are compared as parsed JSON (not raw strings) so field ordering
//! never causes false negatives.

use matrix_core::{Auth, Client, MessageKind, Method, RoomEvent};
use serde_json::{Map, Value};

const BASE_URL: &str = "http://localhost:8008";
const TOKEN: &str = "tok";

fn client() -> Client {
    Client::new(BASE_URL)
}

/// Parse the method string from test vectors into `Method`.
fn parse_method(s: &str) -> Method {
    match s {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn opts_map(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn expected_query(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Send message
// ---------------------------------------------------------------------------

#[test]
fn send_message_test_vectors() {
    let raw = include_str!("../../test-vectors/send_message.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let kind = match input["kind"].as_str().unwrap() {
            "text" => MessageKind::Text,
            "notice" => MessageKind::Notice,
            "file" => MessageKind::File,
            other => panic!("unknown kind: {other}"),
        };
        let event = RoomEvent::message(
            input["room_id"].as_str().unwrap(),
            kind,
            opts_map(&input["fields"]),
            input["transaction_id"].as_str().unwrap(),
        )
        .unwrap();
        let req = c.send_room_event(TOKEN, &event);

        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(Value::Object(req.body), expected["body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

fn auth_from_vector(value: &Value) -> Auth {
    let auth = match value["kind"].as_str().unwrap() {
        "dummy" => Auth::dummy(),
        "token" => Auth::token(value["token"].as_str().unwrap()),
        "password" => Auth::user_password(
            value["user"].as_str().unwrap(),
            value["password"].as_str().unwrap(),
        ),
        other => panic!("unknown auth kind: {other}"),
    };
    match value["session"].as_str() {
        Some(session) => auth.with_session(session),
        None => auth,
    }
}

#[test]
fn login_test_vectors() {
    let raw = include_str!("../../test-vectors/login.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let auth = auth_from_vector(&case["input"]["auth"]);
        let req = c.login(&auth, opts_map(&case["input"]["opts"]));

        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(Value::Object(req.body), expected["body"], "{name}: body");
        assert!(
            !req.headers.iter().any(|(n, _)| n == "authorization"),
            "{name}: login is anonymous"
        );
    }
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

#[test]
fn sync_test_vectors() {
    let raw = include_str!("../../test-vectors/sync.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = c.sync(TOKEN, opts_map(&case["input"]["opts"]));

        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.query_params, expected_query(&expected["query_params"]), "{name}: query");
        assert!(req.body.is_empty(), "{name}: sync has no body");
        assert!(
            req.headers.contains(&("authorization".to_string(), format!("Bearer {TOKEN}"))),
            "{name}: bearer header"
        );
    }
}

// ---------------------------------------------------------------------------
// User directory search
// ---------------------------------------------------------------------------

#[test]
fn user_directory_test_vectors() {
    let raw = include_str!("../../test-vectors/user_directory.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = c.user_directory_search(
            TOKEN,
            case["input"]["search_term"].as_str().unwrap(),
            opts_map(&case["input"]["opts"]),
        );

        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(Value::Object(req.body), expected["body"], "{name}: body");

        let language = req
            .headers
            .iter()
            .find(|(n, _)| n == "accept-language")
            .map(|(_, v)| v.as_str());
        assert_eq!(language, expected["accept_language"].as_str(), "{name}: accept-language");
    }
}
