//! Snapshot tests for generated HTTP requests
//!
//! # Update snapshots
//!
//! ```
//! INSTA_UPDATE=always cargo test
//! ```

use format::requests_to_string;
use recording_client::RecordingClient;
use rollbar_reporter::{
    models::{Data, Notifier, Person, Server},
    Error, Occurrence, ReporterBuilder, Response,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

// Fake access token (this is a random uuid)
const ACCESS_TOKEN: &str = "0fdcec700ce5408589d99ae8ead9af66";

const SUCCESS_BODY: &str =
    r#"{"err":0,"result":{"id":null,"uuid":"66e675f0b37f4a45ae9696359aa13700"}}"#;

#[derive(Debug, thiserror::Error)]
#[error("TRICKY!")]
struct Tricky;

#[derive(Debug, thiserror::Error)]
#[error("Nested Tricky!")]
struct IllegalState(#[source] Tricky);

#[tokio::test]
async fn message_simple() {
    let client = RecordingClient::new(200, SUCCESS_BODY);
    let reporter = ReporterBuilder::new(client.clone(), ACCESS_TOKEN, "production")
        .with_data_supplier(|| {
            Data::builder()
                .code_version("3da541559918a808c2402bba5012f6c60b27661c")
                .notifier(Notifier::new("rollbar-reporter-tests", Some("1.0.0".into())))
                .server(Server::builder().host("web-1").build())
                .person(Person::new("42").expect("person is valid"))
                .custom(BTreeMap::from([("team".to_string(), json!("core"))]))
        })
        .build()
        .expect("reporter config is valid");

    let response = reporter
        .report(
            Occurrence::from_message("Send a message")
                .with_custom([("HELLO".to_string(), json!("WORLD"))]),
        )
        .expect("item is valid")
        .await
        .expect("item is accepted");
    assert_eq!(
        "66e675f0-b37f-4a45-ae96-96359aa13700",
        response.uuid().expect("item was sent").to_string()
    );

    let message_simple = requests_to_string(client.requests());
    insta::assert_snapshot!(message_simple);
}

#[tokio::test]
async fn error_chain() {
    let client = RecordingClient::new(200, SUCCESS_BODY);
    let reporter = ReporterBuilder::new(client.clone(), ACCESS_TOKEN, "production")
        .build()
        .expect("reporter config is valid");

    reporter
        .log_error(&IllegalState(Tricky), Some("while testing"))
        .expect("item is valid")
        .await
        .expect("item is accepted");

    let requests = client.requests();
    assert_eq!(1, requests.len());
    let body: Value = serde_json::from_slice(requests[0].body()).expect("body is json");
    let data = &body["data"];
    assert_eq!(json!("error"), data["level"]);
    assert_eq!(json!("rust"), data["language"]);
    assert_eq!(json!("rollbar-reporter"), data["notifier"]["name"]);

    let chain = data["body"]["trace_chain"]
        .as_array()
        .expect("body is a trace chain");
    assert_eq!(2, chain.len());
    assert_eq!(
        json!({"class": "IllegalState", "message": "Nested Tricky!", "description": "while testing"}),
        chain[0]["exception"]
    );
    assert_eq!(
        json!({"class": "Tricky", "message": "TRICKY!"}),
        chain[1]["exception"]
    );
    assert_eq!(json!([]), chain[1]["frames"]);
}

#[tokio::test]
async fn filtered_item_is_not_sent() {
    let client = RecordingClient::new(200, SUCCESS_BODY);
    let reporter = ReporterBuilder::new(client.clone(), ACCESS_TOKEN, "production")
        .with_filter(|item, _, _| item.data().body().message().is_none())
        .build()
        .expect("reporter config is valid");

    let response = reporter
        .warning("ignore me")
        .expect("item is valid")
        .await
        .expect("filtering never fails");
    assert_eq!(Response::Filtered, response);
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn rejected_item() {
    let client = RecordingClient::new(401, r#"{"err":1,"message":"invalid access token"}"#);
    let reporter = ReporterBuilder::new(client.clone(), ACCESS_TOKEN, "production")
        .with_endpoint("http://localhost:8080/api/1/item/")
        .build()
        .expect("reporter config is valid");

    match reporter.error("hello").expect("item is valid").await {
        Err(Error::RemoteRejection { status, message }) => {
            assert_eq!(401, status);
            assert_eq!("invalid access token", message);
        }
        other => panic!("unexpected result {:?}", other),
    }
    let requests = client.requests();
    assert_eq!("localhost:8080", requests[0].uri().authority().unwrap().as_str());
}

mod recording_client {
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::{Request, Response};
    use rollbar_reporter::{HttpClient, HttpError};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct RecordingClient {
        requests: Arc<Mutex<Vec<Request<Bytes>>>>,
        status: u16,
        body: &'static str,
    }

    impl RecordingClient {
        pub fn new(status: u16, body: &'static str) -> Self {
            RecordingClient {
                requests: Arc::new(Mutex::new(Vec::new())),
                status,
                body,
            }
        }

        pub fn requests(&self) -> Vec<Request<Bytes>> {
            self.requests
                .lock()
                .expect("requests mutex is healthy")
                .drain(..)
                .collect()
        }
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn send_bytes(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HttpError> {
            let res = Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))
                .expect("response is well formed");
            self.requests
                .lock()
                .expect("requests mutex is healthy")
                .push(req);
            Ok(res)
        }
    }
}

mod format {
    use bytes::Bytes;
    use http::Request;
    use regex::Regex;

    pub fn requests_to_string(requests: Vec<Request<Bytes>>) -> String {
        requests
            .into_iter()
            .map(request_to_string)
            .collect::<Vec<_>>()
            .join("\n\n\n")
    }

    fn request_to_string(req: Request<Bytes>) -> String {
        let method = req.method();
        let path = req.uri().path_and_query().expect("path exists");
        let version = format!("{:?}", req.version());
        let host = req.uri().authority().expect("authority exists");
        let mut headers = req
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().expect("header value is valid string");
                (name.as_str(), value)
            })
            .collect::<Vec<_>>();
        headers.sort();
        let headers = headers
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n");
        let body = strip_changing_values(&pretty_print_json(req.body()));
        format!("{method} {path} {version}\nhost: {host}\n{headers}\n\n{body}")
    }

    fn strip_changing_values(body: &str) -> String {
        let res = vec![
            Regex::new(r#""(?P<field>timestamp)": \d+"#).unwrap(),
            Regex::new(r#""(?P<field>platform)": "[^"]*""#).unwrap(),
        ];

        res.into_iter().fold(body.into(), |body, re| {
            re.replace_all(&body, r#""$field": "STRIPPED""#).into()
        })
    }

    fn pretty_print_json(body: &[u8]) -> String {
        let json: serde_json::Value = serde_json::from_slice(body).expect("body is valid json");
        serde_json::to_string_pretty(&json).unwrap()
    }
}
