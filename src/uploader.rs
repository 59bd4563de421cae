use crate::{models::Item, Error, HttpClient, Response};
use bytes::Bytes;
use http::{header, Request, Uri};
use serde_json::Value;
use uuid::Uuid;

/// The Rollbar item API.
pub const DEFAULT_ENDPOINT: &str = "https://api.rollbar.com/api/1/item/";

const STATUS_OK: u16 = 200;

pub(crate) fn serialize(item: &Item) -> Result<Bytes, Error> {
    serde_json::to_vec(item)
        .map(Bytes::from)
        .map_err(Error::Serialize)
}

/// Sends a serialized item to the server.
pub(crate) async fn send<C: HttpClient + ?Sized>(
    client: &C,
    endpoint: &Uri,
    payload: Bytes,
) -> Result<Response, Error> {
    let request = Request::post(endpoint)
        .header(header::ACCEPT, "application/json")
        .header(header::ACCEPT_CHARSET, "utf-8")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(payload)
        .map_err(|err| Error::Transport(err.into()))?;

    let response = client
        .send_bytes(request)
        .await
        .map_err(Error::Transport)?;
    handle_response(response.status().as_u16(), response.body())
}

pub(crate) fn handle_response(status: u16, body: &[u8]) -> Result<Response, Error> {
    let malformed = || Error::MalformedResponse {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    };
    let content: Value = serde_json::from_slice(body).map_err(|_| malformed())?;
    if status == STATUS_OK {
        content
            .pointer("/result/uuid")
            .and_then(Value::as_str)
            .and_then(parse_uuid)
            .map(Response::Success)
            .ok_or_else(malformed)
    } else {
        match content.pointer("/message").and_then(Value::as_str) {
            Some(message) => Err(Error::RemoteRejection {
                status,
                message: message.to_string(),
            }),
            None => Err(malformed()),
        }
    }
}

/// Parse the 32 hex digit identifier Rollbar assigns to accepted items.
///
/// The digits form four big-endian 32 bit groups. The first two make up the most significant
/// 64 bits.
fn parse_uuid(value: &str) -> Option<Uuid> {
    if value.len() != 32 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let group = |i: usize| u32::from_str_radix(&value[i * 8..(i + 1) * 8], 16).ok();
    let high = (u64::from(group(0)?) << 32) | u64::from(group(1)?);
    let low = (u64::from(group(2)?) << 32) | u64::from(group(3)?);
    Some(Uuid::from_u64_pair(high, low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn success_with_uuid() {
        let body = br#"{"err":0,"result":{"id":null,"uuid":"66e675f0b37f4a45ae9696359aa13700"}}"#;
        match handle_response(200, body) {
            Ok(Response::Success(uuid)) => assert_eq!(
                "66e675f0-b37f-4a45-ae96-96359aa13700",
                uuid.hyphenated().to_string()
            ),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test_case(200, "{}"                                          ; "success without result")]
    #[test_case(200, r#"{"err":0,"result":{"uuid":"66e675f0"}}"#   ; "success with short uuid")]
    #[test_case(200, r#"{"err":0,"result":{"uuid":"66e675f0b37f4a45ae9696359aa1370z"}}"# ; "success with non hex uuid")]
    #[test_case(401, "{}"                                          ; "failure without message")]
    #[test_case(502, "<html>Bad Gateway</html>"                    ; "failure without json")]
    fn malformed(status: u16, body: &str) {
        match handle_response(status, body.as_bytes()) {
            Err(Error::MalformedResponse {
                status: actual_status,
                body: actual_body,
            }) => {
                assert_eq!(status, actual_status);
                assert_eq!(body, actual_body);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rejection_with_message() {
        let body = br#"{"err":1,"message":"invalid access token"}"#;
        let err = handle_response(401, body).unwrap_err();
        assert_eq!(Some(401), err.status());
        assert_eq!(
            "401: error message from Rollbar: invalid access token",
            err.to_string()
        );
        match err {
            Error::RemoteRejection { status, message } => {
                assert_eq!(401, status);
                assert_eq!("invalid access token", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test_case(401, r#"{"err":1,"message":"invalid access token","result":"n/a"}"# ; "unexpected result")]
    #[test_case(422, r#"{"err":1,"message":"invalid access token","extra":[1,2]}"#  ; "extra members")]
    #[test_case(403, r#"{"message":"invalid access token"}"#                         ; "message only")]
    fn rejection_ignores_other_members(status: u16, body: &str) {
        match handle_response(status, body.as_bytes()) {
            Err(Error::RemoteRejection {
                status: actual_status,
                message,
            }) => {
                assert_eq!(status, actual_status);
                assert_eq!("invalid access token", message);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn success_ignores_other_members() {
        let body = br#"{"err":0,"message":null,"result":{"id":12,"uuid":"66e675f0b37f4a45ae9696359aa13700","extra":{}}}"#;
        let uuid = handle_response(200, body).unwrap().uuid().unwrap();
        assert_eq!("66e675f0b37f4a45ae9696359aa13700", uuid.simple().to_string());
    }

    #[test_case(200, r#"{"err":0,"result":{"uuid":42}}"#  ; "success with numeric uuid")]
    #[test_case(500, r#"{"err":1,"message":42}"#           ; "failure with numeric message")]
    fn malformed_member_types(status: u16, body: &str) {
        match handle_response(status, body.as_bytes()) {
            Err(Error::MalformedResponse { .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn parse_uuid_round_trip() {
        for _ in 0..1000 {
            let expected = Uuid::from_u128(rand::random::<u128>());
            let digits = format!("{:032x}", expected.as_u128());
            assert_eq!(Some(expected), parse_uuid(&digits));
        }
    }

    #[test_case("+6e675f0b37f4a45ae9696359aa13700" ; "sign")]
    #[test_case("66e675f0-b37f-4a45-ae96-96359aa1" ; "hyphens")]
    #[test_case(""                                 ; "empty")]
    fn parse_uuid_rejects(value: &str) {
        assert_eq!(None, parse_uuid(value));
    }
}
