use openrtb::{App, AuctionType, BannerType, BidRequest, BidResponse, ConnectionType, ModelError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashSet;

const REQUEST: &str = include_str!("fixtures/bid_request.json");
const RESPONSE: &str = include_str!("fixtures/bid_response.json");

/// 输入中显式出现的每个字段都必须原样出现在输出中；输出可以多出默认值字段
fn assert_present_fields_kept(input: &Value, output: &Value, path: &str) {
    match (input, output) {
        (Value::Object(expected), Value::Object(actual)) => {
            for (key, value) in expected {
                let child = format!("{}.{}", path, key);
                let actual_value = actual
                    .get(key)
                    .unwrap_or_else(|| panic!("{} missing after round trip", child));
                assert_present_fields_kept(value, actual_value, &child);
            }
        }
        (Value::Array(expected), Value::Array(actual)) => {
            assert_eq!(expected.len(), actual.len(), "{} length changed", path);
            for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
                assert_present_fields_kept(e, a, &format!("{}[{}]", path, i));
            }
        }
        _ => assert_eq!(input, output, "{} changed", path),
    }
}

#[test]
fn request_fixture_round_trips() {
    let input: Value = serde_json::from_str(REQUEST).unwrap();
    let request: BidRequest = openrtb::from_json(REQUEST).unwrap();

    assert_eq!(request.at, AuctionType::FirstPrice);
    assert_eq!(request.imp.len(), 2);
    assert_eq!(request.imp[0].bidfloor, Some(Decimal::new(3, 2)));
    assert_eq!(
        request.imp[0].banner.as_ref().unwrap().blocked_types(),
        HashSet::from([BannerType::Iframe])
    );
    assert_eq!(request.imp[1].video.as_ref().unwrap().sequence, 2);
    assert_eq!(request.device.connectiontype, Some(ConnectionType::Cellular4G));
    assert!(request.device.is_on_cellular());
    assert_eq!(request.device.geo.coordinates(), Some((37.7749, -122.4194)));
    assert_eq!(
        request.user.geo.as_ref().and_then(|geo| geo.coordinates()),
        Some((40.0, -74.0))
    );
    assert_eq!(request.app, App::default());

    let output = serde_json::to_value(&request).unwrap();
    assert_present_fields_kept(&input, &output, "$");

    // 未显式给出的默认值也会输出
    assert_eq!(output["app"], json!({}));
    assert_eq!(output["imp"][1]["bidfloorcur"], json!("USD"));
    assert_eq!(output["user"]["geo"]["lat"].to_string(), "40");
}

#[test]
fn response_fixture_round_trips() {
    let input: Value = serde_json::from_str(RESPONSE).unwrap();
    let response: BidResponse = openrtb::from_slice(RESPONSE.as_bytes()).unwrap();

    assert_eq!(response.get_bid_id().unwrap(), "1");
    assert_eq!(response.get_ad_id().unwrap(), Some("314"));
    assert_eq!(response.get_first_price().unwrap().to_string(), "9.430");
    assert_eq!(response.seatbid[0].bid[1].price, Decimal::from(12));

    let output = serde_json::to_value(&response).unwrap();
    assert_eq!(input, output);
}

#[test]
fn minimal_request_serializes_defaults_and_omits_absent_fields() {
    let request = BidRequest::minimal("req-1", "imp-1");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "id": "req-1",
            "imp": [{ "id": "imp-1", "banner": {}, "bidfloorcur": "USD" }],
            "site": {},
            "app": {},
            "device": { "geo": {} },
            "user": {},
            "at": 2
        })
    );
}

#[test]
fn unknown_fields_are_dropped() {
    let request: BidRequest = openrtb::from_json(
        r#"{"id":"r","imp":[{"id":"1","native":{"request":"{}"}}],"source":{"fd":1},"wlang":["en"]}"#,
    )
    .unwrap();

    let output = serde_json::to_value(&request).unwrap();
    assert!(output.get("source").is_none());
    assert!(output.get("wlang").is_none());
    assert!(output["imp"][0].get("native").is_none());
}

#[test]
fn malformed_json_is_reported() {
    let err = openrtb::from_json::<BidRequest>("{\"id\": ").unwrap_err();
    assert!(matches!(err, ModelError::Json(_)));
}

#[test]
fn serde_deserialize_applies_the_same_rules() {
    let err = serde_json::from_str::<BidResponse>(r#"{"id":"r","seatbid":[]}"#).unwrap_err();
    assert!(err.to_string().contains("BidResponse.seatbid is required"));
}
