use openrtb::{Bid, BidRequest, BidResponse, Deal, Impression, ModelError, Record, SeatBid, Video};
use serde_json::{json, Value};
use std::fmt::Debug;

/// 去掉一个必填字段后构造必须失败，并指出记录名和字段名
fn assert_required<T: Record + Debug>(valid: Value, field: &'static str) {
    T::from_value(valid.clone()).expect("fixture should be valid");

    let mut fields = valid.as_object().cloned().unwrap();
    fields.remove(field);

    match T::from_value(Value::Object(fields)) {
        Err(ModelError::MissingRequiredField { record, field: missing }) => {
            assert_eq!(record, T::NAME);
            assert_eq!(missing, field);
        }
        other => panic!("{}.{}: expected MissingRequiredField, got {:?}", T::NAME, field, other),
    }
}

fn video() -> Value {
    json!({
        "mimes": ["video/mp4"],
        "linearity": 2,
        "minduration": 1,
        "maxduration": 15,
        "protocol": 3
    })
}

fn bid() -> Value {
    json!({ "id": "b", "impid": "i", "price": 0.5 })
}

#[test]
fn every_required_field_is_enforced() {
    for field in ["mimes", "linearity", "minduration", "maxduration", "protocol"] {
        assert_required::<Video>(video(), field);
    }

    assert_required::<Impression>(json!({ "id": "1" }), "id");
    assert_required::<Deal>(json!({ "id": "d" }), "id");

    let request = json!({ "id": "r", "imp": [{ "id": "1" }] });
    assert_required::<BidRequest>(request.clone(), "id");
    assert_required::<BidRequest>(request, "imp");

    for field in ["id", "impid", "price"] {
        assert_required::<Bid>(bid(), field);
    }

    assert_required::<SeatBid>(json!({ "bid": [bid()] }), "bid");

    let response = json!({ "id": "r", "seatbid": [{ "bid": [bid()] }] });
    assert_required::<BidResponse>(response.clone(), "id");
    assert_required::<BidResponse>(response, "seatbid");
}

#[test]
fn explicit_null_is_treated_as_missing() {
    let err = Bid::from_value(json!({ "id": "b", "impid": null, "price": 1 })).unwrap_err();
    assert!(matches!(
        err,
        ModelError::MissingRequiredField { record: "Bid", field: "impid" }
    ));
}
