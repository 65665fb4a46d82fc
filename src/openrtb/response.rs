use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::openrtb::enums::{CreativeAttribute, NoBidReason};
use crate::openrtb::record::{record_serde, Ext, FieldReader, Record};

/// 单个出价；impid 按值引用请求中的 Impression.id
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Bid {
    pub id: String,
    pub impid: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurl: Option<String>,
    /// 广告物料（HTML / VAST / native JSON）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adomain: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr: Option<Vec<CreativeAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Bid {
    pub fn new(id: impl Into<String>, impid: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            impid: impid.into(),
            price,
            adid: None,
            nurl: None,
            adm: None,
            adomain: None,
            iurl: None,
            cid: None,
            crid: None,
            attr: None,
            dealid: None,
            ext: None,
        }
    }
}

/// 一个席位（seat）的出价集合；group = 1 表示要么全赢要么全不要
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SeatBid {
    pub bid: Vec<Bid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<i32>,
}

impl SeatBid {
    pub fn new(bid: Vec<Bid>) -> Self {
        Self {
            bid,
            seat: None,
            group: None,
        }
    }
}

/// OpenRTB Bid Response
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BidResponse {
    /// 回传请求的 id
    pub id: String,
    pub seatbid: Vec<SeatBid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<String>,
    /// 不出价原因。seatbid 必填且非空，所以只有 `id` + `nbr` 的空响应无法构造；
    /// 不出价时应直接回 HTTP 204 或空 body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbr: Option<NoBidReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl BidResponse {
    pub fn new(id: impl Into<String>, seatbid: Vec<SeatBid>) -> Self {
        Self {
            id: id.into(),
            seatbid,
            bidid: None,
            cur: None,
            customdata: None,
            nbr: None,
            ext: None,
        }
    }

    /// 一个 SeatBid、一个 Bid 的最小响应
    pub fn minimal(
        id: impl Into<String>,
        bid_id: impl Into<String>,
        bid_impid: impl Into<String>,
        bid_price: Decimal,
    ) -> Self {
        Self::new(
            id,
            vec![SeatBid::new(vec![Bid::new(bid_id, bid_impid, bid_price)])],
        )
    }

    /// 第一个 SeatBid 的第一个 Bid
    pub fn first_bid(&self) -> Result<&Bid> {
        let seatbid = self.seatbid.first().ok_or(ModelError::EmptySequenceAccess {
            record: "BidResponse",
            field: "seatbid",
        })?;
        seatbid.bid.first().ok_or(ModelError::EmptySequenceAccess {
            record: "SeatBid",
            field: "bid",
        })
    }

    pub fn get_bid_id(&self) -> Result<&str> {
        Ok(self.first_bid()?.id.as_str())
    }

    pub fn get_imp_id(&self) -> Result<&str> {
        Ok(self.first_bid()?.impid.as_str())
    }

    pub fn get_ad_id(&self) -> Result<Option<&str>> {
        Ok(self.first_bid()?.adid.as_deref())
    }

    pub fn get_first_price(&self) -> Result<Decimal> {
        Ok(self.first_bid()?.price)
    }
}

impl Record for Bid {
    const NAME: &'static str = "Bid";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Bid {
            id: f.required("id")?,
            impid: f.required("impid")?,
            price: f.required("price")?,
            adid: f.optional("adid")?,
            nurl: f.optional("nurl")?,
            adm: f.optional("adm")?,
            adomain: f.optional("adomain")?,
            iurl: f.optional("iurl")?,
            cid: f.optional("cid")?,
            crid: f.optional("crid")?,
            attr: f.optional("attr")?,
            dealid: f.optional("dealid")?,
            ext: f.optional("ext")?,
        })
    }
}

impl Record for SeatBid {
    const NAME: &'static str = "SeatBid";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(SeatBid {
            bid: f.required_non_empty("bid")?,
            seat: f.optional("seat")?,
            group: f.optional("group")?,
        })
    }
}

impl Record for BidResponse {
    const NAME: &'static str = "BidResponse";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(BidResponse {
            id: f.required("id")?,
            seatbid: f.required_non_empty("seatbid")?,
            bidid: f.optional("bidid")?,
            cur: f.optional("cur")?,
            customdata: f.optional("customdata")?,
            nbr: f.optional("nbr")?,
            ext: f.optional("ext")?,
        })
    }
}

record_serde!(Bid, SeatBid, BidResponse);
