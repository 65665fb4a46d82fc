//! OpenRTB 2.x 竞价请求 / 竞价响应的强类型对象模型。
//!
//! 构造时校验必填字段、填充默认值、忽略未声明的字段；
//! 序列化时省略缺省字段，价格按 decimal 原文输出。

pub mod error;
pub mod openrtb;

pub use crate::error::{ModelError, Result};
pub use crate::openrtb::enums::*;
pub use crate::openrtb::record::{Ext, Record};
pub use crate::openrtb::request::{
    App, Banner, BidRequest, Content, Data, Deal, Device, Geo, Impression, Pmp, Producer,
    Publisher, Regs, Segment, Site, User, Video,
};
pub use crate::openrtb::response::{Bid, BidResponse, SeatBid};
pub use crate::openrtb::{from_json, from_slice};
