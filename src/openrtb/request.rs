use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Number;
use std::collections::HashSet;

use crate::error::Result;
use crate::openrtb::enums::{
    AdPosition, ApiFramework, AuctionType, BannerType, ConnectionType, ContentDeliveryMethod,
    CreativeAttribute, DeviceType, ExpandableDirection, LocationType, PlaybackMethod,
    VideoLinearity, VideoProtocol, VideoQuality,
};
use crate::openrtb::record::{record_serde, Ext, FieldReader, Record};

const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Publisher：站点/应用的所有者，所有字段可选
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Publisher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// Producer：联播内容的原始出品方，结构与 Publisher 相同
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Producer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// 地理位置，可能同时出现在 Device 和 User 下，两者冲突时由使用方决定取哪个
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regionfips104: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
}

impl Geo {
    /// 仅设置经纬度的 Geo；NaN / 无穷大的坐标视为缺省
    pub fn at(lat: f64, lon: f64) -> Self {
        Geo {
            lat: Number::from_f64(lat),
            lon: Number::from_f64(lon),
            ..Default::default()
        }
    }

    /// 经纬度都存在且非 0 时返回 (lat, lon)
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_ref().and_then(Number::as_f64);
        let lon = self.lon.as_ref().and_then(Number::as_f64);
        match (lat, lon) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Segment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 用户数据来源及其分段
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Data {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<Vec<Segment>>,
}

/// 用户信息；id 是交易平台侧的标识，设备相关标识见 Device
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyerid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yob: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Data>>,
}

/// 设备信息；geo 缺省时为空的 Geo 而不是 None
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnt: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub geo: Geo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub didsha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub didmd5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpidsha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpidmd5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectiontype: Option<ConnectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devicetype: Option<DeviceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashver: Option<String>,
}

impl Device {
    pub fn is_on_cellular(&self) -> bool {
        self.connectiontype.map_or(false, ConnectionType::is_cellular)
    }
}

/// 广告所在的内容（可能是联播内容，与 publisher 的整体内容不一定一致）
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videoquality: Option<VideoQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contentrating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userrating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livestream: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcerelationship: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<i32>,
}

/// 网站信息
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectioncat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagecat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacypolicy: Option<i32>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// 应用信息，与 Site 平行
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectioncat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagecat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacypolicy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// Banner 广告位，也用作视频的伴随广告
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Banner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<AdPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btype: Option<Vec<BannerType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battr: Option<Vec<CreativeAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topframe: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expdir: Option<Vec<ExpandableDirection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<ApiFramework>>,
}

impl Banner {
    /// 被屏蔽的 banner 类型（去重、无序）
    pub fn blocked_types(&self) -> HashSet<BannerType> {
        self.btype.iter().flatten().copied().collect()
    }

    /// 宽高都存在且非 0 时返回 (w, h)
    pub fn size(&self) -> Option<(u32, u32)> {
        match (self.w, self.h) {
            (Some(w), Some(h)) if w != 0 && h != 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// 视频广告位；mimes / linearity / minduration / maxduration / protocol 必填
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Video {
    pub mimes: Vec<String>,
    pub linearity: VideoLinearity,
    pub minduration: i32,
    pub maxduration: i32,
    pub protocol: VideoProtocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdelay: Option<i32>,
    pub sequence: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battr: Option<Vec<CreativeAttribute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxextended: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minbitrate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxbitrate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxingallowed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playbackmethod: Option<Vec<PlaybackMethod>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Vec<ContentDeliveryMethod>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<AdPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companionad: Option<Vec<Banner>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<Vec<ApiFramework>>,
}

impl Video {
    pub fn new(
        mimes: Vec<String>,
        linearity: VideoLinearity,
        minduration: i32,
        maxduration: i32,
        protocol: VideoProtocol,
    ) -> Self {
        Self {
            mimes,
            linearity,
            minduration,
            maxduration,
            protocol,
            w: None,
            h: None,
            startdelay: None,
            sequence: 1,
            battr: None,
            maxextended: None,
            minbitrate: None,
            maxbitrate: None,
            boxingallowed: None,
            playbackmethod: None,
            delivery: None,
            pos: None,
            companionad: None,
            api: None,
        }
    }
}

/// 私有交易中的单个 Deal
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    #[serde(
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub bidfloor: Option<Decimal>,
    pub bidfloorcur: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wadomain: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<AuctionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Deal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bidfloor: None,
            bidfloorcur: default_currency(),
            wseat: None,
            wadomain: None,
            at: None,
            ext: None,
        }
    }
}

/// 私有交易市场（PMP）
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Pmp {
    pub private_auction: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals: Option<Vec<Deal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// 一个可售卖的广告展示机会
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Impression {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmp: Option<Pmp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaymanager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instl: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagid: Option<String>,
    #[serde(
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub bidfloor: Option<Decimal>,
    pub bidfloorcur: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iframebuster: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Impression {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            banner: None,
            video: None,
            pmp: None,
            displaymanager: None,
            instl: None,
            tagid: None,
            bidfloor: None,
            bidfloorcur: default_currency(),
            iframebuster: None,
            ext: None,
        }
    }
}

/// 隐私法规信息
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Regs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coppa: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// OpenRTB BidRequest
///
/// site / app / device / user 缺省时为空对象；site 与 app 互斥的约束不在这里校验。
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BidRequest {
    pub id: String,
    pub imp: Vec<Impression>,
    pub site: Site,
    pub app: App,
    pub device: Device,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regs: Option<Regs>,
    pub at: AuctionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allimps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badv: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl BidRequest {
    pub fn new(id: impl Into<String>, imp: Vec<Impression>) -> Self {
        Self {
            id: id.into(),
            imp,
            site: Site::default(),
            app: App::default(),
            device: Device::default(),
            user: User::default(),
            regs: None,
            at: AuctionType::SecondPrice,
            tmax: None,
            wseat: None,
            allimps: None,
            cur: None,
            bcat: None,
            badv: None,
            ext: None,
        }
    }

    /// 最小可用请求：一个带空 Banner 的 Impression，常用于测试
    pub fn minimal(id: impl Into<String>, imp_id: impl Into<String>) -> Self {
        let mut imp = Impression::new(imp_id);
        imp.banner = Some(Banner::default());
        Self::new(id, vec![imp])
    }
}

impl Record for Publisher {
    const NAME: &'static str = "Publisher";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Publisher {
            id: f.optional("id")?,
            name: f.optional("name")?,
            cat: f.optional("cat")?,
            domain: f.optional("domain")?,
        })
    }
}

impl Record for Producer {
    const NAME: &'static str = "Producer";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Producer {
            id: f.optional("id")?,
            name: f.optional("name")?,
            cat: f.optional("cat")?,
            domain: f.optional("domain")?,
        })
    }
}

impl Record for Geo {
    const NAME: &'static str = "Geo";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Geo {
            lat: f.optional("lat")?,
            lon: f.optional("lon")?,
            country: f.optional("country")?,
            region: f.optional("region")?,
            regionfips104: f.optional("regionfips104")?,
            metro: f.optional("metro")?,
            city: f.optional("city")?,
            zip: f.optional("zip")?,
            location_type: f.optional("type")?,
        })
    }
}

impl Record for Segment {
    const NAME: &'static str = "Segment";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Segment {
            id: f.optional("id")?,
            name: f.optional("name")?,
            value: f.optional("value")?,
        })
    }
}

impl Record for Data {
    const NAME: &'static str = "Data";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Data {
            id: f.optional("id")?,
            name: f.optional("name")?,
            segment: f.optional("segment")?,
        })
    }
}

impl Record for User {
    const NAME: &'static str = "User";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(User {
            id: f.optional("id")?,
            buyerid: f.optional("buyerid")?,
            yob: f.optional("yob")?,
            gender: f.optional("gender")?,
            keywords: f.optional("keywords")?,
            customdata: f.optional("customdata")?,
            geo: f.optional("geo")?,
            data: f.optional("data")?,
        })
    }
}

impl Record for Device {
    const NAME: &'static str = "Device";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Device {
            dnt: f.optional("dnt")?,
            ua: f.optional("ua")?,
            ip: f.optional("ip")?,
            geo: f.with_default("geo", Geo::default)?,
            didsha1: f.optional("didsha1")?,
            didmd5: f.optional("didmd5")?,
            dpidsha1: f.optional("dpidsha1")?,
            dpidmd5: f.optional("dpidmd5")?,
            ipv6: f.optional("ipv6")?,
            carrier: f.optional("carrier")?,
            language: f.optional("language")?,
            make: f.optional("make")?,
            model: f.optional("model")?,
            os: f.optional("os")?,
            osv: f.optional("osv")?,
            js: f.optional("js")?,
            connectiontype: f.optional("connectiontype")?,
            devicetype: f.optional("devicetype")?,
            flashver: f.optional("flashver")?,
        })
    }
}

impl Record for Content {
    const NAME: &'static str = "Content";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Content {
            id: f.optional("id")?,
            episode: f.optional("episode")?,
            title: f.optional("title")?,
            series: f.optional("series")?,
            season: f.optional("season")?,
            url: f.optional("url")?,
            cat: f.optional("cat")?,
            videoquality: f.optional("videoquality")?,
            keywords: f.optional("keywords")?,
            contentrating: f.optional("contentrating")?,
            userrating: f.optional("userrating")?,
            context: f.optional("context")?,
            livestream: f.optional("livestream")?,
            sourcerelationship: f.optional("sourcerelationship")?,
            producer: f.optional("producer")?,
            len: f.optional("len")?,
        })
    }
}

impl Record for Site {
    const NAME: &'static str = "Site";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Site {
            id: f.optional("id")?,
            name: f.optional("name")?,
            domain: f.optional("domain")?,
            cat: f.optional("cat")?,
            sectioncat: f.optional("sectioncat")?,
            pagecat: f.optional("pagecat")?,
            page: f.optional("page")?,
            privacypolicy: f.optional("privacypolicy")?,
            referrer: f.optional("ref")?,
            search: f.optional("search")?,
            publisher: f.optional("publisher")?,
            content: f.optional("content")?,
            keywords: f.optional("keywords")?,
        })
    }
}

impl Record for App {
    const NAME: &'static str = "App";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(App {
            id: f.optional("id")?,
            name: f.optional("name")?,
            domain: f.optional("domain")?,
            cat: f.optional("cat")?,
            sectioncat: f.optional("sectioncat")?,
            pagecat: f.optional("pagecat")?,
            ver: f.optional("ver")?,
            bundle: f.optional("bundle")?,
            privacypolicy: f.optional("privacypolicy")?,
            paid: f.optional("paid")?,
            publisher: f.optional("publisher")?,
            content: f.optional("content")?,
            keywords: f.optional("keywords")?,
        })
    }
}

impl Record for Banner {
    const NAME: &'static str = "Banner";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Banner {
            w: f.optional("w")?,
            h: f.optional("h")?,
            id: f.optional("id")?,
            pos: f.optional("pos")?,
            btype: f.optional("btype")?,
            battr: f.optional("battr")?,
            mimes: f.optional("mimes")?,
            topframe: f.optional("topframe")?,
            expdir: f.optional("expdir")?,
            api: f.optional("api")?,
        })
    }
}

impl Record for Video {
    const NAME: &'static str = "Video";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Video {
            mimes: f.required("mimes")?,
            linearity: f.required("linearity")?,
            minduration: f.required("minduration")?,
            maxduration: f.required("maxduration")?,
            protocol: f.required("protocol")?,
            w: f.optional("w")?,
            h: f.optional("h")?,
            startdelay: f.optional("startdelay")?,
            sequence: f.with_default("sequence", || 1)?,
            battr: f.optional("battr")?,
            maxextended: f.optional("maxextended")?,
            minbitrate: f.optional("minbitrate")?,
            maxbitrate: f.optional("maxbitrate")?,
            boxingallowed: f.optional("boxingallowed")?,
            playbackmethod: f.optional("playbackmethod")?,
            delivery: f.optional("delivery")?,
            pos: f.optional("pos")?,
            companionad: f.optional("companionad")?,
            api: f.optional("api")?,
        })
    }
}

impl Record for Deal {
    const NAME: &'static str = "Deal";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Deal {
            id: f.required("id")?,
            bidfloor: f.optional("bidfloor")?,
            bidfloorcur: f.with_default("bidfloorcur", default_currency)?,
            wseat: f.optional("wseat")?,
            wadomain: f.optional("wadomain")?,
            at: f.optional("at")?,
            ext: f.optional("ext")?,
        })
    }
}

impl Record for Pmp {
    const NAME: &'static str = "Pmp";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Pmp {
            private_auction: f.with_default("private_auction", || 0)?,
            deals: f.optional("deals")?,
            ext: f.optional("ext")?,
        })
    }
}

impl Record for Impression {
    const NAME: &'static str = "Impression";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Impression {
            id: f.required("id")?,
            banner: f.optional("banner")?,
            video: f.optional("video")?,
            pmp: f.optional("pmp")?,
            displaymanager: f.optional("displaymanager")?,
            instl: f.optional("instl")?,
            tagid: f.optional("tagid")?,
            bidfloor: f.optional("bidfloor")?,
            bidfloorcur: f.with_default("bidfloorcur", default_currency)?,
            iframebuster: f.optional("iframebuster")?,
            ext: f.optional("ext")?,
        })
    }
}

impl Record for Regs {
    const NAME: &'static str = "Regs";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(Regs {
            coppa: f.optional("coppa")?,
            ext: f.optional("ext")?,
        })
    }
}

impl Record for BidRequest {
    const NAME: &'static str = "BidRequest";

    fn from_fields(f: &mut FieldReader) -> Result<Self> {
        Ok(BidRequest {
            id: f.required("id")?,
            imp: f.required_non_empty("imp")?,
            site: f.with_default("site", Site::default)?,
            app: f.with_default("app", App::default)?,
            device: f.with_default("device", Device::default)?,
            user: f.with_default("user", User::default)?,
            regs: f.optional("regs")?,
            at: f.with_default("at", || AuctionType::SecondPrice)?,
            tmax: f.optional("tmax")?,
            wseat: f.optional("wseat")?,
            allimps: f.optional("allimps")?,
            cur: f.optional("cur")?,
            bcat: f.optional("bcat")?,
            badv: f.optional("badv")?,
            ext: f.optional("ext")?,
        })
    }
}

record_serde!(
    Publisher, Producer, Geo, Segment, Data, User, Device, Content, Site, App, Banner, Video,
    Deal, Pmp, Impression, Regs, BidRequest,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn geo_coordinates_need_both_values() {
        assert_eq!(Geo::at(1.0, 2.0).coordinates(), Some((1.0, 2.0)));

        let geo = Geo { lat: None, lon: Number::from_f64(2.0), ..Default::default() };
        assert_eq!(geo.coordinates(), None);

        assert_eq!(Geo::at(0.0, 2.0).coordinates(), None);
        assert_eq!(Geo::at(f64::NAN, 2.0).coordinates(), None);
    }

    #[test]
    fn whole_number_coordinates_round_trip() {
        let input = json!({ "lat": 40, "lon": -74 });
        let geo = Geo::from_value(input.clone()).unwrap();

        assert_eq!(geo.coordinates(), Some((40.0, -74.0)));
        assert_eq!(serde_json::to_value(&geo).unwrap(), input);
        assert_eq!(serde_json::to_string(&geo).unwrap(), r#"{"lat":40,"lon":-74}"#);
    }

    #[test]
    fn device_cellular_detection() {
        let device = Device {
            connectiontype: Some(ConnectionType::Cellular4G),
            ..Default::default()
        };
        assert!(device.is_on_cellular());

        let device = Device { connectiontype: Some(ConnectionType::Wifi), ..Default::default() };
        assert!(!device.is_on_cellular());

        assert!(!Device::default().is_on_cellular());
    }

    #[test]
    fn banner_blocked_types_and_size() {
        let banner = Banner {
            btype: Some(vec![BannerType::JavaScript, BannerType::Iframe, BannerType::JavaScript]),
            ..Default::default()
        };
        let expected: HashSet<_> = [BannerType::JavaScript, BannerType::Iframe].into_iter().collect();
        assert_eq!(banner.blocked_types(), expected);
        assert!(Banner::default().blocked_types().is_empty());

        let banner = Banner { w: Some(300), h: Some(250), ..Default::default() };
        assert_eq!(banner.size(), Some((300, 250)));
        assert_eq!(Banner { w: Some(300), ..Default::default() }.size(), None);
        assert_eq!(Banner { w: Some(0), h: Some(250), ..Default::default() }.size(), None);
        assert_eq!(Banner { w: Some(300), h: Some(0), ..Default::default() }.size(), None);
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let request = BidRequest::minimal("req-1", "imp-1");

        assert_eq!(request.id, "req-1");
        assert_eq!(request.imp.len(), 1);
        assert_eq!(request.imp[0].id, "imp-1");
        assert_eq!(request.imp[0].banner, Some(Banner::default()));
        assert_eq!(request.imp[0].bidfloorcur, "USD");
        assert_eq!(request.site, Site::default());
        assert_eq!(request.app, App::default());
        assert_eq!(request.device, Device::default());
        assert_eq!(request.user, User::default());
        assert_eq!(request.at, AuctionType::SecondPrice);
    }

    #[test]
    fn decoded_defaults_match_programmatic_defaults() {
        let decoded = BidRequest::from_value(json!({
            "id": "req-1",
            "imp": [{ "id": "imp-1", "banner": {} }]
        }))
        .unwrap();
        assert_eq!(decoded, BidRequest::minimal("req-1", "imp-1"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let request = BidRequest::from_value(json!({
            "id": "req-1",
            "at": 1,
            "imp": [{ "id": "imp-1", "bidfloorcur": "EUR" }],
            "device": { "geo": { "lat": 51.5, "lon": -0.12 } }
        }))
        .unwrap();

        assert_eq!(request.at, AuctionType::FirstPrice);
        assert_eq!(request.imp[0].bidfloorcur, "EUR");
        assert_eq!(request.device.geo.coordinates(), Some((51.5, -0.12)));
    }

    #[test]
    fn video_sequence_defaults_to_one() {
        let video = Video::from_value(json!({
            "mimes": ["video/mp4"],
            "linearity": 1,
            "minduration": 5,
            "maxduration": 30,
            "protocol": 2
        }))
        .unwrap();

        assert_eq!(video.sequence, 1);
        assert_eq!(
            video,
            Video::new(
                vec!["video/mp4".into()],
                VideoLinearity::Linear,
                5,
                30,
                VideoProtocol::Vast2
            )
        );
    }

    #[test]
    fn video_missing_protocol() {
        let err = Video::from_value(json!({
            "mimes": ["video/mp4"],
            "linearity": 1,
            "minduration": 5,
            "maxduration": 30
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingRequiredField { record: "Video", field: "protocol" }
        ));
    }

    #[test]
    fn empty_imp_list_is_rejected() {
        let err = BidRequest::from_value(json!({ "id": "req-1", "imp": [] })).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingRequiredField { record: "BidRequest", field: "imp" }
        ));
    }

    #[test]
    fn nested_errors_name_the_inner_record() {
        let err = BidRequest::from_value(json!({
            "id": "req-1",
            "imp": [{ "id": "imp-1", "banner": { "w": "wide" } }]
        }))
        .unwrap_err();

        match err {
            ModelError::TypeMismatch { record, field, expected, found } => {
                assert_eq!(record, "Banner");
                assert_eq!(field, "w");
                assert_eq!(expected, "u32");
                assert_eq!(found, "string \"wide\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pmp_deals_decode_with_defaults() {
        let imp = Impression::from_value(json!({
            "id": "imp-1",
            "pmp": { "deals": [{ "id": "deal-1", "bidfloor": 1.25, "at": 3 }] }
        }))
        .unwrap();

        let pmp = imp.pmp.unwrap();
        assert_eq!(pmp.private_auction, 0);
        let deals = pmp.deals.unwrap();
        let deal = &deals[0];
        assert_eq!(deal.bidfloor, Some(Decimal::new(125, 2)));
        assert_eq!(deal.bidfloorcur, "USD");
        assert_eq!(deal.at, Some(AuctionType::FixedPrice));
    }

    #[test]
    fn ext_is_kept_opaque() {
        let imp = Impression::from_value(json!({
            "id": "imp-1",
            "ext": { "bidder": { "placement": 42 } }
        }))
        .unwrap();
        assert_eq!(imp.ext.unwrap().get("bidder"), Some(&json!({ "placement": 42 })));

        let err = Impression::from_value(json!({ "id": "imp-1", "ext": [1] })).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { record: "Impression", field: "ext", .. }));
    }

    #[test]
    fn site_ref_uses_wire_name() {
        let site = Site::from_value(json!({ "ref": "https://example.com/" })).unwrap();
        assert_eq!(site.referrer.as_deref(), Some("https://example.com/"));
        assert_eq!(serde_json::to_value(&site).unwrap(), json!({ "ref": "https://example.com/" }));
    }
}
