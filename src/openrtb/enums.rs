// src/openrtb/enums.rs

//! OpenRTB 2.2 第 5 章的枚举码表。线上一律使用整数码。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::TryFrom;

use crate::openrtb::record::{mismatch, FieldError, FieldValue};

macro_rules! openrtb_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[serde(try_from = "i32", into = "i32")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> i32 {
                self as i32
            }
        }

        impl TryFrom<i32> for $name {
            type Error = String;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $( $code => Ok($name::$variant), )+
                    _ => Err(format!("Invalid value for {}: {}", stringify!($name), value)),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value as i32
            }
        }

        impl FieldValue for $name {
            fn from_field(value: Value) -> Result<Self, FieldError> {
                value
                    .as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .and_then(|n| $name::try_from(n).ok())
                    .ok_or_else(|| mismatch(concat!(stringify!($name), " code"), &value))
            }
        }
    };
}

openrtb_enum! {
    /// 竞价类型；3 仅用于 Deal
    pub enum AuctionType {
        FirstPrice = 1,
        SecondPrice = 2,
        FixedPrice = 3,
    }
}

openrtb_enum! {
    pub enum BannerType {
        XhtmlText = 1,
        XhtmlBanner = 2,
        JavaScript = 3,
        Iframe = 4,
    }
}

openrtb_enum! {
    pub enum CreativeAttribute {
        AudioAutoPlay = 1,
        AudioUserInitiated = 2,
        ExpandableAutomatic = 3,
        ExpandableClickInitiated = 4,
        ExpandableRolloverInitiated = 5,
        VideoInBannerAutoPlay = 6,
        VideoInBannerUserInitiated = 7,
        Pop = 8,
        ProvocativeOrSuggestive = 9,
        /// Shaky, flashing, flickering, extreme animation, smileys
        Annoying = 10,
        Surveys = 11,
        TextOnly = 12,
        UserInteractive = 13,
        WindowsDialogOrAlert = 14,
        HasAudioOnOffButton = 15,
        AdCanBeSkipped = 16,
    }
}

openrtb_enum! {
    pub enum AdPosition {
        Unknown = 0,
        AboveTheFold = 1,
        /// OpenRTB 2.1 起废弃
        MaybeVisible = 2,
        BelowTheFold = 3,
        Header = 4,
        Footer = 5,
        Sidebar = 6,
        Fullscreen = 7,
    }
}

openrtb_enum! {
    pub enum ExpandableDirection {
        Left = 1,
        Right = 2,
        Up = 3,
        Down = 4,
        Fullscreen = 5,
    }
}

openrtb_enum! {
    pub enum ApiFramework {
        Vpaid1 = 1,
        Vpaid2 = 2,
        Mraid1 = 3,
        Ormma = 4,
        Mraid2 = 5,
    }
}

openrtb_enum! {
    pub enum VideoLinearity {
        Linear = 1,
        NonLinear = 2,
    }
}

openrtb_enum! {
    pub enum VideoProtocol {
        Vast1 = 1,
        Vast2 = 2,
        Vast3 = 3,
        Vast1Wrapper = 4,
        Vast2Wrapper = 5,
        Vast3Wrapper = 6,
    }
}

openrtb_enum! {
    pub enum PlaybackMethod {
        AutoPlaySoundOn = 1,
        AutoPlaySoundOff = 2,
        ClickToPlay = 3,
        MouseOver = 4,
    }
}

openrtb_enum! {
    pub enum ContentDeliveryMethod {
        Streaming = 1,
        Progressive = 2,
    }
}

openrtb_enum! {
    pub enum VideoQuality {
        Unknown = 0,
        Professional = 1,
        Prosumer = 2,
        UserGenerated = 3,
    }
}

openrtb_enum! {
    pub enum LocationType {
        Gps = 1,
        Ip = 2,
        UserProvided = 3,
    }
}

openrtb_enum! {
    pub enum DeviceType {
        MobileOrTablet = 1,
        PersonalComputer = 2,
        ConnectedTv = 3,
        Phone = 4,
        Tablet = 5,
        ConnectedDevice = 6,
        SetTopBox = 7,
    }
}

openrtb_enum! {
    pub enum ConnectionType {
        Unknown = 0,
        Ethernet = 1,
        Wifi = 2,
        CellularUnknown = 3,
        Cellular2G = 4,
        Cellular3G = 5,
        Cellular4G = 6,
    }
}

impl ConnectionType {
    pub fn is_cellular(self) -> bool {
        matches!(
            self,
            ConnectionType::CellularUnknown
                | ConnectionType::Cellular2G
                | ConnectionType::Cellular3G
                | ConnectionType::Cellular4G
        )
    }
}

openrtb_enum! {
    /// 不出价原因
    pub enum NoBidReason {
        UnknownError = 0,
        TechnicalError = 1,
        InvalidRequest = 2,
        KnownWebSpider = 3,
        SuspectedNonHumanTraffic = 4,
        ProxyIp = 5,
        UnsupportedDevice = 6,
        BlockedPublisher = 7,
        UnmatchedUser = 8,
    }
}
