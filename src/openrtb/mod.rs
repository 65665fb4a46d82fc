pub mod enums;
pub mod record;
pub mod request;
pub mod response;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use record::Record;

/// 从 JSON 文本解析任意 OpenRTB 对象
pub fn from_json<T: Record>(payload: &str) -> Result<T> {
    let value: Value = serde_json::from_str(payload)?;
    decode(value)
}

/// 同 [`from_json`]，输入为原始字节（如 HTTP body）
pub fn from_slice<T: Record>(payload: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(payload)?;
    decode(value)
}

fn decode<T: Record>(value: Value) -> Result<T> {
    T::from_value(value).map_err(|e| {
        debug!(record = T::NAME, error = %e, "failed to decode OpenRTB payload");
        e
    })
}
