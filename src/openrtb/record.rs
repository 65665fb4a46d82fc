// src/openrtb/record.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::trace;

use crate::error::{ModelError, Result};

/// 根节点不是 JSON 对象时，TypeMismatch 中使用的字段名
pub const ROOT: &str = "$";

/// 扩展字段 `ext`：不受 schema 约束的任意 JSON 对象
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Ext(pub Map<String, Value>);

impl Ext {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// 单个字段值转换失败的原因，由 [`FieldReader`] 补上记录名和字段名
#[derive(Debug)]
pub enum FieldError {
    Mismatch {
        expected: &'static str,
        found: String,
    },
    /// 嵌套记录内部的错误，原样向上传递
    Nested(ModelError),
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

pub(crate) fn mismatch(expected: &'static str, value: &Value) -> FieldError {
    FieldError::Mismatch {
        expected,
        found: describe(value),
    }
}

/// 可以从 JSON 值构造的字段类型
pub trait FieldValue: Sized {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError>;
}

impl FieldValue for String {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

macro_rules! integer_field {
    ($($ty:ty),+) => {$(
        impl FieldValue for $ty {
            fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
                value
                    .as_i64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| mismatch(stringify!($ty), &value))
            }
        }
    )+};
}

integer_field!(i32, u32);

/// 浮点字段保留数字原文（`40` 不会变成 `40.0`），取值时再转 f64
impl FieldValue for Number {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(mismatch("number", &other)),
        }
    }
}

/// 价格类字段：按数字原文解析，避免经过 f64
impl FieldValue for Decimal {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
        let Value::Number(n) = &value else {
            return Err(mismatch("decimal", &value));
        };
        let text = n.to_string();
        Decimal::from_str_exact(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| mismatch("decimal", &value))
    }
}

impl FieldValue for Ext {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
        match value {
            Value::Object(map) => Ok(Ext(map)),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn from_field(value: Value) -> std::result::Result<Self, FieldError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_field).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

/// 嵌套记录：必须是 JSON 对象，内部错误不再改写
pub(crate) fn nested<T: Record>(value: Value) -> std::result::Result<T, FieldError> {
    match value {
        Value::Object(_) => T::from_value(value).map_err(FieldError::Nested),
        other => Err(mismatch("object", &other)),
    }
}

/// 按字段声明逐个取值的读取器
///
/// 读取过的字段会从 map 中移除，剩下的就是 schema 未声明的字段，
/// 在 [`FieldReader::finish`] 中忽略。
pub struct FieldReader {
    record: &'static str,
    fields: Map<String, Value>,
}

impl FieldReader {
    pub fn new(record: &'static str, fields: Map<String, Value>) -> Self {
        Self { record, fields }
    }

    fn take(&mut self, name: &str) -> Option<Value> {
        match self.fields.remove(name) {
            Some(Value::Null) | None => None,
            value => value,
        }
    }

    fn convert<T: FieldValue>(&self, name: &'static str, value: Value) -> Result<T> {
        T::from_field(value).map_err(|e| match e {
            FieldError::Mismatch { expected, found } => ModelError::TypeMismatch {
                record: self.record,
                field: name,
                expected,
                found,
            },
            FieldError::Nested(inner) => inner,
        })
    }

    fn missing(&self, name: &'static str) -> ModelError {
        ModelError::MissingRequiredField {
            record: self.record,
            field: name,
        }
    }

    /// 必填字段
    pub fn required<T: FieldValue>(&mut self, name: &'static str) -> Result<T> {
        let value = self.take(name).ok_or_else(|| self.missing(name))?;
        self.convert(name, value)
    }

    /// 必填且至少包含一个元素的数组字段
    pub fn required_non_empty<T: FieldValue>(&mut self, name: &'static str) -> Result<Vec<T>> {
        let items: Vec<T> = self.required(name)?;
        if items.is_empty() {
            return Err(self.missing(name));
        }
        Ok(items)
    }

    /// 可选字段，缺省时为 None
    pub fn optional<T: FieldValue>(&mut self, name: &'static str) -> Result<Option<T>> {
        match self.take(name) {
            Some(value) => self.convert(name, value).map(Some),
            None => Ok(None),
        }
    }

    /// 带默认值的可选字段
    pub fn with_default<T, F>(&mut self, name: &'static str, default: F) -> Result<T>
    where
        T: FieldValue,
        F: FnOnce() -> T,
    {
        Ok(self.optional(name)?.unwrap_or_else(default))
    }

    /// 未声明的字段不报错，只记录 trace 日志
    pub fn finish(self) {
        for key in self.fields.keys() {
            trace!(record = self.record, field = %key, "ignoring unknown field");
        }
    }
}

/// OpenRTB 对象：显式列出每个字段的必填/可选/默认值声明
pub trait Record: Sized {
    const NAME: &'static str;

    fn from_fields(fields: &mut FieldReader) -> Result<Self>;

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let mut reader = FieldReader::new(Self::NAME, map);
                let record = Self::from_fields(&mut reader)?;
                reader.finish();
                Ok(record)
            }
            other => Err(ModelError::TypeMismatch {
                record: Self::NAME,
                field: ROOT,
                expected: "object",
                found: describe(&other),
            }),
        }
    }
}

/// 为记录类型生成 `FieldValue` 和走 `Record::from_value` 的 `Deserialize`
macro_rules! record_serde {
    ($($ty:ident),+ $(,)?) => {$(
        impl $crate::openrtb::record::FieldValue for $ty {
            fn from_field(
                value: ::serde_json::Value,
            ) -> ::std::result::Result<Self, $crate::openrtb::record::FieldError> {
                $crate::openrtb::record::nested(value)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::openrtb::record::Record>::from_value(value)
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    )+};
}

pub(crate) use record_serde;
