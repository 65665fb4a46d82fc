use thiserror::Error;

/// OpenRTB 对象模型的错误类型
///
/// 构造期错误（缺少必填字段、类型不匹配）和访问期错误（空序列）都在发生点同步返回，
/// 不做重试，也不做部分构造。
#[derive(Error, Debug)]
pub enum ModelError {
    /// 必填字段缺失（或为 null / 空数组）
    #[error("{record}.{field} is required")]
    MissingRequiredField {
        record: &'static str,
        field: &'static str,
    },

    /// 字段值无法转换为声明类型
    #[error("{record}.{field}: expected {expected}, found {found}")]
    TypeMismatch {
        record: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// first_bid 一类的访问器遇到空序列
    #[error("{record}.{field} is empty")]
    EmptySequenceAccess {
        record: &'static str,
        field: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
