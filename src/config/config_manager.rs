// src/config/config_manager.rs

use clap::ValueEnum;
use std::path::PathBuf;

/// 待解析的 payload 类型
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Request,
    Response,
}

/// openrtb-inspect 的运行配置
#[derive(Clone, Debug)]
pub struct ConfigManager {
    /// None 表示从 stdin 读取
    pub input: Option<PathBuf>,
    pub kind: PayloadKind,
    /// 设置后日志写入按小时滚动的文件，否则输出到 stderr
    pub log_dir: Option<PathBuf>,
    pub echo: bool,
}

impl ConfigManager {
    pub fn new(input: &str, kind: PayloadKind, log_dir: Option<&str>, echo: bool) -> Self {
        let input = match input {
            "-" => None,
            path => Some(PathBuf::from(path)),
        };
        ConfigManager {
            input,
            kind,
            log_dir: log_dir.map(PathBuf::from),
            echo,
        }
    }

    /// 用于日志中标识输入来源
    pub fn input_label(&self) -> String {
        self.input
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}
