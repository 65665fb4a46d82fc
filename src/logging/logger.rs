use std::io;
use std::path::Path;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "openrtb_inspect.json";

/// 初始化全局 tracing 日志（JSON 格式，级别由 RUST_LOG 控制）
///
/// 指定 log_dir 时写入按小时滚动的文件，返回的 guard 必须持有到进程结束，
/// 否则缓冲中的日志会丢失。
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, SetGlobalDefaultError> {
    match log_dir {
        Some(dir) => {
            let log_file = rolling::hourly(dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
            let subscriber = Registry::default()
                .with(EnvFilter::from_default_env())
                .with(fmt::layer().json().with_writer(non_blocking));
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = Registry::default()
                .with(EnvFilter::from_default_env())
                .with(fmt::layer().json().with_writer(io::stderr));
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}
