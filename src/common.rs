use std::path::Path;

use anyhow::{Context, Result};
use overlord_config::{AppConfig, LogConfig, LogLevel, OutputFormat};
use serde::de::DeserializeOwned;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 通用的应用启动配置
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub config_path: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<OutputFormat>,
}

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的日志级别。
pub fn init_logging(log_config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.level.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_config.format {
        OutputFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        OutputFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
    }

    Ok(())
}

/// 加载应用配置，命令行参数覆盖配置文件中的日志设置
pub fn load_config(startup_config: &StartupConfig) -> Result<AppConfig> {
    let config_path = startup_config.config_path.as_deref();
    let mut config = AppConfig::load(config_path).with_context(|| match config_path {
        Some(path) => format!("加载配置文件失败: {path}"),
        None => "加载默认配置失败".to_string(),
    })?;

    if let Some(level) = startup_config.log_level {
        config.logging.level = level;
    }
    if let Some(format) = startup_config.log_format {
        config.logging.format = format;
    }

    Ok(config)
}

/// 读取JSON格式的输入文件
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("解析JSON失败: {}", path.display()))
}

/// 等待关闭信号
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("安装Ctrl+C信号处理器失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("安装SIGTERM信号处理器失败: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_with_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[policy]
min_worker_version = "1.2"

[logging]
level = "warn"
"#
        )
        .unwrap();

        let startup = StartupConfig {
            config_path: Some(file.path().to_string_lossy().to_string()),
            log_level: Some(LogLevel::Debug),
            log_format: Some(OutputFormat::Json),
        };
        let config = load_config(&startup).unwrap();

        assert_eq!(config.policy.min_worker_version.as_deref(), Some("1.2"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_config_missing_file() {
        let startup = StartupConfig {
            config_path: Some("/nonexistent/overlord.toml".to_string()),
            ..StartupConfig::default()
        };
        assert!(load_config(&startup).is_err());
    }

    #[test]
    fn test_read_json_file_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result: Result<Vec<String>> = read_json_file(file.path());
        assert!(result.is_err());
        let result: Result<Vec<String>> = read_json_file("/nonexistent/workers.json");
        assert!(result.is_err());
    }
}
