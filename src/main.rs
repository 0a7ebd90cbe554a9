use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use overlord::app::Application;
use overlord::common::{init_logging, load_config, read_json_file, wait_for_shutdown_signal, StartupConfig};
use overlord::shutdown::ShutdownManager;
use overlord_config::{LogLevel, OutputFormat};
use overlord_core::{Task, WorkerView};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("overlord")
        .version("1.0.0")
        .about("分布式任务调度系统 - Worker选择")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，不指定时按默认路径查找"),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_name("FILE")
                .help("Worker快照文件 (JSON数组)")
                .required(true),
        )
        .arg(
            Arg::new("tasks")
                .short('t')
                .long("tasks")
                .value_name("FILE")
                .help("待调度任务文件 (JSON数组)")
                .required(true),
        )
        .arg(
            Arg::new("rounds")
                .short('r')
                .long("rounds")
                .value_name("N")
                .help("调度轮数")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .help("按配置的间隔持续调度，直到收到关闭信号")
                .action(ArgAction::SetTrue)
                .conflicts_with("rounds"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"]),
        )
        .get_matches();

    let startup_config = StartupConfig {
        config_path: matches.get_one::<String>("config").cloned(),
        log_level: matches
            .get_one::<String>("log-level")
            .map(|s| s.parse::<LogLevel>())
            .transpose()
            .map_err(anyhow::Error::msg)?,
        log_format: matches
            .get_one::<String>("log-format")
            .map(|s| s.parse::<OutputFormat>())
            .transpose()
            .map_err(anyhow::Error::msg)?,
    };
    let workers_path = matches
        .get_one::<String>("workers")
        .context("缺少Worker快照文件参数")?;
    let tasks_path = matches
        .get_one::<String>("tasks")
        .context("缺少任务文件参数")?;
    let rounds = matches.get_one::<usize>("rounds").copied().unwrap_or(1);
    let watch = matches.get_flag("watch");

    // 加载配置并初始化日志系统
    let config = load_config(&startup_config)?;
    init_logging(&config.logging)?;

    info!("启动Overlord Worker选择");
    if let Some(path) = &startup_config.config_path {
        info!("配置文件: {path}");
    }

    let workers: Vec<WorkerView> = read_json_file(workers_path)?;
    let tasks: Vec<Task> = read_json_file(tasks_path)?;
    let app = Application::new(config, workers, tasks)?;

    let report = if watch {
        let shutdown_manager = ShutdownManager::new();
        let shutdown_rx = shutdown_manager.subscribe().await;
        let mut app_handle = tokio::spawn(app.run(shutdown_rx));

        // 调度循环可能在收到信号之前自行结束，例如被配置禁用
        let finished = tokio::select! {
            joined = &mut app_handle => Some(joined),
            _ = wait_for_shutdown_signal() => None,
        };

        let joined = match finished {
            Some(joined) => joined,
            None => {
                info!("收到关闭信号，开始优雅关闭...");
                shutdown_manager.shutdown().await;
                match tokio::time::timeout(Duration::from_secs(30), app_handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!("调度循环关闭超时，强制退出");
                        return Err(anyhow::anyhow!("调度循环关闭超时"));
                    }
                }
            }
        };

        match joined {
            Ok(result) => result?,
            Err(e) => {
                error!("调度任务异常退出: {e}");
                return Err(e.into());
            }
        }
    } else {
        app.run_rounds(rounds).await?
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("序列化运行结果失败")?
    );
    info!(
        "运行结束: 分派 {} 个任务，剩余 {} 个",
        report.assignments.len(),
        report.pending.len()
    );
    Ok(())
}
