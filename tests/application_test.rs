use std::io::Write;
use std::time::Duration;

use overlord::app::{Application, AssignmentRecord};
use overlord::common::read_json_file;
use overlord::shutdown::ShutdownManager;
use overlord_config::AppConfig;
use overlord_core::{Task, WorkerView};
use overlord_testing_utils::{TaskBuilder, WorkerViewBuilder};
use tempfile::NamedTempFile;

fn create_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| TaskBuilder::new().with_id(&format!("task-{i}")).build())
        .collect()
}

fn assigned_to(records: &[AssignmentRecord], worker_id: &str) -> usize {
    records.iter().filter(|r| r.worker_id == worker_id).count()
}

#[tokio::test]
async fn test_equal_distribution_end_to_end() {
    let config = AppConfig::from_toml(
        r#"
[policy]
min_worker_version = "1.0"
"#,
    )
    .unwrap();
    let workers = vec![
        WorkerViewBuilder::new("a").with_load(2, 5).with_version("1.2").build(),
        WorkerViewBuilder::new("b").with_load(2, 5).with_version("1.0").build(),
        WorkerViewBuilder::new("old").with_load(0, 5).with_version("0.9").build(),
    ];

    let app = Application::new(config, workers, create_tasks(4)).unwrap();
    let report = app.run_rounds(1).await.unwrap();

    assert_eq!(report.strategy, "EqualDistribution");
    assert_eq!(report.assignments.len(), 4);
    // 负载相同时高版本优先，低于最低版本的Worker不参与
    assert_eq!(report.assignments[0].worker_id, "a");
    assert_eq!(assigned_to(&report.assignments, "a"), 2);
    assert_eq!(assigned_to(&report.assignments, "b"), 2);
    assert_eq!(assigned_to(&report.assignments, "old"), 0);
    assert!(report.pending.is_empty());
}

#[tokio::test]
async fn test_fill_capacity_with_strong_affinity() {
    let config = AppConfig::from_toml(
        r#"
[strategy]
type = "fillCapacityWithAffinity"

[strategy.affinity_config]
strong = true

[strategy.affinity_config.affinity]
wiki = ["host-a"]
"#,
    )
    .unwrap();
    let workers = vec![
        WorkerViewBuilder::new("a").with_capacity(1).build(),
        WorkerViewBuilder::new("b").with_capacity(5).build(),
    ];
    let tasks = vec![
        TaskBuilder::new().with_id("wiki-1").with_data_source("wiki").build(),
        TaskBuilder::new().with_id("wiki-2").with_data_source("wiki").build(),
        TaskBuilder::new().with_id("logs-1").with_data_source("logs").build(),
    ];

    let app = Application::new(config, workers, tasks).unwrap();
    let report = app.run_rounds(3).await.unwrap();

    assert_eq!(report.strategy, "FillCapacityWithAffinity");
    assert_eq!(
        report.assignments,
        vec![
            AssignmentRecord {
                task_id: "wiki-1".to_string(),
                worker_id: "a".to_string()
            },
            AssignmentRecord {
                task_id: "logs-1".to_string(),
                worker_id: "b".to_string()
            },
        ]
    );
    // 强亲和：专属主机满载时任务继续等待
    assert_eq!(report.pending, vec!["wiki-2".to_string()]);
    assert_eq!(report.rounds, 3);
}

#[tokio::test]
async fn test_invalid_tasks_reported() {
    let workers = vec![WorkerViewBuilder::new("a").build()];
    let tasks = vec![
        TaskBuilder::new().with_id("zero").with_resource("g", 0).build(),
        TaskBuilder::new().with_id("ok").build(),
    ];

    let app = Application::new(AppConfig::default(), workers, tasks).unwrap();
    let report = app.run_rounds(1).await.unwrap();

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].task_id, "zero");
    assert_eq!(report.assignments.len(), 1);
}

#[tokio::test]
async fn test_rounds_stop_when_queue_empty() {
    let workers = vec![WorkerViewBuilder::new("a").build()];
    let app = Application::new(AppConfig::default(), workers, create_tasks(2)).unwrap();

    let report = app.run_rounds(10).await.unwrap();

    assert_eq!(report.rounds, 1);
    assert!(report.pending.is_empty());
}

#[test]
fn test_duplicate_worker_ids_rejected() {
    let workers = vec![
        WorkerViewBuilder::new("a").build(),
        WorkerViewBuilder::new("a").build(),
    ];
    assert!(Application::new(AppConfig::default(), workers, create_tasks(1)).is_err());
}

#[test]
fn test_invalid_min_version_rejected() {
    let mut config = AppConfig::default();
    config.policy.min_worker_version = Some("1..0".to_string());
    assert!(Application::new(config, Vec::new(), Vec::new()).is_err());
}

#[tokio::test]
async fn test_watch_mode_until_shutdown() {
    let mut config = AppConfig::default();
    config.scheduler.round_interval_ms = 10;
    let workers = vec![WorkerViewBuilder::new("a").with_capacity(10).build()];
    let mut tasks = create_tasks(3);
    tasks.push(TaskBuilder::new().with_id("zero").with_resource("g", 0).build());
    let app = Application::new(config, workers, tasks).unwrap();

    let shutdown_manager = ShutdownManager::new();
    let shutdown_rx = shutdown_manager.subscribe().await;
    let handle = tokio::spawn(app.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_manager.shutdown().await;

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(report.assignments.len(), 3);
    assert!(report.pending.is_empty());
    assert_eq!(report.rounds, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].task_id, "zero");
}

#[tokio::test]
async fn test_watch_mode_disabled_returns_without_shutdown() {
    let mut config = AppConfig::default();
    config.scheduler.enabled = false;
    let workers = vec![WorkerViewBuilder::new("a").build()];
    let app = Application::new(config, workers, create_tasks(1)).unwrap();

    // 不发送关闭信号，循环也必须立即返回
    let shutdown_manager = ShutdownManager::new();
    let shutdown_rx = shutdown_manager.subscribe().await;
    let handle = tokio::spawn(app.run(shutdown_rx));

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_err());
}

#[tokio::test]
async fn test_default_config_admits_text_prefixed_versions() {
    let workers = vec![
        WorkerViewBuilder::new("a").with_version("v1.2.3").build(),
        WorkerViewBuilder::new("b").with_version("1..0").build(),
    ];
    let app = Application::new(AppConfig::default(), workers, create_tasks(2)).unwrap();

    let report = app.run_rounds(1).await.unwrap();

    assert_eq!(report.strategy, "EqualDistribution");
    // 默认不限制最低版本，但无法解析的版本仍然被排除
    assert_eq!(assigned_to(&report.assignments, "a"), 2);
    assert_eq!(assigned_to(&report.assignments, "b"), 0);
    assert!(report.pending.is_empty());
}

#[test]
fn test_read_snapshot_files() {
    let mut workers_file = NamedTempFile::new().unwrap();
    write!(
        workers_file,
        r#"[{{
            "id": "w1",
            "host": "10.0.0.1",
            "capacity": 4,
            "current_load": 1,
            "version": "0.9.1",
            "enabled": true,
            "supported_task_types": ["index"],
            "last_heartbeat": "2024-05-01T12:00:00Z"
        }}]"#
    )
    .unwrap();
    let mut tasks_file = NamedTempFile::new().unwrap();
    write!(
        tasks_file,
        r#"[
            {{"id": "t1", "task_type": "index"}},
            {{"id": "t2", "task_type": "index", "data_source": "wiki",
              "resource": {{"availability_group": "wiki_0", "required_capacity": 2}}}}
        ]"#
    )
    .unwrap();

    let workers: Vec<WorkerView> = read_json_file(workers_file.path()).unwrap();
    let tasks: Vec<Task> = read_json_file(tasks_file.path()).unwrap();

    assert_eq!(workers[0].available_capacity(), 3);
    assert!(workers[0].running_availability_groups.is_empty());
    assert_eq!(tasks[0].required_capacity(), 1);
    assert_eq!(tasks[1].availability_group(), "wiki_0");
    assert_eq!(tasks[1].required_capacity(), 2);
}
