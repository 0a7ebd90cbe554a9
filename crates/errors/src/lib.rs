use thiserror::Error;

/// 调度器错误类型定义
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("无效的输入: {0}")]
    InvalidInput(String),
    #[error("Worker数据异常: {id} - {reason}")]
    MalformedWorker { id: String, reason: String },
    #[error("Worker未找到: {id}")]
    WorkerNotFound { id: String },
    #[error("任务分派被拒绝: Worker {worker_id} - {reason}")]
    AssignmentRejected { worker_id: String, reason: String },
    #[error("序列化错误: {0}")]
    Serialization(String),
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl SchedulerError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
    pub fn malformed_worker<I: Into<String>, R: Into<String>>(id: I, reason: R) -> Self {
        Self::MalformedWorker {
            id: id.into(),
            reason: reason.into(),
        }
    }
    pub fn worker_not_found<S: Into<String>>(id: S) -> Self {
        Self::WorkerNotFound { id: id.into() }
    }
    pub fn assignment_rejected<I: Into<String>, R: Into<String>>(worker_id: I, reason: R) -> Self {
        Self::AssignmentRejected {
            worker_id: worker_id.into(),
            reason: reason.into(),
        }
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// 调用方缺陷导致的错误，不能当作"暂无可用Worker"处理
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, SchedulerError::InvalidInput(_))
    }

    /// 刷新快照后重新选择即可恢复的错误
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SchedulerError::AssignmentRejected { .. } | SchedulerError::WorkerNotFound { .. }
        )
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::Serialization(err.to_string())
    }
}
