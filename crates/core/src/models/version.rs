use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{SchedulerError, SchedulerResult};

const SEPARATORS: [char; 4] = ['.', '-', '_', '+'];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Numeric(u64),
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Numeric(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Numeric(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Worker版本号
///
/// 按分段比较：数字段按数值比较，文本段按字典序比较，同一位置数字段高于文本段。
/// 较短的一方视为用 `0` 补齐，因此末尾的零段不影响比较 (`1.0 == 1.0.0`)，
/// 多出的非零数字段表示更新 (`1.0 < 1.0.1`)，多出的文本段表示预发布 (`1.0-rc1 < 1.0`)。
#[derive(Debug, Clone)]
pub struct WorkerVersion {
    raw: String,
    segments: Vec<Segment>,
}

impl WorkerVersion {
    /// 解析版本号，空串、空白字符、空分段或数字溢出均视为异常
    pub fn parse(raw: &str) -> SchedulerResult<Self> {
        if raw.is_empty() {
            return Err(SchedulerError::invalid_input("版本号不能为空"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(SchedulerError::invalid_input(format!(
                "版本号包含空白字符: {raw:?}"
            )));
        }

        let mut segments = Vec::new();
        for part in raw.split(SEPARATORS) {
            if part.is_empty() {
                return Err(SchedulerError::invalid_input(format!(
                    "版本号包含空分段: {raw}"
                )));
            }
            let segment = if part.bytes().all(|b| b.is_ascii_digit()) {
                let value = part.parse::<u64>().map_err(|e| {
                    SchedulerError::invalid_input(format!("版本号数字段溢出: {raw} ({e})"))
                })?;
                Segment::Numeric(value)
            } else {
                Segment::Text(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for WorkerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let padding = Segment::Numeric(0);
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).unwrap_or(&padding);
            let b = other.segments.get(i).unwrap_or(&padding);
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for WorkerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for WorkerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WorkerVersion {}

impl fmt::Display for WorkerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for WorkerVersion {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WorkerVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for WorkerVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
