use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ForgeError;

pub const DEFAULT_VUS: u32 = 10;
pub const DEFAULT_DURATION: u64 = 30;
pub const DEFAULT_SETUP_TIMEOUT: u64 = 10;
pub const DEFAULT_TEARDOWN_TIMEOUT: u64 = 10;
pub const DEFAULT_GRACEFUL_STOP: &str = "30s";
pub const DEFAULT_USER_AGENT: &str = "generator/1.0";

/// 负载生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Executor {
    #[default]
    ConstantVus,
    RampingVus,
    ConstantArrivalRate,
    RampingArrivalRate,
    SharedIterations,
    PerVuIterations,
}

impl Executor {
    pub const ALL: [Executor; 6] = [
        Executor::ConstantVus,
        Executor::RampingVus,
        Executor::ConstantArrivalRate,
        Executor::RampingArrivalRate,
        Executor::SharedIterations,
        Executor::PerVuIterations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Executor::ConstantVus => "constant-vus",
            Executor::RampingVus => "ramping-vus",
            Executor::ConstantArrivalRate => "constant-arrival-rate",
            Executor::RampingArrivalRate => "ramping-arrival-rate",
            Executor::SharedIterations => "shared-iterations",
            Executor::PerVuIterations => "per-vu-iterations",
        }
    }

    pub fn uses_stages(&self) -> bool {
        matches!(self, Executor::RampingVus | Executor::RampingArrivalRate)
    }

    pub fn uses_arrival_rate(&self) -> bool {
        matches!(
            self,
            Executor::ConstantArrivalRate | Executor::RampingArrivalRate
        )
    }
}

impl FromStr for Executor {
    type Err = ForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Executor::ALL
            .into_iter()
            .find(|e| e.as_str() == s.trim())
            .ok_or_else(|| ForgeError::Config(format!("Unknown executor: {}", s)))
    }
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 爬坡阶段：在 duration 秒内把目标（VU 数或到达速率）调整到 target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Stage {
    pub duration: u64,
    pub target: u64,
}

impl Stage {
    pub fn new(duration: u64, target: u64) -> Self {
        Self { duration, target }
    }
}

/// 负载配置
///
/// 缺失字段在反序列化时取 `Default` 中的默认值；
/// 与当前 executor 无关的字段会被编译器忽略
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    pub vus: u32,

    /// 持续时间（秒）
    pub duration: u64,

    pub executor: Executor,

    /// ramping-vus / ramping-arrival-rate 使用
    pub stages: Vec<Stage>,

    /// *-iterations 使用
    pub iterations: Option<u64>,

    /// *-arrival-rate 使用
    pub rate: Option<u64>,
    pub time_unit: Option<String>,
    pub start_rate: Option<u64>,
    #[serde(rename = "preAllocatedVUs")]
    pub pre_allocated_vus: Option<u32>,
    #[serde(rename = "maxVUs")]
    pub max_vus: Option<u32>,

    /// *-iterations 的最长运行时间（秒）
    pub max_duration: Option<u64>,

    /// 指标名 -> 条件列表，保持输入顺序原样输出
    ///
    /// 条件可以是字符串，也可以是 k6 的 `{ "threshold": ..., "abortOnFail": ... }` 对象
    pub thresholds: Map<String, Value>,
    pub tags: Map<String, Value>,

    pub setup_timeout: u64,
    pub teardown_timeout: u64,
    pub graceful_stop: String,
    pub no_connection_reuse: bool,
    pub user_agent: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            vus: DEFAULT_VUS,
            duration: DEFAULT_DURATION,
            executor: Executor::default(),
            stages: Vec::new(),
            iterations: None,
            rate: None,
            time_unit: None,
            start_rate: None,
            pre_allocated_vus: None,
            max_vus: None,
            max_duration: None,
            thresholds: Map::new(),
            tags: Map::new(),
            setup_timeout: DEFAULT_SETUP_TIMEOUT,
            teardown_timeout: DEFAULT_TEARDOWN_TIMEOUT,
            graceful_stop: DEFAULT_GRACEFUL_STOP.to_string(),
            no_connection_reuse: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Configuration {
    pub fn constant_vus(vus: u32, duration: u64) -> Self {
        Self {
            vus,
            duration,
            ..Self::default()
        }
    }

    pub fn ramping_vus(stages: Vec<Stage>) -> Self {
        Self {
            executor: Executor::RampingVus,
            stages,
            ..Self::default()
        }
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_threshold(
        mut self,
        metric: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        let conditions = self
            .thresholds
            .entry(metric.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(conditions) = conditions {
            conditions.push(Value::from(condition.into()));
        }
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), Value::from(value.into()));
        self
    }
}

/// 取出一条阈值下的所有条件表达式
///
/// 条件必须是数组，元素为字符串或带 `threshold` 字符串字段的对象；否则返回 None
pub fn threshold_expressions(conditions: &Value) -> Option<Vec<&str>> {
    conditions
        .as_array()?
        .iter()
        .map(|condition| match condition {
            Value::String(expression) => Some(expression.as_str()),
            Value::Object(fields) => fields.get("threshold")?.as_str(),
            _ => None,
        })
        .collect()
}
