use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::model::config::DEFAULT_GRACEFUL_STOP;
use crate::model::{Configuration, Executor, Stage};

/// 唯一的 scenario 名称
pub const MAIN_SCENARIO: &str = "main";

const DEFAULT_RATE: u64 = 100;
const DEFAULT_TIME_UNIT: &str = "1s";
const DEFAULT_PRE_ALLOCATED_VUS: u32 = 50;
const DEFAULT_MAX_VUS: u32 = 100;
const DEFAULT_ITERATIONS: u64 = 100;
/// k6 中 *-iterations 的默认 maxDuration 为 10m
const DEFAULT_MAX_DURATION: u64 = 600;

/// k6 `export const options` 对象
///
/// 字段顺序即输出顺序；thresholds 和 tags 保持输入顺序
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vus: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<BTreeMap<String, Scenario>>,

    pub thresholds: Map<String, Value>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub tags: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_connection_reuse: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Options {
    /// 主 scenario（constant-vus 没有）
    pub fn main_scenario(&self) -> Option<&Scenario> {
        self.scenarios.as_ref()?.get(MAIN_SCENARIO)
    }
}

/// 一个 k6 scenario，`executor` 字段作为标签
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "executor", rename_all = "kebab-case")]
pub enum Scenario {
    #[serde(rename_all = "camelCase")]
    RampingVus {
        #[serde(rename = "startVUs")]
        start_vus: u64,
        stages: Vec<StageOptions>,
        graceful_ramp_down: String,
    },
    #[serde(rename_all = "camelCase")]
    ConstantArrivalRate {
        rate: u64,
        time_unit: String,
        duration: String,
        #[serde(rename = "preAllocatedVUs")]
        pre_allocated_vus: u32,
        #[serde(rename = "maxVUs")]
        max_vus: u32,
    },
    #[serde(rename_all = "camelCase")]
    RampingArrivalRate {
        start_rate: u64,
        time_unit: String,
        #[serde(rename = "preAllocatedVUs")]
        pre_allocated_vus: u32,
        #[serde(rename = "maxVUs")]
        max_vus: u32,
        stages: Vec<StageOptions>,
        graceful_stop: String,
    },
    #[serde(rename_all = "camelCase")]
    SharedIterations {
        vus: u32,
        iterations: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_duration: Option<String>,
        graceful_stop: String,
    },
    #[serde(rename_all = "camelCase")]
    PerVuIterations {
        vus: u32,
        iterations: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_duration: Option<String>,
        graceful_stop: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOptions {
    pub duration: String,
    pub target: u64,
}

impl From<&Stage> for StageOptions {
    fn from(stage: &Stage) -> Self {
        Self {
            duration: seconds(stage.duration),
            target: stage.target,
        }
    }
}

/// 从配置推导出的展示用指标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProfile {
    pub executor: Executor,
    /// 有效总时长（秒）
    pub total_duration: u64,
    /// 有效最大并发 VU 数
    pub max_vus: u64,
}

impl LoadProfile {
    pub fn from_config(config: &Configuration) -> Self {
        let (total_duration, max_vus) = match config.executor {
            Executor::ConstantVus => (config.duration, u64::from(config.vus)),
            Executor::RampingVus => {
                let stages = ramping_vus_stages(config);
                (
                    stages.iter().map(|s| s.duration).sum(),
                    stages.iter().map(|s| s.target).max().unwrap_or(0),
                )
            }
            Executor::ConstantArrivalRate => (config.duration, u64::from(max_vus(config))),
            Executor::RampingArrivalRate => (
                ramping_rate_stages(config).iter().map(|s| s.duration).sum(),
                u64::from(max_vus(config)),
            ),
            Executor::SharedIterations | Executor::PerVuIterations => (
                config.max_duration.unwrap_or(DEFAULT_MAX_DURATION),
                u64::from(config.vus),
            ),
        };

        Self {
            executor: config.executor,
            total_duration,
            max_vus,
        }
    }
}

/// 把负载配置编译为 k6 options 对象
///
/// 对任何类型正确的配置都不会失败，与当前 executor 无关的字段被忽略
pub fn compile_options(config: &Configuration) -> Options {
    debug!(executor = %config.executor, "compiling options");

    let mut options = Options {
        vus: None,
        duration: None,
        scenarios: None,
        thresholds: compile_thresholds(&config.thresholds),
        tags: config.tags.clone(),
        setup_timeout: (config.setup_timeout > 0).then(|| seconds(config.setup_timeout)),
        teardown_timeout: (config.teardown_timeout > 0).then(|| seconds(config.teardown_timeout)),
        no_connection_reuse: config.no_connection_reuse.then_some(true),
        user_agent: (!config.user_agent.is_empty()).then(|| config.user_agent.clone()),
    };

    match compile_scenario(config) {
        Some(scenario) => {
            options.scenarios = Some(BTreeMap::from([(MAIN_SCENARIO.to_string(), scenario)]));
        }
        None => {
            options.vus = Some(config.vus);
            options.duration = Some(seconds(config.duration));
        }
    }

    options
}

/// constant-vus 直接写在顶层，不生成 scenario
fn compile_scenario(config: &Configuration) -> Option<Scenario> {
    let graceful_stop = non_empty_or(&config.graceful_stop, DEFAULT_GRACEFUL_STOP);

    let scenario = match config.executor {
        Executor::ConstantVus => return None,
        Executor::RampingVus => Scenario::RampingVus {
            start_vus: 0,
            stages: ramping_vus_stages(config).iter().map(StageOptions::from).collect(),
            graceful_ramp_down: graceful_stop,
        },
        Executor::ConstantArrivalRate => Scenario::ConstantArrivalRate {
            rate: rate(config),
            time_unit: time_unit(config),
            duration: seconds(config.duration),
            pre_allocated_vus: pre_allocated_vus(config),
            max_vus: max_vus(config),
        },
        Executor::RampingArrivalRate => Scenario::RampingArrivalRate {
            start_rate: config.start_rate.unwrap_or(0),
            time_unit: time_unit(config),
            pre_allocated_vus: pre_allocated_vus(config),
            max_vus: max_vus(config),
            stages: ramping_rate_stages(config).iter().map(StageOptions::from).collect(),
            graceful_stop,
        },
        Executor::SharedIterations => Scenario::SharedIterations {
            vus: config.vus,
            iterations: iterations(config),
            max_duration: config.max_duration.map(seconds),
            graceful_stop,
        },
        Executor::PerVuIterations => Scenario::PerVuIterations {
            vus: config.vus,
            iterations: iterations(config),
            max_duration: config.max_duration.map(seconds),
            graceful_stop,
        },
    };

    Some(scenario)
}

/// 用户提供了任意一条阈值时完全替换默认值，不做合并
fn compile_thresholds(thresholds: &Map<String, Value>) -> Map<String, Value> {
    if !thresholds.is_empty() {
        return thresholds.clone();
    }

    let mut defaults = Map::new();
    defaults.insert("http_req_duration".to_string(), json!(["p(95)<500"]));
    defaults.insert("http_req_failed".to_string(), json!(["rate<0.1"]));
    defaults
}

/// 没有配置阶段时，在 duration 内爬升到 vus
fn ramping_vus_stages(config: &Configuration) -> Vec<Stage> {
    if config.stages.is_empty() {
        vec![Stage::new(config.duration, u64::from(config.vus))]
    } else {
        config.stages.clone()
    }
}

/// 没有配置阶段时，在 duration 内爬升到 rate
fn ramping_rate_stages(config: &Configuration) -> Vec<Stage> {
    if config.stages.is_empty() {
        vec![Stage::new(config.duration, rate(config))]
    } else {
        config.stages.clone()
    }
}

fn rate(config: &Configuration) -> u64 {
    config.rate.filter(|r| *r > 0).unwrap_or(DEFAULT_RATE)
}

fn time_unit(config: &Configuration) -> String {
    non_empty_or(config.time_unit.as_deref().unwrap_or(""), DEFAULT_TIME_UNIT)
}

fn pre_allocated_vus(config: &Configuration) -> u32 {
    config
        .pre_allocated_vus
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_PRE_ALLOCATED_VUS)
}

fn max_vus(config: &Configuration) -> u32 {
    config.max_vus.filter(|v| *v > 0).unwrap_or(DEFAULT_MAX_VUS)
}

fn iterations(config: &Configuration) -> u64 {
    config
        .iterations
        .filter(|i| *i > 0)
        .unwrap_or(DEFAULT_ITERATIONS)
}

fn seconds(value: u64) -> String {
    format!("{}s", value)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
