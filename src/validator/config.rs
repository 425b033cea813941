use crate::model::config::threshold_expressions;
use crate::model::{Configuration, Executor};

/// 检查负载配置中明显无意义的取值
///
/// 编译器本身从不因配置失败（无关字段直接忽略），
/// 这里只给调用方一个提前发现问题的机会
pub fn validate_config(config: &Configuration) -> Vec<String> {
    let mut errors = Vec::new();
    let executor = config.executor;

    match executor {
        Executor::ConstantVus => {
            if config.vus == 0 {
                errors.push("vus must be greater than 0".to_string());
            }
            if config.duration == 0 {
                errors.push("duration must be greater than 0".to_string());
            }
        }
        Executor::RampingVus | Executor::RampingArrivalRate => {
            if config.stages.is_empty() {
                errors.push(format!("{} requires at least one stage", executor));
            }
            for (index, stage) in config.stages.iter().enumerate() {
                if stage.duration == 0 {
                    errors.push(format!("Stage {}: duration must be greater than 0", index + 1));
                }
            }
        }
        Executor::ConstantArrivalRate => {
            if config.duration == 0 {
                errors.push("duration must be greater than 0".to_string());
            }
        }
        Executor::SharedIterations | Executor::PerVuIterations => {
            if config.vus == 0 {
                errors.push("vus must be greater than 0".to_string());
            }
            if config.iterations == Some(0) {
                errors.push(format!("{} requires iterations greater than 0", executor));
            }
        }
    }

    if executor.uses_arrival_rate() && config.rate == Some(0) {
        errors.push("rate must be greater than 0".to_string());
    }

    for (metric, conditions) in &config.thresholds {
        if metric.trim().is_empty() {
            errors.push("Threshold metric name is required".to_string());
        }
        let Some(expressions) = threshold_expressions(conditions) else {
            errors.push(format!(
                "Threshold '{}': conditions must be a list of expressions",
                metric
            ));
            continue;
        };
        for condition in expressions {
            if !has_comparison(condition) {
                errors.push(format!(
                    "Threshold '{}': condition '{}' has no comparison operator",
                    metric, condition
                ));
            }
        }
    }

    for (key, value) in &config.tags {
        if !value.is_string() {
            errors.push(format!("Tag '{}': value must be a string", key));
        }
    }

    errors
}

fn has_comparison(condition: &str) -> bool {
    condition.contains(['<', '>', '='])
}
