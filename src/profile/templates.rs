use std::fmt;
use std::str::FromStr;

use crate::ForgeError;
use crate::model::{Configuration, Executor, Stage};

/// 内置的场景模板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioTemplate {
    RampingVus,
    ConstantVus,
    PerVuIterations,
    SharedIterations,
}

impl ScenarioTemplate {
    pub const ALL: [ScenarioTemplate; 4] = [
        ScenarioTemplate::RampingVus,
        ScenarioTemplate::ConstantVus,
        ScenarioTemplate::PerVuIterations,
        ScenarioTemplate::SharedIterations,
    ];

    pub fn id(&self) -> &'static str {
        self.executor().as_str()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioTemplate::RampingVus => "Ramping VUs",
            ScenarioTemplate::ConstantVus => "Constant VUs",
            ScenarioTemplate::PerVuIterations => "Per VU Iterations",
            ScenarioTemplate::SharedIterations => "Shared Iterations",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioTemplate::RampingVus => "Gradually increase load to find breaking point",
            ScenarioTemplate::ConstantVus => "Maintain steady load throughout test",
            ScenarioTemplate::PerVuIterations => "Run specific number of iterations per VU",
            ScenarioTemplate::SharedIterations => "Share iterations across all VUs",
        }
    }

    pub fn executor(&self) -> Executor {
        match self {
            ScenarioTemplate::RampingVus => Executor::RampingVus,
            ScenarioTemplate::ConstantVus => Executor::ConstantVus,
            ScenarioTemplate::PerVuIterations => Executor::PerVuIterations,
            ScenarioTemplate::SharedIterations => Executor::SharedIterations,
        }
    }

    /// 模板对应的完整负载配置，其余字段取默认值
    pub fn configuration(&self) -> Configuration {
        let base = Configuration::default().with_executor(self.executor());
        match self {
            ScenarioTemplate::RampingVus => Configuration {
                stages: vec![
                    Stage::new(120, 10),
                    Stage::new(300, 50),
                    Stage::new(120, 100),
                    Stage::new(60, 0),
                ],
                ..base
            },
            ScenarioTemplate::ConstantVus => Configuration {
                vus: 50,
                duration: 300,
                ..base
            },
            ScenarioTemplate::PerVuIterations => Configuration {
                vus: 10,
                iterations: Some(100),
                ..base
            },
            ScenarioTemplate::SharedIterations => Configuration {
                vus: 50,
                iterations: Some(1000),
                ..base
            },
        }
    }
}

impl FromStr for ScenarioTemplate {
    type Err = ForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ScenarioTemplate::ALL
            .into_iter()
            .find(|t| t.id() == s.trim())
            .ok_or_else(|| ForgeError::Config(format!("Unknown scenario template: {}", s)))
    }
}

impl fmt::Display for ScenarioTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::LoadProfile;

    #[test]
    fn test_template_lookup() {
        assert_eq!(
            "ramping-vus".parse::<ScenarioTemplate>().unwrap(),
            ScenarioTemplate::RampingVus
        );
        assert!("spike".parse::<ScenarioTemplate>().is_err());
    }

    #[test]
    fn test_ramping_template_profile() {
        let config = ScenarioTemplate::RampingVus.configuration();
        let profile = LoadProfile::from_config(&config);
        assert_eq!(profile.total_duration, 600);
        assert_eq!(profile.max_vus, 100);
    }

    #[test]
    fn test_iteration_templates() {
        let config = ScenarioTemplate::SharedIterations.configuration();
        assert_eq!(config.executor, Executor::SharedIterations);
        assert_eq!(config.vus, 50);
        assert_eq!(config.iterations, Some(1000));
    }
}
