use serde::{Deserialize, Serialize};

use super::step::Step;

/// 负载测试脚本：步骤按顺序执行
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            id: None,
            name: None,
            steps,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 从 JSON 文本解析脚本
    pub fn from_json(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_from_json() {
        let script = Script::from_json(
            r#"{"id":"abc","steps":[{"method":"GET","url":"http://example.com"}]}"#,
        )
        .unwrap();
        assert_eq!(script.id.as_deref(), Some("abc"));
        assert_eq!(script.steps.len(), 1);
        assert_eq!(script.steps[0].method, "GET");
    }

    #[test]
    fn test_script_missing_steps_is_empty() {
        let script = Script::from_json("{}").unwrap();
        assert!(script.is_empty());
    }
}
