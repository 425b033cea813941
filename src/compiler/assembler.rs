use tracing::debug;

use crate::compiler::options::compile_options;
use crate::compiler::step::emit_step;
use crate::error::ValidationError;
use crate::model::{Configuration, Script};
use crate::validator::validate;
use crate::Result;

/// 固定的 import 前导
pub const IMPORT_PREAMBLE: &str = "import http from 'k6/http';\nimport { check, sleep } from 'k6';\n";

/// 没有步骤时的占位函数体
const EMPTY_BODY: &str = "  // No steps defined\n  sleep(1);";

pub struct ScriptAssembler;

impl ScriptAssembler {
    /// 校验 -> 编译 options -> 逐个生成步骤 -> 拼成完整脚本
    ///
    /// 相同输入总是得到逐字节相同的输出
    pub fn compile(script: &Script, config: &Configuration) -> Result<String> {
        let errors = validate(Some(script));
        if !errors.is_empty() {
            debug!(count = errors.len(), "script rejected by validator");
            return Err(ValidationError::new(errors).into());
        }

        let options = compile_options(config);
        let options_json = serde_json::to_string_pretty(&options)?;

        let body = Self::render_body(script);
        debug!(steps = script.steps.len(), executor = %config.executor, "script compiled");

        Ok(format!(
            "{}\nexport const options = {};\n\nexport default function() {{\n{}\n}}\n",
            IMPORT_PREAMBLE, options_json, body
        ))
    }

    fn render_body(script: &Script) -> String {
        if script.steps.is_empty() {
            return EMPTY_BODY.to_string();
        }

        let mut body = String::new();
        for (index, step) in script.steps.iter().enumerate() {
            body.push_str(&emit_step(step, index));
        }
        // 最后一个步骤后的分隔空行不需要
        body.trim_end_matches('\n').to_string()
    }
}

/// 把脚本和负载配置编译为 k6 脚本文本
pub fn compile(script: &Script, config: &Configuration) -> Result<String> {
    ScriptAssembler::compile(script, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForgeError;
    use crate::model::Step;

    #[test]
    fn test_document_layout() {
        let script = Script::new(vec![Step::new("GET", "https://x/y").with_think_time(2.0)]);
        let config = Configuration::constant_vus(5, 10);
        let document = compile(&script, &config).unwrap();

        assert!(document.starts_with(
            "import http from 'k6/http';\nimport { check, sleep } from 'k6';\n\nexport const options = {\n"
        ));
        assert!(document.contains("};\n\nexport default function() {\n  // Step 1: GET https://x/y\n"));
        assert!(document.ends_with("  sleep(2);\n}\n"));
    }

    #[test]
    fn test_validation_failure_carries_all_messages() {
        let script = Script::new(vec![Step::new("", ""), Step::new("GET", "")]);
        let err = compile(&script, &Configuration::default()).unwrap_err();
        match err {
            ForgeError::Validation(validation) => {
                assert_eq!(
                    validation.messages(),
                    &[
                        "Step 1: URL is required".to_string(),
                        "Step 1: HTTP method is required".to_string(),
                        "Step 2: URL is required".to_string(),
                    ]
                );
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_script_is_rejected() {
        let err = compile(&Script::default(), &Configuration::default()).unwrap_err();
        assert!(matches!(err, ForgeError::Validation(_)));
    }

    #[test]
    fn test_placeholder_body() {
        assert_eq!(
            ScriptAssembler::render_body(&Script::default()),
            "  // No steps defined\n  sleep(1);"
        );
    }

    #[test]
    fn test_steps_separated_by_blank_line() {
        let script = Script::new(vec![
            Step::new("GET", "http://a"),
            Step::new("GET", "http://b"),
        ]);
        let body = ScriptAssembler::render_body(&script);
        assert!(body.contains("  sleep(1);\n\n  // Step 2: GET http://b\n"));
        assert!(body.ends_with("  sleep(1);"));
    }
}
