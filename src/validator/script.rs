use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Extractor, Script, Step};

/// 生成脚本里已占用或不可用作变量名的名字
///
/// 生成的是 ES module，始终是严格模式
const RESERVED_NAMES: &[&str] = &[
    "http", "check", "sleep", "options", "await", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "export", "extends",
    "false", "finally", "for", "function", "if", "import", "in", "instanceof", "let", "new",
    "null", "return", "super", "switch", "this", "throw", "true", "try", "typeof", "var",
    "void", "while", "with", "yield",
    // 严格模式
    "eval", "arguments", "implements", "interface", "package", "private", "protected",
    "public", "static",
];

/// 检查脚本结构是否完整
///
/// 不会 panic 也不返回 Err：没有问题时返回空列表，
/// 否则按发现顺序返回所有可读的错误信息
pub fn validate(script: Option<&Script>) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(script) = script else {
        errors.push("Script is required".to_string());
        return errors;
    };

    if script.steps.is_empty() {
        errors.push("Script must have at least one step".to_string());
    }

    // 变量名 -> 首次捕获它的步骤序号
    let mut captured: HashMap<&str, usize> = HashMap::new();

    for (index, step) in script.steps.iter().enumerate() {
        let number = index + 1;
        validate_step(step, number, &mut errors);

        for (position, extractor) in step.extract.iter().enumerate() {
            if extractor.is_blank() {
                if !extractor.name.trim().is_empty() {
                    errors.push(format!(
                        "Step {}: extractor {} needs a JSON path or regex",
                        number,
                        position + 1
                    ));
                }
                continue;
            }
            match check_extractor_name(extractor) {
                Err(message) => {
                    errors.push(format!(
                        "Step {}: extractor {} {}",
                        number,
                        position + 1,
                        message
                    ));
                }
                Ok(name) => {
                    if let Some(first) = captured.get(name) {
                        errors.push(format!(
                            "Step {}: variable '{}' is already captured by step {}",
                            number, name, first
                        ));
                    } else {
                        captured.insert(name, number);
                    }
                }
            }
        }
    }

    errors
}

fn validate_step(step: &Step, number: usize, errors: &mut Vec<String>) {
    if step.url.trim().is_empty() {
        errors.push(format!("Step {}: URL is required", number));
    }

    if step.method.trim().is_empty() {
        errors.push(format!("Step {}: HTTP method is required", number));
    } else if step.http_method().is_none() {
        errors.push(format!(
            "Step {}: unsupported HTTP method '{}'",
            number, step.method
        ));
    }

    // 空表达式会被生成器跳过，这里提前告知
    for (position, check) in step.checks.iter().enumerate() {
        if check.expression.trim().is_empty() {
            errors.push(format!(
                "Step {}: check {} needs an expression",
                number,
                position + 1
            ));
        }
    }
}

fn check_extractor_name(extractor: &Extractor) -> Result<&str, String> {
    let name = extractor.name.trim();
    if name.is_empty() {
        return Err("needs a variable name".to_string());
    }
    // 合法的 JS 标识符
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let identifier =
        IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());
    // 生成代码中保留的响应变量名 res1, res2, ...
    static RESPONSE_BINDING: OnceLock<Regex> = OnceLock::new();
    let response_binding = RESPONSE_BINDING.get_or_init(|| Regex::new(r"^res\d+$").unwrap());

    if !identifier.is_match(name) {
        return Err(format!("name '{}' is not a valid identifier", name));
    }
    if RESERVED_NAMES.contains(&name) || response_binding.is_match(name) {
        return Err(format!("name '{}' is reserved", name));
    }
    Ok(name)
}
