use serde_json::{Map, Value};

use crate::model::{AuthConfig, Extractor, Method, Step};

const INDENT: &str = "  ";

/// checks 为空时使用的默认断言
pub const DEFAULT_CHECK_LABEL: &str = "status is 2xx";
pub const DEFAULT_CHECK_EXPRESSION: &str = "r.status >= 200 && r.status < 300";

/// 把一个步骤转换为 k6 代码片段
///
/// `index` 从 0 开始，注释和响应变量名使用从 1 开始的序号。
/// 缺失的可选字段一律回落到默认值，本函数不会失败。
/// 表达式为空的断言不输出（`validate` 会报告它们），
/// 全部为空时与没有断言一样使用默认断言
pub fn emit_step(step: &Step, index: usize) -> String {
    let number = index + 1;
    let binding = response_binding(number);
    let method = step.http_method();
    let mut code = String::new();

    // 1. 注释
    code.push_str(&format!(
        "{INDENT}// Step {}: {} {}\n",
        number,
        single_line(step.method.trim()),
        single_line(&step.url)
    ));

    // 2. 请求调用
    code.push_str(&format!(
        "{INDENT}const {} = http.{}({});\n",
        binding,
        k6_function(step, method),
        request_arguments(step, method).join(", ")
    ));

    // 3. 变量捕获
    for extractor in step.extract.iter().filter(|e| !e.is_blank()) {
        code.push_str(&format!(
            "{INDENT}const {} = {};\n",
            extractor.name.trim(),
            capture_expression(&binding, extractor)
        ));
    }

    // 4. 断言
    code.push_str(&format!("{INDENT}check({}, {{\n", binding));
    let mut checks = step
        .checks
        .iter()
        .enumerate()
        .filter(|(_, check)| !check.expression.trim().is_empty())
        .peekable();
    if checks.peek().is_none() {
        code.push_str(&check_entry(DEFAULT_CHECK_LABEL, DEFAULT_CHECK_EXPRESSION));
    }
    for (position, check) in checks {
        let label = if check.description.trim().is_empty() {
            format!("check {}", position + 1)
        } else {
            check.description.clone()
        };
        code.push_str(&check_entry(&label, check.expression.trim()));
    }
    code.push_str(&format!("{INDENT}}});\n"));

    // 5. 思考时间
    code.push_str(&format!("{INDENT}sleep({});\n", step.effective_think_time()));

    // 6. 步骤之间空一行
    code.push('\n');

    code
}

/// 组装请求参数（headers + auth）
///
/// 没有任何字段时返回 None，调用处就不再传 params 参数
pub fn build_request_params(step: &Step) -> Option<Map<String, Value>> {
    let mut headers = Map::new();
    let mut credentials = Map::new();

    // 后写覆盖先写，保留首次出现的位置
    for header in &step.headers {
        if header.key.is_empty() || header.value.is_empty() {
            continue;
        }
        headers.insert(header.key.clone(), Value::from(header.value.as_str()));
    }

    match &step.auth {
        AuthConfig::None => {}
        AuthConfig::Basic { username, password } => {
            credentials.insert("auth".to_string(), Value::from("basic"));
            credentials.insert("username".to_string(), Value::from(username.as_str()));
            credentials.insert("password".to_string(), Value::from(password.as_str()));
        }
        AuthConfig::Bearer { token } => {
            if !token.is_empty() {
                headers.insert("Authorization".to_string(), bearer(token));
            }
        }
        // 只使用已有的 access token，与 bearer 相同
        AuthConfig::OAuth2 { access_token, .. } => {
            if !access_token.is_empty() {
                headers.insert("Authorization".to_string(), bearer(access_token));
            }
        }
    }

    let mut params = Map::new();
    if !headers.is_empty() {
        params.insert("headers".to_string(), Value::Object(headers));
    }
    params.extend(credentials);

    (!params.is_empty()).then_some(params)
}

fn bearer(token: &str) -> Value {
    Value::from(format!("Bearer {}", token))
}

fn request_arguments(step: &Step, method: Option<Method>) -> Vec<String> {
    let mut args = vec![js_string(&step.url)];

    let payload = method
        .filter(Method::carries_payload)
        .and_then(|_| step.payload());
    if let Some(body) = payload {
        args.push(body.to_string());
    }

    if let Some(params) = build_request_params(step) {
        // 这些方法的第二个位置参数是 body，必须占位
        if payload.is_none() && method.is_some_and(|m| m.has_body_slot()) {
            args.push("null".to_string());
        }
        args.push(Value::Object(params).to_string());
    }

    args
}

fn k6_function(step: &Step, method: Option<Method>) -> String {
    match method {
        Some(method) => method.k6_function().to_string(),
        None => step.method.trim().to_lowercase(),
    }
}

fn capture_expression(binding: &str, extractor: &Extractor) -> String {
    let path = extractor.json_path.trim();
    if !path.is_empty() {
        let selector = path
            .strip_prefix("$.")
            .or_else(|| path.strip_prefix('$'))
            .unwrap_or(path);
        if selector.is_empty() {
            return format!("{}.json()", binding);
        }
        return format!("{}.json({})", binding, js_string(selector));
    }

    format!(
        "((({}.body || \"\").match(new RegExp({}))) || [])[1]",
        binding,
        js_string(&extractor.regex)
    )
}

fn check_entry(label: &str, expression: &str) -> String {
    format!("{INDENT}{INDENT}{}: (r) => {},\n", js_string(label), expression)
}

fn response_binding(number: usize) -> String {
    format!("res{}", number)
}

/// JSON 字符串字面量同时也是合法的 JS 字符串字面量
fn js_string(text: &str) -> String {
    Value::from(text).to_string()
}

/// JS 的行终止符还包括 U+2028 / U+2029
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n', '\u{2028}', '\u{2029}'], " ")
}
