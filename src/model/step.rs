use std::fmt;
use std::str::FromStr;

use crate::{ForgeError, Result};
use serde::{Deserialize, Serialize};

/// 未设置（或 <= 0）时的默认思考时间，单位秒
pub const DEFAULT_THINK_TIME: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = ForgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(ForgeError::Other(format!("Invalid HTTP method: {}", s))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// k6 `http` 模块里对应的函数名
    ///
    /// `delete` 是 JS 保留字，k6 导出的是 `http.del`
    pub fn k6_function(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "del",
            Method::Patch => "patch",
            Method::Head => "head",
            Method::Options => "options",
        }
    }

    /// 是否会把 step.body 写进请求调用
    pub fn carries_payload(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }

    /// k6 函数签名中第二个位置参数是否为 body
    ///
    /// 对这些方法，params 必须放在第三个位置
    pub fn has_body_slot(&self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Patch | Method::Delete | Method::Options
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个请求头，名称可以重复（合并时后写覆盖先写）
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Header {
    #[serde(default, alias = "name")]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    #[default]
    None,
    Basic {
        #[serde(default)]
        username: String,
        #[serde(default)]
        password: String,
    },
    Bearer {
        #[serde(default)]
        token: String,
    },
    /// 只支持已经拿到 access token 的场景，token 交换不在生成脚本内完成
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        #[serde(default, alias = "token")]
        access_token: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        token_url: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        client_id: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        client_secret: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        scope: String,
    },
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthConfig::Bearer {
            token: token.into(),
        }
    }

    pub fn oauth2(access_token: impl Into<String>) -> Self {
        AuthConfig::OAuth2 {
            access_token: access_token.into(),
            token_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            scope: String::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::OAuth2 { .. } => "oauth2",
        }
    }
}

/// 检查断言：表达式使用 k6 response 对象的语法，原样拼接
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct CheckAssertion {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
}

impl CheckAssertion {
    pub fn new(description: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expression: expression.into(),
        }
    }
}

/// 从响应中捕获变量
///
/// `json_path` 优先于 `regex`；两者都为空时该条目被忽略
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extractor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub json_path: String,
    #[serde(default)]
    pub regex: String,
}

impl Extractor {
    pub fn json_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json_path: path.into(),
            regex: String::new(),
        }
    }

    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json_path: String::new(),
            regex: pattern.into(),
        }
    }

    /// 没有任何捕获来源（界面上的空行）
    pub fn is_blank(&self) -> bool {
        self.json_path.trim().is_empty() && self.regex.is_empty()
    }
}

/// 脚本中的一个 HTTP 步骤
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// HTTP 方法，空字符串视为缺失
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub url: String,

    /// Headers 列表，保持原始顺序
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<CheckAssertion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extract: Vec<Extractor>,

    /// 思考时间（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub think_time: Option<f64>,
}

impl Step {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_check(
        mut self,
        description: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.checks.push(CheckAssertion::new(description, expression));
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extract.push(extractor);
        self
    }

    pub fn with_think_time(mut self, seconds: f64) -> Self {
        self.think_time = Some(seconds);
        self
    }

    /// 解析后的 HTTP 方法，缺失或不认识时返回 None
    pub fn http_method(&self) -> Option<Method> {
        self.method.parse().ok()
    }

    /// 有效思考时间：未设置、<= 0 或非有限值时回落到 1 秒
    pub fn effective_think_time(&self) -> f64 {
        self.think_time
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_THINK_TIME)
    }

    /// 非空的请求体
    pub fn payload(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse(" Patch ").unwrap(), Method::Patch);
        assert!(Method::parse("FETCH").is_err());
        assert!(Method::parse("").is_err());
    }

    #[test]
    fn test_method_k6_function() {
        assert_eq!(Method::Get.k6_function(), "get");
        assert_eq!(Method::Delete.k6_function(), "del");
        assert!(Method::Post.carries_payload());
        assert!(!Method::Delete.carries_payload());
        assert!(Method::Delete.has_body_slot());
        assert!(!Method::Head.has_body_slot());
    }

    #[test]
    fn test_effective_think_time() {
        let step = Step::new("GET", "http://example.com");
        assert_eq!(step.effective_think_time(), 1.0);
        assert_eq!(step.clone().with_think_time(0.0).effective_think_time(), 1.0);
        assert_eq!(step.clone().with_think_time(-3.0).effective_think_time(), 1.0);
        assert_eq!(step.with_think_time(2.5).effective_think_time(), 2.5);
    }

    #[test]
    fn test_auth_deserialize_tagged() {
        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"none","username":"","password":"","token":""}"#)
                .unwrap();
        assert_eq!(auth, AuthConfig::None);

        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"bearer","token":"abc","username":""}"#).unwrap();
        assert_eq!(auth, AuthConfig::bearer("abc"));

        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"basic","username":"u","password":"p"}"#).unwrap();
        assert_eq!(auth, AuthConfig::basic("u", "p"));

        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"oauth2","accessToken":"t"}"#).unwrap();
        assert_eq!(auth.kind(), "oauth2");
    }

    #[test]
    fn test_step_deserialize_defaults() {
        let step: Step = serde_json::from_str(r#"{"method":"GET"}"#).unwrap();
        assert_eq!(step.url, "");
        assert_eq!(step.auth, AuthConfig::None);
        assert!(step.headers.is_empty());
        assert!(step.think_time.is_none());

        let step: Step = serde_json::from_str(
            r#"{"method":"POST","url":"http://x","headers":[{"key":"A","value":"1"}],
                "thinkTime":3,"extract":[{"name":"id","jsonPath":"$.id","regex":""}]}"#,
        )
        .unwrap();
        assert_eq!(step.headers[0], Header::new("A", "1"));
        assert_eq!(step.think_time, Some(3.0));
        assert_eq!(step.extract[0].json_path, "$.id");
    }

    #[test]
    fn test_payload_ignores_empty_body() {
        let step = Step::new("POST", "http://x").with_body("");
        assert_eq!(step.payload(), None);
    }
}
