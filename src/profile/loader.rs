use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::model::{Configuration, Executor};
use crate::{ForgeError, Result};

/// 命名负载配置文件
///
/// ```toml
/// [profiles.smoke]
/// vus = 1
/// duration = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, Configuration>,
}

impl ProfileFile {
    pub fn get_profile(&self, name: &str) -> Option<&Configuration> {
        self.profiles.get(name)
    }
}

/// 命令行覆盖项（优先级最高）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub vus: Option<u32>,
    pub duration: Option<u64>,
    pub executor: Option<Executor>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Configuration) {
        if let Some(vus) = self.vus {
            config.vus = vus;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(executor) = self.executor {
            config.executor = executor;
        }
    }
}

/// 配置文件加载器
pub struct ProfileLoader;

impl ProfileLoader {
    /// 配置文件名
    const PROFILE_FILE: &'static str = "k6forge.toml";

    /// 从指定路径加载命名配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProfileFile> {
        parse_file(path.as_ref())
    }

    /// 加载单个负载配置（不带 profiles 外层），缺失字段取默认值
    pub fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        parse_file(path.as_ref())
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/k6forge/
    ///
    /// 找不到文件返回 Ok(None)，文件格式错误返回 Err
    pub fn find_and_load() -> Result<Option<ProfileFile>> {
        match Self::find_in_current_dir().or_else(Self::find_in_user_dir) {
            Some(path) => {
                debug!(path = %path.display(), "loading profile file");
                Self::load_from_path(&path).map(Some)
            }
            None => Ok(None),
        }
    }

    fn find_in_current_dir() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = current.join(Self::PROFILE_FILE);
            if candidate.exists() {
                return Some(candidate);
            }

            // 尝试父目录
            if !current.pop() {
                return None;
            }
        }
    }

    fn find_in_user_dir() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let candidate = home.join(".config").join("k6forge").join(Self::PROFILE_FILE);
        candidate.exists().then_some(candidate)
    }

    /// 取出命名配置并应用命令行覆盖
    ///
    /// 没有指定 profile 时使用默认配置
    pub fn resolve(
        file: Option<&ProfileFile>,
        profile: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<Configuration> {
        let mut config = match profile {
            Some(name) => file
                .and_then(|f| f.get_profile(name))
                .cloned()
                .ok_or_else(|| ForgeError::Config(format!("Profile '{}' not found", name)))?,
            None => Configuration::default(),
        };

        overrides.apply(&mut config);
        Ok(config)
    }
}

/// `.json` 按 JSON 解析，其余按 TOML
fn parse_file<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}
