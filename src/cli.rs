use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::*;
use k6forge::model::{Configuration, Executor, Script};
use k6forge::profile::{ConfigOverrides, ProfileLoader, ScenarioTemplate};
use k6forge::utils::SummaryFormatter;
use k6forge::{ForgeError, compile, format_for_display, generate_from_url, validate, validate_config};
use tracing::{info, warn};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 把 JSON 脚本编译为 k6 脚本
    Compile {
        /// 脚本文件（JSON）
        script: PathBuf,

        #[command(flatten)]
        load: LoadArgs,

        /// 输出文件，缺省输出到 stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 只做校验，不生成脚本
    Validate {
        script: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// 列出脚本中的请求和负载概览
    Preview {
        script: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// 对单个 URL 生成 GET 压测脚本
    Quick {
        url: String,

        #[command(flatten)]
        load: LoadArgs,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 列出内置场景模板
    Templates,
}

/// 负载配置来源，优先级：--config > --template > --profile，命令行数值最后覆盖
#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// 负载配置文件（JSON 或 TOML）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// k6forge.toml 中的命名配置
    #[arg(short, long)]
    pub profile: Option<String>,

    /// 内置场景模板
    #[arg(short, long)]
    pub template: Option<String>,

    #[arg(long)]
    pub vus: Option<u32>,

    /// 持续时间（秒）
    #[arg(long)]
    pub duration: Option<u64>,

    #[arg(long)]
    pub executor: Option<String>,
}

impl LoadArgs {
    fn overrides(&self) -> Result<ConfigOverrides> {
        let executor = self
            .executor
            .as_deref()
            .map(str::parse::<Executor>)
            .transpose()?;

        Ok(ConfigOverrides {
            vus: self.vus,
            duration: self.duration,
            executor,
        })
    }

    fn resolve(&self) -> Result<Configuration> {
        let overrides = self.overrides()?;

        if let Some(path) = &self.config {
            let mut config = ProfileLoader::load_configuration(path)
                .with_context(|| format!("无法读取负载配置: {}", path.display()))?;
            overrides.apply(&mut config);
            return Ok(config);
        }

        if let Some(id) = &self.template {
            let mut config = id.parse::<ScenarioTemplate>()?.configuration();
            overrides.apply(&mut config);
            return Ok(config);
        }

        let file = match &self.profile {
            Some(_) => ProfileLoader::find_and_load()?,
            None => None,
        };
        Ok(ProfileLoader::resolve(
            file.as_ref(),
            self.profile.as_deref(),
            &overrides,
        )?)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    let formatter = SummaryFormatter::new(!cli.no_color);

    match cli.command {
        Commands::Compile {
            script,
            load,
            output,
        } => {
            let script = read_script(&script)?;
            let config = load.resolve()?;
            emit(&formatter, &script, &config, output.as_deref())
        }
        Commands::Validate { script, load } => {
            let script = read_script(&script)?;
            let config = load.resolve()?;

            let script_problems = validate(Some(&script));
            let config_problems = validate_config(&config);
            println!("{}", formatter.format_problems("script", &script_problems));
            println!("{}", formatter.format_problems("configuration", &config_problems));

            if !script_problems.is_empty() || !config_problems.is_empty() {
                bail!(
                    "validation failed with {} problem(s)",
                    script_problems.len() + config_problems.len()
                );
            }
            Ok(())
        }
        Commands::Preview { script, load } => {
            let script = read_script(&script)?;
            let config = load.resolve()?;
            if let Some(name) = &script.name {
                println!("{}", name.bold());
            }
            println!("{}", format_for_display(Some(&script)));
            println!();
            println!("{}", formatter.format_profile(&config));
            Ok(())
        }
        Commands::Quick { url, load, output } => {
            let script = generate_from_url(&url)?;
            let config = load.resolve()?;
            emit(&formatter, &script, &config, output.as_deref())
        }
        Commands::Templates => {
            println!("{}", formatter.format_templates());
            Ok(())
        }
    }
}

fn read_script(path: &Path) -> Result<Script> {
    let content =
        fs::read_to_string(path).with_context(|| format!("无法读取脚本: {}", path.display()))?;
    Ok(Script::from_json(&content)?)
}

fn emit(
    formatter: &SummaryFormatter,
    script: &Script,
    config: &Configuration,
    output: Option<&Path>,
) -> Result<()> {
    for problem in validate_config(config) {
        warn!("{}", problem);
    }

    let source = match compile(script, config) {
        Ok(source) => source,
        Err(ForgeError::Validation(err)) => {
            eprintln!("{}", formatter.format_problems("script", err.messages()));
            bail!("script is not valid");
        }
        Err(err) => return Err(err.into()),
    };

    match output {
        Some(path) => {
            fs::write(path, &source)
                .with_context(|| format!("无法写入文件: {}", path.display()))?;
            info!(path = %path.display(), bytes = source.len(), "script written");
            println!("{}", formatter.format_profile(config));
            println!("{} {}", "✓".green(), path.display());
        }
        None => print!("{}", source),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_command() {
        let cli = Cli::try_parse_from([
            "k6forge",
            "compile",
            "script.json",
            "--vus",
            "20",
            "--executor",
            "ramping-vus",
            "-o",
            "out.js",
        ])
        .unwrap();

        match cli.command {
            Commands::Compile {
                script,
                load,
                output,
            } => {
                assert_eq!(script, PathBuf::from("script.json"));
                assert_eq!(load.vus, Some(20));
                assert_eq!(output, Some(PathBuf::from("out.js")));

                let config = load.resolve().unwrap();
                assert_eq!(config.vus, 20);
                assert_eq!(config.executor, Executor::RampingVus);
            }
            _ => panic!("expected compile command"),
        }
    }

    #[test]
    fn test_template_with_override() {
        let load = LoadArgs {
            template: Some("constant-vus".to_string()),
            duration: Some(60),
            ..Default::default()
        };
        let config = load.resolve().unwrap();
        assert_eq!(config.vus, 50);
        assert_eq!(config.duration, 60);
    }

    #[test]
    fn test_unknown_executor_is_rejected() {
        let load = LoadArgs {
            executor: Some("spike".to_string()),
            ..Default::default()
        };
        assert!(load.resolve().is_err());
    }
}
