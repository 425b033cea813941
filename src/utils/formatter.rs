use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::compiler::{LoadProfile, compile_options};
use crate::model::config::threshold_expressions;
use crate::model::{Configuration, Script};
use crate::profile::ScenarioTemplate;

/// 预览用：每个步骤一行 "{序号}. {方法} {URL}"，序号从 1 开始
pub fn format_for_display(script: Option<&Script>) -> String {
    let Some(script) = script else {
        return "No script data".to_string();
    };

    script
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {} {}", i + 1, step.method, step.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 终端输出格式化
pub struct SummaryFormatter {
    color: bool,
}

impl SummaryFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// 负载配置概览表
    pub fn format_profile(&self, config: &Configuration) -> String {
        let profile = LoadProfile::from_config(config);
        let options = compile_options(config);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Setting", "Value"]);

        table.add_row(vec![
            Cell::new("Executor"),
            self.cell(profile.executor.as_str()).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("Total duration"),
            Cell::new(format!("{}s", profile.total_duration)),
        ]);
        table.add_row(vec![Cell::new("Max VUs"), Cell::new(profile.max_vus)]);

        if config.executor.uses_stages() {
            for (index, stage) in config.stages.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(format!("Stage {}", index + 1)),
                    Cell::new(format!("{}s -> {}", stage.duration, stage.target))
                        .add_attribute(Attribute::Dim),
                ]);
            }
        }

        for (metric, conditions) in &options.thresholds {
            table.add_row(vec![
                Cell::new(format!("Threshold {}", metric)),
                Cell::new(match threshold_expressions(conditions) {
                    Some(expressions) => expressions.join(", "),
                    None => conditions.to_string(),
                }),
            ]);
        }

        table.to_string()
    }

    /// 内置模板列表
    pub fn format_templates(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["ID", "Name", "Duration", "Max VUs", "Description"]);

        for template in ScenarioTemplate::ALL {
            let profile = LoadProfile::from_config(&template.configuration());
            table.add_row(vec![
                self.cell(template.id()).fg(Color::Cyan),
                Cell::new(template.name()),
                Cell::new(format!("{}s", profile.total_duration)),
                Cell::new(profile.max_vus),
                Cell::new(template.description()).add_attribute(Attribute::Dim),
            ]);
        }

        table.to_string()
    }

    /// 校验问题列表，没有问题时输出一行成功信息
    pub fn format_problems(&self, title: &str, problems: &[String]) -> String {
        let mut output = Vec::new();

        if problems.is_empty() {
            let line = format!("✓ {}: ok", title);
            output.push(if self.color {
                line.green().to_string()
            } else {
                line
            });
            return output.join("\n");
        }

        let header = format!("✗ {}: {} problem(s)", title, problems.len());
        output.push(if self.color {
            header.red().bold().to_string()
        } else {
            header
        });
        for problem in problems {
            if self.color {
                output.push(format!("   {}", problem.yellow()));
            } else {
                output.push(format!("   {}", problem));
            }
        }

        output.join("\n")
    }

    fn cell(&self, text: &str) -> Cell {
        let cell = Cell::new(text);
        if self.color {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }
}
