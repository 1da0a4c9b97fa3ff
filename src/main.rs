//! # mihomo-route
//!
//! Mihomo/Clash 路由覆盖生成工具。
//!
//! ## 功能
//! - 按名称关键字把节点分到地区/功能分类
//! - 生成完整的 `proxy-groups`、`rule-providers`、`rules` 三个字段
//! - 直接覆盖已有的 Mihomo 配置文件
//! - 规则集文件在 list / yaml 两种写法之间批量互转
//!
//! ## 使用
//! ```bash
//! # 用订阅配置中的节点生成覆盖，并写回完整配置
//! mihomo-route build --profile config.yaml -o config.new.yaml
//!
//! # 只看节点分类结果
//! mihomo-route classify --nodes nodes.txt
//!
//! # 校验生成结果（规则集缺失视为错误）
//! mihomo-route check --profile config.yaml --strict
//!
//! # 规则集格式转换
//! mihomo-route convert ruleset/list ruleset/yaml
//! ```

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod group;
mod node;
mod route;
mod rule;

use config::{Profile, RouteSettings, SettingsOverrides};
use node::{read_node_list, NodeInventory};
use route::RouteBuilder;
use rule::{RuleFormat, RuleSetConverter};

// ========================================
// CLI 参数定义
// ========================================

/// Mihomo 路由覆盖生成工具
#[derive(Parser)]
#[command(name = "mihomo-route")]
#[command(version = "0.1.0")]
#[command(about = "Generate Mihomo proxy-group / rule-provider / rule overrides from a node list")]
struct Cli {
    /// 显示调试日志
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// 子命令
    #[command(subcommand)]
    command: Commands,
}

/// 节点来源，按 profile -> nodes 文件 -> --node 的顺序拼接
#[derive(Args, Debug, Default)]
struct NodeArgs {
    /// Mihomo 配置文件，读取其中的 proxies[].name
    #[arg(long, value_name = "PATH")]
    profile: Option<PathBuf>,

    /// 节点列表文件，每行一个名称
    #[arg(long, value_name = "PATH")]
    nodes: Option<PathBuf>,

    /// 直接指定节点名称（可重复）
    #[arg(long = "node", value_name = "NAME")]
    node: Vec<String>,
}

/// 生成参数
#[derive(Args, Debug, Default)]
struct SettingsArgs {
    /// 参数文件 (默认 ~/.config/mihomo-route/settings.yaml)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// 自动优选组测速地址
    #[arg(long, value_name = "URL")]
    probe_url: Option<String>,

    /// 自动优选组测速间隔（秒）
    #[arg(long, value_name = "SECS")]
    probe_interval: Option<u64>,

    /// 自动优选组切换容差（毫秒）
    #[arg(long, value_name = "MS")]
    tolerance: Option<u64>,

    /// 规则集刷新间隔（秒）
    #[arg(long, value_name = "SECS")]
    provider_interval: Option<u64>,
}

/// 支持的子命令
#[derive(Subcommand)]
enum Commands {
    /// 生成路由覆盖（指定 --profile 时输出覆盖后的完整配置）
    Build {
        #[command(flatten)]
        nodes: NodeArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// 输出文件 (默认 stdout)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// JSON 格式输出
        #[arg(long)]
        json: bool,

        /// 规则引用未知规则集时报错
        #[arg(long)]
        strict: bool,
    },
    /// 显示节点分类结果
    Classify {
        #[command(flatten)]
        nodes: NodeArgs,

        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 校验生成结果的完整性
    Check {
        #[command(flatten)]
        nodes: NodeArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// 规则引用未知规则集时报错
        #[arg(long)]
        strict: bool,

        /// JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 规则集目录格式转换 (list <-> yaml)
    Convert {
        /// 源目录
        src: PathBuf,

        /// 目标目录（不存在时自动创建）
        dest: PathBuf,

        /// 目标格式 (默认根据源文件扩展名推断)
        #[arg(long, value_enum)]
        to: Option<RuleFormat>,
    },
}

// ========================================
// 主函数
// ========================================

fn main() {
    // 解析命令行参数（缺少必填参数时 clap 打印用法并以非零状态退出）
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            nodes,
            settings,
            output,
            json,
            strict,
        } => run_build(nodes, settings, output, json, strict),
        Commands::Classify { nodes, json } => run_classify(nodes, json),
        Commands::Check {
            nodes,
            settings,
            strict,
            json,
        } => run_check(nodes, settings, strict, json),
        Commands::Convert { src, dest, to } => run_convert(src, dest, to),
    };

    // 处理错误
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// 日志输出到 stderr，stdout 只留给生成结果
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mihomo_route=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mihomo_route=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ========================================
// 输入收集
// ========================================

/// 读取节点来源，返回（可选的配置文件, 节点列表）
fn load_nodes(args: &NodeArgs) -> Result<(Option<Profile>, Vec<String>)> {
    let mut inventory = NodeInventory::new();

    let profile = match &args.profile {
        Some(path) => {
            let profile = Profile::load(path)?;
            inventory.extend("profile", profile.node_names());
            Some(profile)
        }
        None => None,
    };

    if let Some(path) = &args.nodes {
        inventory.extend("node list", read_node_list(path)?);
    }

    inventory.extend("command line", args.node.iter().cloned());

    if inventory.names().is_empty() {
        tracing::warn!("no nodes supplied, every node group falls back to DIRECT");
    }

    Ok((profile, inventory.into_names()))
}

fn load_settings(args: SettingsArgs) -> Result<RouteSettings> {
    let default_path = config::settings::default_settings_path();
    RouteSettings::resolve(
        args.settings.as_deref(),
        &default_path,
        SettingsOverrides {
            probe_url: args.probe_url,
            probe_interval: args.probe_interval,
            tolerance: args.tolerance,
            provider_interval: args.provider_interval,
        },
    )
}

// ========================================
// 子命令实现
// ========================================

/// 执行生成命令
fn run_build(
    node_args: NodeArgs,
    settings_args: SettingsArgs,
    output: Option<PathBuf>,
    json_output: bool,
    strict: bool,
) -> Result<()> {
    let (profile, nodes) = load_nodes(&node_args)?;
    let settings = load_settings(settings_args)?;

    let builder = RouteBuilder::new(settings)?;
    let route = builder.build(&nodes);
    route
        .verify(&nodes, strict)
        .context("Generated override failed integrity check")?;

    // 有配置文件时输出覆盖后的完整配置，否则只输出三个字段
    let content = match profile {
        Some(mut profile) => {
            profile.apply(&route)?;
            if json_output {
                profile.to_json()?
            } else {
                profile.to_yaml()?
            }
        }
        None => {
            if json_output {
                serde_json::to_string_pretty(&route)?
            } else {
                serde_yaml::to_string(&route)?
            }
        }
    };

    match output {
        Some(path) => {
            fs::write(&path, content)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                nodes = nodes.len(),
                groups = route.groups.len(),
                "route override written"
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// 执行分类命令
fn run_classify(node_args: NodeArgs, json_output: bool) -> Result<()> {
    let (_, nodes) = load_nodes(&node_args)?;
    let builder = RouteBuilder::new(RouteSettings::default())?;
    let classification = builder.classify(&nodes);

    if json_output {
        let json = serde_json::to_string_pretty(&classification.report())?;
        println!("{}", json);
        return Ok(());
    }

    // 打印表头
    println!("{:<16}\t{:>5}\t{}", "CATEGORY", "COUNT", "NODES");
    for row in classification.report() {
        let members = if row.nodes.is_empty() {
            "-".to_string()
        } else {
            row.nodes.join(", ")
        };
        println!("{:<16}\t{:>5}\t{}", row.category, row.count, members);
    }
    println!("\nTotal: {} nodes classified", nodes.len());

    Ok(())
}

/// 执行校验命令
fn run_check(
    node_args: NodeArgs,
    settings_args: SettingsArgs,
    strict: bool,
    json_output: bool,
) -> Result<()> {
    let (_, nodes) = load_nodes(&node_args)?;
    let settings = load_settings(settings_args)?;

    let route = RouteBuilder::new(settings)?.build(&nodes);
    let report = route.verify(&nodes, strict)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "✅ Integrity check passed: {} groups, {} rule providers, {} rules",
            report.groups, report.providers, report.rules
        );
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }
    }

    Ok(())
}

/// 执行规则集转换命令
fn run_convert(src: PathBuf, dest: PathBuf, to: Option<RuleFormat>) -> Result<()> {
    let summary = RuleSetConverter::new(src, dest).with_target(to).run()?;
    println!(
        "\n🎉 转换完成！共 {} 个文件 → {}",
        summary.converted.len(),
        summary.target
    );
    Ok(())
}
