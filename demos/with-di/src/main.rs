//! # 依赖注入演示应用
//!
//! 演示如何通过组件清单注册配置、服务和控制器，
//! 由启动器按依赖顺序装配并运行。
//!
//! ```text
//! APP_NAME=Hello cargo run -p with-di -- --once
//! ```

mod app;

use anyhow::Context;
use app::{AppController, AppManager, DemoConfig};
use clap::Parser;
use infrastructure_composition::{Application, ComponentManifest, HttpMethod, LoggingConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "with-di")]
#[command(about = "组件容器演示应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json: bool,

    /// 调用一次所有 GET 处理函数后退出，不等待 Ctrl-C
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let manifest = ComponentManifest::new()
        .configuration::<DemoConfig>()?
        .service::<AppManager>()?
        .controller::<AppController>()?;

    let mut builder = Application::builder();
    if let Some(path) = &args.config {
        builder = builder.add_config_toml(path)?;
    }

    let logging = LoggingConfig {
        level: args.log_level.clone(),
        json_format: args.json,
        ..LoggingConfig::default()
    };

    let application = builder
        .add_config_env_vars()?
        .with_manifest(manifest)
        .with_logging(logging)
        .build()
        .context("应用装配失败")?;

    if !args.once {
        application.run_until_shutdown().await?;
        return Ok(());
    }

    application.start().await?;
    for table in application.routes() {
        for route in table.routes() {
            if route.method() != HttpMethod::Get {
                continue;
            }
            let path = table.full_path(route);
            let response = route
                .call(Value::Null)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            info!("GET {} -> {}", path, response);
            println!("{response}");
        }
    }

    application.stop().await?;
    Ok(())
}
