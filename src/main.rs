use std::process::ExitCode;

use auto_exam_solver::cli::Cli;
use auto_exam_solver::utils::logging;
use auto_exam_solver::{App, Config};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志
    logging::init(cli.verbose);

    // 加载配置
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("エラー: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 运行
    match App::initialize(config).run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("エラー: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
