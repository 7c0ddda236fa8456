//! 命令行参数定义

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "auto_exam_solver")]
#[command(version, about = "OCR で試験問題を読み取り、LLM に回答と根拠を出させる")]
#[command(long_about = r#"
截图中的选择题 → OCR → 拆分题干与选项 → LLM → 回答标签与根据。

配置加载顺序（后者覆盖前者）：
1. --config <path>   TOML 配置文件
2. ./.env            dotenv 文件
3. 环境变量          LLM_PROVIDER / OCR_LANG / OPENAI_API_KEY / GEMINI_API_KEY ...

示例：
  auto_exam_solver solve question.png
  cat question.png | auto_exam_solver solve -
  auto_exam_solver parse ocr_output.txt
  auto_exam_solver serve
"#)]
pub struct Cli {
    /// TOML 配置文件路径
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 日志详细程度（-v debug，-vv trace）
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 识别图片并解题
    Solve {
        /// 图片路径，`-` 表示从 stdin 读取
        image: String,

        /// 以 JSON 输出结果
        #[arg(long)]
        json: bool,
    },
    /// 只拆分题干与选项（输入为 OCR 文本），不调用 LLM
    Parse {
        /// 文本文件路径，`-` 表示从 stdin 读取
        input: String,
    },
    /// 以行分隔 JSON 在 stdin/stdout 上提供工具调用服务
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solve() {
        let cli = Cli::parse_from(["auto_exam_solver", "solve", "q.png", "--json", "-vv"]);
        assert_eq!(
            cli.command,
            Command::Solve {
                image: "q.png".to_string(),
                json: true
            }
        );
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::parse_from(["auto_exam_solver", "--config", "solver.toml", "serve"]);
        assert_eq!(cli.command, Command::Serve);
        assert_eq!(cli.config, Some(PathBuf::from("solver.toml")));
    }

    #[test]
    fn test_stdin_marker() {
        let cli = Cli::parse_from(["auto_exam_solver", "parse", "-"]);
        assert_eq!(
            cli.command,
            Command::Parse {
                input: "-".to_string()
            }
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
