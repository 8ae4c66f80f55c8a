use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use drive_query::{CompiledQuery, CompilerConfig, QueryCompiler, QueryExpression};

const HELP: &str = "\
输入一行 JSON 查询表达式进行编译, 例如:
  {\"$or\": [{\"name\": {\"any\": [\"budget\"]}}, {\"starred\": true}]}
命令:
  :scope  切换是否追加配置的文件夹/回收站条件
  :help   显示帮助
  :quit   退出";

fn main() -> anyhow::Result<()> {
    let config_path = CompilerConfig::default_path();
    let loaded = CompilerConfig::from_json_file(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Ok(_) => tracing::info!(path = %config_path, scope = ?config.scope, "loaded configuration"),
        Err(e) => tracing::warn!("无法加载JSON配置文件 ({}), 使用默认配置", e),
    }

    let compiler = QueryCompiler::with_scope(config.scope.clone());
    run_repl(&compiler)
}

fn run_repl(compiler: &QueryCompiler) -> anyhow::Result<()> {
    println!("--- drive_query: 查询表达式编译器 (:help 查看帮助) ---");

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;
    let mut scoped = false;

    loop {
        let prompt = if scoped { "query[scoped]> " } else { "query> " };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history_entry(input)?;

        match input {
            ":quit" | ":q" => break,
            ":help" => println!("{}", HELP),
            ":scope" => {
                scoped = !scoped;
                println!("作用域条件: {}", if scoped { "开启" } else { "关闭" });
            }
            _ => match compile_line(compiler, input, scoped) {
                Ok(compiled) => println!("{}", serde_json::to_string_pretty(&compiled)?),
                Err(e) => println!("✗ {:#}", e),
            },
        }
    }

    Ok(())
}

fn compile_line(compiler: &QueryCompiler, input: &str, scoped: bool) -> anyhow::Result<CompiledQuery> {
    let expr = QueryExpression::from_json(input)?;
    let compiled = if scoped {
        compiler.compile_scoped(&expr)?
    } else {
        compiler.compile(&expr)?
    };
    Ok(compiled)
}
