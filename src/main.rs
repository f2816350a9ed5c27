use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as ClapParser;
use colored::Colorize;

use wenyan::error::GrammarError;
use wenyan::interpreter::Interpreter;
use wenyan::source::{line_col, parse_source};
use wenyan::value::RuntimeError;

#[derive(ClapParser)]
#[command(name = "wenyan", about = "The Wenyan (文言) interpreter")]
struct Cli {
    /// Path to a .wy source file
    file: String,
    /// Render diagnostic kinds romanized
    #[arg(long)]
    roman: bool,
}

fn main() {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", format!("讀檔不得「{}」: {}", cli.file, e).red());
            process::exit(1);
        }
    };
    let root: Option<PathBuf> = Path::new(&cli.file).parent().map(|p| p.to_path_buf());

    let program = match parse_source(&source, root.as_deref()) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", grammar_diagnostic(&e, cli.roman).red());
            process::exit(1);
        }
    };

    let mut interp = Interpreter::new();
    if let Some(root) = root {
        interp.set_module_root(root);
    }
    if let Err(e) = interp.run(&program) {
        eprintln!("{}", runtime_diagnostic(&e, &source, cli.roman).red());
        process::exit(1);
    }
}

fn grammar_diagnostic(err: &GrammarError, roman: bool) -> String {
    if roman {
        format!(
            "grammar error[{}:{}-{}:{}]: {}",
            err.line, err.col, err.end_line, err.end_col, err.msg
        )
    } else {
        err.to_string()
    }
}

fn runtime_diagnostic(err: &RuntimeError, source: &str, roman: bool) -> String {
    let kind = if roman { "runtime error" } else { "執行之禍" };
    match err {
        RuntimeError::Error {
            msg,
            span: Some(span),
        } => {
            let chars: Vec<char> = source.chars().collect();
            let (line, col) = line_col(&chars, span.start);
            let (end_line, end_col) = line_col(&chars, span.end);
            format!("{}[{}:{}-{}:{}]: {}", kind, line, col, end_line, end_col, msg)
        }
        RuntimeError::Error { msg, span: None } => format!("{}: {}", kind, msg),
        other => format!("{}: {}", kind, other),
    }
}
