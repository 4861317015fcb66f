use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "classload", version)]
#[command(about = "Locate a class on the JRE/user classpath and decode its class file")]
pub struct Cli {
    #[arg(long = "classpath", visible_alias = "cp", value_name = "PATH")]
    pub classpath: Option<String>,

    #[arg(long = "Xjre", value_name = "DIR")]
    pub jre: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub verbose: bool,

    /// Main class, dotted (`com.example.Main`) or internal (`com/example/Main`).
    pub class: String,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Java launchers take single-dash long options (`-cp`, `-Xjre`, `-version`).
/// Rewrites the ones we know to clap's `--` form, up to the main class name.
pub fn rewrite_java_style_args(mut args: Vec<String>) -> Vec<String> {
    let takes_value = ["--cp", "--classpath", "--Xjre", "-f", "--format", "-o", "--output"];

    let mut idx = 1usize;
    while idx < args.len() {
        let rewritten = match args[idx].as_str() {
            "-cp" => Some("--cp"),
            "-classpath" => Some("--classpath"),
            "-Xjre" => Some("--Xjre"),
            "-version" => Some("--version"),
            "-help" | "-?" => Some("--help"),
            "-verbose" => Some("--verbose"),
            _ => None,
        };
        if let Some(r) = rewritten {
            args[idx] = r.to_string();
        }

        let a = args[idx].as_str();
        if a == "--" {
            break;
        }
        if takes_value.contains(&a) {
            idx += 2;
            continue;
        }
        if a.starts_with('-') {
            idx += 1;
            continue;
        }
        break;
    }

    args
}
