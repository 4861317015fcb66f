use anyhow::{Context, Result};
use clap::Parser;
use classload::class_file::{ClassDescriptor, MemberRecord};
use classload::classpath::{Classpath, internal_name};
use classload::cli::{Cli, OutputFormat, rewrite_java_style_args};
use classload::constant_pool::ConstantPool;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[classload] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    Cli::parse_from(rewrite_java_style_args(args))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let classpath = Classpath::parse(cli.jre.as_deref(), cli.classpath.as_deref())?;
    info!(
        "classpath: {classpath} main class: {} args: {:?}",
        cli.class, cli.args
    );

    let class_name = internal_name(&cli.class);
    let (data, origin) = match classpath.read_class(&class_name) {
        Ok(found) => found,
        Err(err) => {
            debug!("{err:#}");
            anyhow::bail!("Cannot find or load main class {}", cli.class);
        }
    };

    let size = data.len();
    let class = ClassDescriptor::parse(data)
        .with_context(|| format!("Malformed class file for {} in {origin}", cli.class))?;
    let summary = ClassSummary::new(&class, &origin.to_string(), size)?;
    write_output(&summary, cli.format, cli.output.as_deref())
}

#[derive(Debug, Serialize)]
struct MemberSummary {
    name: String,
    descriptor: String,
    access_flags: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_length: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ClassSummary {
    class_name: String,
    loaded_from: String,
    size: usize,
    version: String,
    constant_count: u16,
    access_flags: u16,
    super_class: Option<String>,
    interfaces: Vec<String>,
    source_file: Option<String>,
    fields: Vec<MemberSummary>,
    methods: Vec<MemberSummary>,
}

impl ClassSummary {
    fn new(class: &ClassDescriptor, loaded_from: &str, size: usize) -> Result<Self> {
        let pool = &class.constant_pool;
        Ok(Self {
            class_name: class.class_name()?.to_string(),
            loaded_from: loaded_from.to_string(),
            size,
            version: format!("{}.{}", class.major_version, class.minor_version),
            constant_count: pool.len(),
            access_flags: class.access_flags,
            super_class: class.super_class_name()?.map(str::to_string),
            interfaces: class
                .interface_names()?
                .into_iter()
                .map(str::to_string)
                .collect(),
            source_file: class.source_file()?.map(str::to_string),
            fields: summarize_members(&class.fields, pool)?,
            methods: summarize_members(&class.methods, pool)?,
        })
    }
}

fn summarize_members(members: &[MemberRecord], pool: &ConstantPool) -> Result<Vec<MemberSummary>> {
    members
        .iter()
        .map(|m| -> Result<MemberSummary> {
            Ok(MemberSummary {
                name: m.name(pool)?.to_string(),
                descriptor: m.descriptor(pool)?.to_string(),
                access_flags: m.access_flags,
                code_length: m.code().map(|c| c.code.len()),
            })
        })
        .collect()
}

fn render_text(summary: &ClassSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("class: {}\n", summary.class_name));
    out.push_str(&format!("loaded from: {}\n", summary.loaded_from));
    out.push_str(&format!("version: {}\n", summary.version));
    out.push_str(&format!("constants count: {}\n", summary.constant_count));
    out.push_str(&format!("access flags: {:#06x}\n", summary.access_flags));
    out.push_str(&format!(
        "super class: {}\n",
        summary.super_class.as_deref().unwrap_or("")
    ));
    out.push_str(&format!("interfaces: {:?}\n", summary.interfaces));
    if let Some(source) = &summary.source_file {
        out.push_str(&format!("source file: {source}\n"));
    }
    out.push_str(&format!("fields count: {}\n", summary.fields.len()));
    for f in &summary.fields {
        out.push_str(&format!("  {} {}\n", f.name, f.descriptor));
    }
    out.push_str(&format!("methods count: {}\n", summary.methods.len()));
    for m in &summary.methods {
        out.push_str(&format!("  {}{}\n", m.name, m.descriptor));
    }
    out
}

fn write_output(summary: &ClassSummary, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Text => render_text(summary),
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display()))?;
    } else {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
