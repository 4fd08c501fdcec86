use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ds_ast::LowerConfig;
use ds_lower::lower_module;
use ds_parser::parse_source;
use swc_common::source_map::DefaultSourceMapGenConfig;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

mod logging;

#[derive(Parser)]
#[command(name = "ds", about = "destructure — lower destructuring bindings to plain assignments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LowerOpts {
    /// JSON file with lowering options (tempPrefix, paramPrefix, ...).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leave destructuring declarations as they are.
    #[arg(long)]
    no_declarations: bool,
    /// Leave pattern parameters as they are.
    #[arg(long)]
    no_parameters: bool,
}

impl LowerOpts {
    fn load(&self) -> Result<LowerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => LowerConfig::default(),
        };
        if self.no_declarations {
            config.declarations = false;
        }
        if self.no_parameters {
            config.parameters = false;
        }
        tracing::debug!(?config, "loaded lowering config");
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, lower, and emit the rewritten source.
    Lower {
        /// Input .js/.jsx/.ts/.tsx file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate a source map.
        #[arg(long)]
        source_map: bool,
        #[command(flatten)]
        opts: LowerOpts,
    },
    /// Parse and lower the file, reporting the first error.
    Check {
        input: PathBuf,
        #[command(flatten)]
        opts: LowerOpts,
    },
    /// Parse the file and dump its AST.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of debug output.
        #[arg(long)]
        ast: bool,
    },
}

fn read_input(input: &Path) -> Result<(String, String)> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    Ok((source, input.display().to_string()))
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Lower {
            input,
            output,
            source_map,
            opts,
        } => {
            let config = opts.load()?;
            let (source, filename) = read_input(&input)?;

            let parsed = parse_source(&source, &filename)?;
            let module = lower_module(parsed.module, &config)
                .with_context(|| format!("failed to lower {filename}"))?;

            let mut buf = Vec::new();
            let mut srcmap_buf = if source_map { Some(vec![]) } else { None };
            {
                let writer = JsWriter::new(
                    parsed.source_map.clone(),
                    "\n",
                    &mut buf,
                    srcmap_buf.as_mut(),
                );
                let mut emitter = Emitter {
                    cfg: swc_ecma_codegen::Config::default()
                        .with_target(swc_ecma_ast::EsVersion::latest()),
                    cm: parsed.source_map.clone(),
                    comments: Some(&parsed.comments),
                    wr: writer,
                };
                module.emit_with(&mut emitter)?;
            }

            let output_str = String::from_utf8(buf)?;

            match &output {
                Some(path) => std::fs::write(path, &output_str)?,
                None => print!("{output_str}"),
            }

            if let Some(srcmap_data) = srcmap_buf {
                let srcmap = parsed
                    .source_map
                    .build_source_map(&srcmap_data, None, DefaultSourceMapGenConfig);
                let mut srcmap_json = vec![];
                srcmap
                    .to_writer(&mut srcmap_json)
                    .context("failed to serialize source map")?;
                let srcmap_str = String::from_utf8(srcmap_json)?;

                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, &srcmap_str)?;
                eprintln!("Source map written to {map_path}");
            }
        }
        Commands::Check { input, opts } => {
            let config = opts.load()?;
            let (source, filename) = read_input(&input)?;

            let parsed = parse_source(&source, &filename)?;
            lower_module(parsed.module, &config)
                .with_context(|| format!("failed to lower {filename}"))?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast } => {
            let (source, filename) = read_input(&input)?;
            let parsed = parse_source(&source, &filename)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}
