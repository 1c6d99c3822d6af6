//! CLI: infer → (model | objc)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use json_efmap::bundle;
use json_efmap::codegen;
use json_efmap::config::{ConfigOverrides, GeneratorConfig};
use json_efmap::inference::{self, CollisionPolicy, ModelBuilder};
use json_efmap::ResultModel;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer EFDataMappingKit model classes from sample JSON and print the class model or emit Objective-C sources
#[derive(Parser, Debug)]
#[command(name = "json-efmap", version)]
pub struct CommandLineInterface {
    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the class model as JSON
    Model(ModelOut),
    /// infer and emit Objective-C model, mapping and mapper sources
    Objc(ObjcOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorSettings {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// root class name, before prefixing (default "root")
    #[arg(long)]
    root_name: Option<String>,

    /// class name prefix, e.g. NS
    #[arg(long)]
    prefix: Option<String>,

    /// project name for file banners
    #[arg(long)]
    project: Option<String>,

    /// author for the copyright line
    #[arg(long)]
    author: Option<String>,

    /// banner date as YYYY-MM-DD (default today)
    #[arg(long)]
    date: Option<String>,

    /// what to do when two JSON paths derive the same class name
    #[arg(long, value_enum)]
    on_collision: Option<CollisionPolicy>,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ObjcOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output directory for the generated sources
    #[arg(short, long, conflicts_with = "zip")]
    out: Option<PathBuf>,

    /// write a .zip archive instead of a directory
    #[arg(long)]
    zip: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(&str, Value) -> Result<()>) -> Result<()> {
        let sources = resolve_file_path_patterns(&self.input)?;
        for source_path in sources {
            let source_label = source_path.to_string_lossy().to_string();
            let source = read_source(&source_path)
                .with_context(|| format!("failed to read source file {source_label}"))?;
            let documents: Vec<&str> = if self.ndjson {
                source.lines().filter(|line| !line.trim().is_empty()).collect()
            } else {
                vec![source.as_str()]
            };
            for text in documents {
                let json_value = inference::parse_document(text)
                    .with_context(|| format!("failed to parse JSON source file ({source_label})"))?;
                for json_value in self.select(json_value, &source_label)? {
                    apply(&source_label, json_value)
                        .with_context(|| format!("failed to infer classes from {source_label}"))?;
                }
            }
        }
        Ok(())
    }

    /// Apply `--json-pointer` then `--jq-expr`.
    fn select(&self, json_value: Value, source_label: &str) -> Result<Vec<Value>> {
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => match json_value.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer} selects nothing in {source_label}"),
            },
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![json_value]),
            Some(jq_expr) => json_efmap::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                format!("failed to apply jq expression to source file ({source_label})")
            }),
        }
    }
}

impl GeneratorSettings {
    fn resolve(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::default();
        if let Some(path) = self.config.as_ref() {
            config.apply(ConfigOverrides::load(path)?)?;
        }
        config.apply(ConfigOverrides {
            root_name: self.root_name.clone(),
            prefix: self.prefix.clone(),
            project_name: self.project.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
            collision_policy: self.on_collision,
        })?;
        Ok(config)
    }
}

fn infer_model(input_settings: &InputSettings, config: &GeneratorConfig) -> Result<ResultModel> {
    let mut builder = ModelBuilder::new(config.build_options());
    input_settings.load_process(|source_label, value| {
        let root_class = builder.observe_document(&value, &config.root_name)?;
        tracing::info!(source = source_label, root = %root_class, "inferred classes");
        Ok(())
    })?;
    let model = builder.finish();
    for collision in model.collisions() {
        eprintln!(
            "{} class {} derived again at {} ({:?})",
            "warning:".yellow().bold(),
            collision.name.bold(),
            collision.path,
            config.collision_policy,
        );
    }
    Ok(model)
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Model(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let config = target.generator_settings.resolve()?;
                let model = infer_model(&target.input_settings, &config)?;
                let model_src = serde_json::to_string_pretty(&model)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &model_src)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{model_src}"),
                }
            }
            Command::Objc(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let config = target.generator_settings.resolve()?;
                let model = infer_model(&target.input_settings, &config)?;
                let files = codegen::render(&model, &config.render_config());

                if let Some(dir) = target.out.as_ref() {
                    let written = bundle::write_to_dir(&files, dir)?;
                    eprintln!("{} {} files to {}", "wrote".green().bold(), written.len(), dir.display());
                } else if let Some(zip) = target.zip.as_ref() {
                    bundle::write_zip(&files, zip)?;
                    eprintln!("{} {} files to {}", "wrote".green().bold(), files.len(), zip.display());
                } else {
                    for (file_name, text) in &files {
                        println!("// ===== {file_name} =====");
                        println!("{text}");
                    }
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

const STDIN_MARKER: &str = "-";

fn read_source(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == STDIN_MARKER {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    std::fs::read_to_string(path)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Literal path, or '-' for stdin
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
