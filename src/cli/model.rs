//! Model inspection commands

use super::display::TableRenderer;
use super::payload::json_encoded;
use crate::domain::codec::{Codec, SubtypePolicy};
use crate::domain::config::{apply_to_config, parse_dynamic_configs, FabricConfig, OutputFormat};
use crate::infrastructure::catalog::CatalogLoader;
use anyhow::Context;
use clap::{Args, Parser};
use serde::Serialize;
use std::sync::Arc;

/// Options shared by every command: configuration and catalog sources.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Path to configuration file (TOML)
    /// If not provided, FABRIC_MODELS_CONF is used when set
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Additional catalog file (YAML, or JSON with a .json extension); repeatable
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalogs: Vec<String>,

    /// Fail on discriminator values the catalog does not know instead of
    /// decoding them as the base type
    #[arg(long)]
    pub strict: bool,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Codec: codec.unknown-subtype (fallback|reject), codec.pass-through (true|false)
    /// Catalog: catalog.builtin (true|false), catalog.files (comma-separated)
    /// Output: output.format (table|json), output.pretty (true|false)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl CatalogArgs {
    /// Resolve configuration: file < -D overrides < dedicated flags.
    pub fn load_config(&self) -> anyhow::Result<FabricConfig> {
        let mut conf = FabricConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        if !self.properties.is_empty() {
            let overrides = parse_dynamic_configs(&self.properties)?;
            apply_to_config(&overrides, &mut conf)?;
        }

        if self.strict {
            conf.codec.unknown_subtype = SubtypePolicy::Reject;
        }
        conf.catalog.files.extend(self.catalogs.iter().cloned());

        Ok(conf)
    }

    pub fn build_codec(&self, conf: &FabricConfig) -> anyhow::Result<Codec> {
        let registry = CatalogLoader::new()
            .with_builtin(conf.catalog.builtin)
            .add_files(conf.catalog.files.iter())
            .load()
            .context("Failed to load model catalog")?;

        Ok(Codec::with_options(Arc::new(registry), conf.codec_options()))
    }
}

fn resolve_format(flag: Option<&str>, conf: &FabricConfig) -> anyhow::Result<OutputFormat> {
    match flag {
        Some(format) => Ok(format.parse()?),
        None => Ok(conf.output.format),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

#[derive(Parser, Debug, Clone)]
pub struct DecodeCommand {
    /// Base type to decode against (e.g. AutoScalingTrigger)
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub type_name: String,

    /// JSON payload, or @path to a file containing it
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,

    /// Output format (table, json)
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl DecodeCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let conf = self.catalog.load_config()?;
        let codec = self.catalog.build_codec(&conf)?;
        let format = resolve_format(self.output.as_deref(), &conf)?;

        let payload = json_encoded(&self.payload)?;
        let decoded = codec
            .decode_value(&payload, &self.type_name)
            .with_context(|| format!("Failed to decode payload as {}", self.type_name))?;

        match format {
            OutputFormat::Table => {
                print!("{}", TableRenderer::new().render_object(&decoded, codec.registry()))
            }
            OutputFormat::Json => println!("{}", to_json(&decoded, conf.output.pretty)?),
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct NormalizeCommand {
    /// Base type to decode against
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub type_name: String,

    /// JSON payload, or @path to a file containing it
    #[arg(value_name = "PAYLOAD")]
    pub payload: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl NormalizeCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let conf = self.catalog.load_config()?;
        let codec = self.catalog.build_codec(&conf)?;

        let payload = json_encoded(&self.payload)?;
        let decoded = codec
            .decode_value(&payload, &self.type_name)
            .with_context(|| format!("Failed to decode payload as {}", self.type_name))?;
        let wire = codec
            .encode(&decoded)
            .with_context(|| format!("Failed to encode {}", decoded.type_name()))?;

        println!("{}", to_json(&wire, conf.output.pretty)?);
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TypesCommand {
    /// Only list subtypes of this base type
    #[arg(long)]
    pub base: Option<String>,

    /// Output format (table, json)
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl TypesCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let conf = self.catalog.load_config()?;
        let codec = self.catalog.build_codec(&conf)?;
        let registry = codec.registry();
        let format = resolve_format(self.output.as_deref(), &conf)?;

        let types = match self.base {
            Some(ref base) => {
                if !registry.contains(base) {
                    anyhow::bail!("Unknown model type '{}'", base);
                }
                registry.subtypes_of(base)
            }
            None => registry.types().collect(),
        };

        match format {
            OutputFormat::Table => print!("{}", TableRenderer::new().render_type_list(types)),
            OutputFormat::Json => {
                let schemas: Vec<_> = types.iter().map(|t| t.schema()).collect();
                println!("{}", to_json(&schemas, conf.output.pretty)?);
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeCommand {
    /// Model type name
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Output format (table, json)
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl DescribeCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let conf = self.catalog.load_config()?;
        let codec = self.catalog.build_codec(&conf)?;
        let registry = codec.registry();
        let format = resolve_format(self.output.as_deref(), &conf)?;

        let ty = registry
            .get(&self.type_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown model type '{}'", self.type_name))?;

        match format {
            OutputFormat::Table => print!("{}", TableRenderer::new().render_schema(ty, registry)),
            OutputFormat::Json => {
                let attributes: Vec<_> = ty.attributes().iter().map(|a| &a.spec).collect();
                println!("{}", to_json(&attributes, conf.output.pretty)?);
            }
        }
        Ok(())
    }
}
