// CLI command definitions

use super::model::{DecodeCommand, DescribeCommand, NormalizeCommand, TypesCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "fabric-models",
    version,
    about = "Inspect and validate Service Fabric REST model payloads",
    long_about = "Decodes JSON payloads into Service Fabric model types chosen by their discriminator, \
                  re-encodes them to canonical wire form, and describes the model catalog"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Decode a payload against a base type and show the resolved object
    Decode(DecodeCommand),

    /// Decode then re-encode a payload, printing canonical wire JSON
    Normalize(NormalizeCommand),

    /// List model types in the catalog
    Types(TypesCommand),

    /// Show the attributes of one model type
    Describe(DescribeCommand),
}
