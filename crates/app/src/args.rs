use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "spsync")]
#[command(version, about = "Mirror a SharePoint document library into a blob container")]
pub struct Args {
    /// Read configuration from the `Values` map of a local.settings.json
    /// file instead of the environment
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
