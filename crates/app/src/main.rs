mod args;
mod op;
mod ops;

use args::Args;
use clap::{Parser, Subcommand};
use op::{Op, OpContext};
use ops::{Service, Subscribe, SyncNow, Version};

command_enum! {
    (Service, Service),
    (Sync, SyncNow),
    (Subscribe, Subscribe),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let ctx = match OpContext::new(args.settings.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
