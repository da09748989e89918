pub mod upload;

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use upload::UploadArgs;

#[derive(Subcommand, Debug)]
pub enum GitMetadataCommand {
    /// Upload the tracked files of HEAD and sync recent commits to GitDB.
    Upload(UploadArgs),
}

pub fn run(command: GitMetadataCommand) -> Result<ExitCode> {
    match command {
        GitMetadataCommand::Upload(args) => args.run(),
    }
}
