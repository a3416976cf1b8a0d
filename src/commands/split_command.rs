//! Split command
//!
//! Writes every page of a multi-page TIFF to its own file.

use std::fs;
use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::artifact::derived_file_name;
use crate::codec::{ContainerCodec, RasterCodec, TiffCodec};
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::commands::{tools_codec, BackendChoice};
use crate::engine::{Splitter, TiffSplit};
use crate::harness::HarnessConfig;

/// Command for splitting a TIFF into single-page files
pub struct SplitCommand {
    /// Path to the input file
    input_file: PathBuf,
    /// Directory receiving the pages
    output_dir: PathBuf,
    backend: BackendChoice,
}

impl SplitCommand {
    /// Create a new split command
    ///
    /// # Arguments
    /// * `args` - Subcommand argument matches from clap
    pub fn new(args: &ArgMatches) -> CommandResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .map(PathBuf::from)
            .ok_or_else(|| CommandError::Usage("Missing input file".to_string()))?;
        let output_dir = args
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(SplitCommand {
            input_file,
            output_dir,
            backend: BackendChoice::from_args(args)?,
        })
    }

    fn run<C: TiffCodec>(&self, codec: C) -> CommandResult<()> {
        let bytes = fs::read(&self.input_file)?;
        let pages = Splitter::new(codec).split(&bytes)?;

        fs::create_dir_all(&self.output_dir)?;
        for (index, page) in pages.iter().enumerate() {
            let name = derived_file_name(&self.input_file, &format!("Pg{}", index + 1));
            let path = self.output_dir.join(name);
            fs::write(&path, page.bytes())?;
            info!("Page {} written to {} ({} bytes)", index + 1, path.display(), page.len());
        }

        info!("Split {} into {} pages", self.input_file.display(), pages.len());
        Ok(())
    }
}

impl Command for SplitCommand {
    fn execute(&self) -> CommandResult<()> {
        match self.backend {
            BackendChoice::Container => self.run(ContainerCodec::new()),
            BackendChoice::Raster => self.run(RasterCodec::new()),
            BackendChoice::Tools => self.run(tools_codec(&HarnessConfig::default().with_env_overrides())),
        }
    }
}
