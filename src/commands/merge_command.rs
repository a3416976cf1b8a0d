//! Merge command
//!
//! Combines single-page TIFF files into one multi-page TIFF.

use std::fs;
use std::path::PathBuf;

use clap::ArgMatches;
use log::{info, warn};

use crate::codec::{ContainerCodec, RasterCodec, TiffCodec};
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::commands::{tools_codec, BackendChoice};
use crate::engine::{Merger, TiffMerge};
use crate::harness::HarnessConfig;
use crate::model::{CompressionKind, CompressionPolicy, Page};

/// Command for merging pages into one document
pub struct MergeCommand {
    input_files: Vec<PathBuf>,
    output_file: PathBuf,
    /// Overrides the backend's merge policy
    policy: Option<CompressionPolicy>,
    backend: BackendChoice,
}

impl MergeCommand {
    /// Create a new merge command
    ///
    /// # Arguments
    /// * `args` - Subcommand argument matches from clap
    pub fn new(args: &ArgMatches) -> CommandResult<Self> {
        let input_files: Vec<PathBuf> = args
            .get_many::<String>("inputs")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();
        if input_files.is_empty() {
            return Err(CommandError::Usage("No input files given".to_string()));
        }

        let output_file = args
            .get_one::<String>("output")
            .map(PathBuf::from)
            .ok_or_else(|| CommandError::Usage("Missing output file".to_string()))?;

        let policy = match args.get_one::<String>("compression") {
            Some(name) if name.eq_ignore_ascii_case("preserve") => Some(CompressionPolicy::Preserve),
            Some(name) => {
                let kind = CompressionKind::from_name(name)
                    .ok_or_else(|| CommandError::Usage(format!("Unknown compression: {}", name)))?;
                Some(CompressionPolicy::Force(kind))
            }
            None => None,
        };

        Ok(MergeCommand {
            input_files,
            output_file,
            policy,
            backend: BackendChoice::from_args(args)?,
        })
    }

    fn run<C: TiffCodec>(&self, codec: C) -> CommandResult<()> {
        let pages = self
            .input_files
            .iter()
            .map(|path| fs::read(path).map(Page::new))
            .collect::<Result<Vec<_>, _>>()?;

        let mut merger = Merger::new(codec);
        if let Some(policy) = self.policy {
            merger = merger.with_policy(policy);
        }
        let output = merger.merge(&pages)?;

        for skipped in &output.skipped {
            warn!("Skipped {}: {}", self.input_files[skipped.index].display(), skipped.reason);
        }

        fs::write(&self.output_file, &output.bytes)?;
        info!(
            "Merged {} of {} pages into {} ({})",
            output.merged.len(),
            pages.len(),
            self.output_file.display(),
            output.policy
        );
        Ok(())
    }
}

impl Command for MergeCommand {
    fn execute(&self) -> CommandResult<()> {
        match self.backend {
            BackendChoice::Container => self.run(ContainerCodec::new()),
            BackendChoice::Raster => self.run(RasterCodec::new()),
            BackendChoice::Tools => self.run(tools_codec(&HarnessConfig::default().with_env_overrides())),
        }
    }
}
