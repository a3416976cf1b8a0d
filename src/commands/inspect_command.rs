//! TIFF page structure inspection command
//!
//! This module implements the command for displaying the directory chain
//! of a TIFF file page by page, along with the corpus quirks it carries.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::capability::detect_features;
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::compression::CompressionFactory;
use crate::tiff::{PageInfo, TiffReader, IFD, TIFF};

/// Command for inspecting TIFF page structure
pub struct InspectCommand {
    /// Path to the input file
    input_file: PathBuf,
    /// Whether to list every directory entry
    verbose: bool,
}

impl InspectCommand {
    /// Create a new inspect command
    ///
    /// # Arguments
    /// * `args` - Subcommand argument matches from clap
    ///
    /// # Returns
    /// A new InspectCommand instance or an error
    pub fn new(args: &ArgMatches) -> CommandResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .map(PathBuf::from)
            .ok_or_else(|| CommandError::Usage("Missing input file".to_string()))?;

        Ok(InspectCommand {
            input_file,
            verbose: args.get_flag("verbose"),
        })
    }

    /// Display format and page count
    fn display_summary(&self, tiff: &TIFF) {
        info!("{}:", self.input_file.display());
        info!("  Format: {}", if tiff.is_big_tiff { "BigTIFF" } else { "TIFF" });
        info!("  Byte order: {:?}", tiff.byte_order);
        info!("  Pages: {}{}", tiff.ifd_count(), if tiff.is_multi_page() { " (multi-page)" } else { "" });
    }

    /// Display one page
    ///
    /// # Arguments
    /// * `ifd` - Directory of the page
    /// * `info` - Metadata probed from the directory
    fn display_page(&self, ifd: &IFD, info: &PageInfo) {
        info!("\nPage #{} (offset: {})", ifd.number + 1, ifd.offset);
        info!("  {}", info);

        let transcodable = CompressionFactory::create_handler(info.compression).is_ok();
        info!(
            "  Compression: {} ({})",
            info.compression,
            if transcodable { "transcodable" } else { "copied as-is" }
        );

        if self.verbose {
            for entry in &ifd.entries {
                info!("    {}", entry.description(ifd.byte_order));
            }
        }
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> CommandResult<()> {
        let tiff = TiffReader::new().load(&self.input_file)?;
        self.display_summary(&tiff);

        let mut pages = Vec::with_capacity(tiff.ifds.len());
        for ifd in &tiff.ifds {
            let info = PageInfo::from_ifd(ifd)?;
            self.display_page(ifd, &info);
            pages.push(info);
        }

        let features = detect_features(&pages);
        if features.is_empty() {
            info!("\nQuirks: none");
        } else {
            let names: Vec<&str> = features.iter().map(|f| f.name()).collect();
            info!("\nQuirks: {}", names.join(", "));
        }
        Ok(())
    }
}
