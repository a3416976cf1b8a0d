//! Conformance command
//!
//! Runs the conformance suites of one or every backend over a TIFF corpus
//! and reports per-file outcomes.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::ArgMatches;
use log::{error, info, warn};

use crate::capability::CapabilityTable;
use crate::codec::{ContainerCodec, RasterCodec, TiffCodec};
use crate::commands::command_traits::{Command, CommandError, CommandResult};
use crate::commands::{tools_codec, BackendChoice};
use crate::harness::{write_junit, HarnessConfig, HarnessError, RunReport, Suites};

/// Command for running the conformance suites
pub struct ConformCommand {
    /// Backends to run, in order
    backends: Vec<BackendChoice>,
    config: HarnessConfig,
    /// Alternative capability table
    capabilities_file: Option<PathBuf>,
    /// Where to write a JUnit report
    junit_file: Option<PathBuf>,
    show_progress: bool,
}

impl ConformCommand {
    /// Create a new conform command
    ///
    /// # Arguments
    /// * `args` - Subcommand argument matches from clap
    pub fn new(args: &ArgMatches) -> CommandResult<Self> {
        let backends = match args.get_one::<String>("backend").map(String::as_str) {
            Some(name) if name.eq_ignore_ascii_case("all") => BackendChoice::all().to_vec(),
            _ => vec![BackendChoice::from_args(args)?],
        };

        let config_file = args.get_one::<String>("config").map(PathBuf::from);
        let mut config = HarnessConfig::load(config_file.as_deref())?;
        if let Some(corpus) = args.get_one::<String>("corpus") {
            config.corpus_root = PathBuf::from(corpus);
        }
        if let Some(output) = args.get_one::<String>("output") {
            config.output_root = PathBuf::from(output);
        }

        Ok(ConformCommand {
            backends,
            config,
            capabilities_file: args.get_one::<String>("capabilities").map(PathBuf::from),
            junit_file: args.get_one::<String>("junit").map(PathBuf::from),
            show_progress: !args.get_flag("quiet"),
        })
    }

    fn run_backend<C: TiffCodec + Clone>(
        &self,
        codec: C,
        table: &CapabilityTable,
        backend: BackendChoice,
    ) -> CommandResult<Vec<RunReport>> {
        let capabilities = table.backend(backend.name()).ok_or_else(|| {
            CommandError::Harness(HarnessError::ConfigError(format!(
                "no capabilities for backend {}",
                backend.name()
            )))
        })?;

        info!("Running {} suites over {}", codec.label(), self.config.corpus_root.display());
        let reports = Suites::new(codec, capabilities, &self.config)
            .with_progress(self.show_progress)
            .run_all()?;
        Ok(reports)
    }

    fn write_report(&self, reports: &[RunReport]) -> CommandResult<()> {
        if let Some(path) = &self.junit_file {
            let file = File::create(path)?;
            write_junit(reports, BufWriter::new(file))?;
            info!("JUnit report written to {}", path.display());
        }
        Ok(())
    }
}

impl Command for ConformCommand {
    fn execute(&self) -> CommandResult<()> {
        let loaded;
        let table = match &self.capabilities_file {
            Some(path) => {
                loaded = CapabilityTable::from_file(path)?;
                &loaded
            }
            None => CapabilityTable::embedded(),
        };

        let mut reports = Vec::new();
        for &backend in &self.backends {
            let backend_reports = match backend {
                BackendChoice::Container => self.run_backend(ContainerCodec::new(), table, backend)?,
                BackendChoice::Raster => self.run_backend(RasterCodec::new(), table, backend)?,
                BackendChoice::Tools => self.run_backend(tools_codec(&self.config), table, backend)?,
            };
            reports.extend(backend_reports);
        }

        for report in &reports {
            info!("{}", report);
            for (path, reason) in report.inconclusive() {
                warn!("  inconclusive {}: {}", path.display(), reason);
            }
        }
        self.write_report(&reports)?;

        let mut first_failure = None;
        for report in reports {
            if let Err(e) = report.into_result() {
                error!("{}", e);
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
