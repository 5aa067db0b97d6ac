use crate::config::{DRY_RUN_ENV, FILESTORE_ENV, FilestoreConfig};
use crate::filestore::{
    BackendKind, CatOptions, CpOptions, Filestore, FilestoreResult, LsOptions, RmOptions,
    RsyncOptions,
};
use crate::system::ProcessResult;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::{debug, error};

/// Copy, list, remove and sync experiment data in a local directory or a cloud bucket
#[derive(Parser, Debug)]
#[command(name = "filestore", version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Experiment filestore root; a `gs://` bucket selects the gsutil backend
    #[arg(long, global = true, env = FILESTORE_ENV, value_name = "PATH")]
    pub filestore: Option<String>,

    /// Force a backend instead of deriving it from --filestore
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    /// Print the commands that would run without running them
    #[arg(long, global = true, env = DRY_RUN_ENV)]
    pub dry_run: bool,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Log every executed command")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Local,
    Gsutil,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => BackendKind::Local,
            BackendArg::Gsutil => BackendKind::Gsutil,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy a file or directory
    Cp(CpArgs),
    /// List a path
    Ls(LsArgs),
    /// Remove a path
    Rm(RmArgs),
    /// Make a destination mirror a source
    Rsync(RsyncArgs),
    /// Print a file
    Cat(CatArgs),
}

#[derive(Args, Debug)]
pub struct CpArgs {
    pub source: String,
    pub destination: String,
    #[arg(short, long)]
    pub recursive: bool,
    /// Run in parallel where the backend supports it
    #[arg(short = 'm', long)]
    pub parallel: bool,
    /// Exit successfully even if the copy fails
    #[arg(long)]
    pub allow_failure: bool,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    pub path: String,
    /// Treat a missing path as an empty listing
    #[arg(long)]
    pub allow_missing: bool,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    pub path: String,
    #[arg(short, long)]
    pub recursive: bool,
    #[arg(short, long)]
    pub force: bool,
    #[arg(short = 'm', long)]
    pub parallel: bool,
}

#[derive(Args, Debug)]
pub struct RsyncArgs {
    pub source: String,
    pub destination: String,
    /// Keep destination files that are missing from the source
    #[arg(long)]
    pub no_delete: bool,
    #[arg(long)]
    pub no_recursive: bool,
    #[arg(short = 'm', long)]
    pub parallel: bool,
    /// Top level gsutil option, repeatable
    #[arg(long = "gsutil-option", value_name = "OPT", allow_hyphen_values = true)]
    pub gsutil_options: Vec<String>,
    /// Extra rsync option, repeatable
    #[arg(long = "option", value_name = "OPT", allow_hyphen_values = true)]
    pub options: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CatArgs {
    pub path: String,
}

impl CliArgs {
    pub fn config(&self) -> FilestoreConfig {
        FilestoreConfig {
            filestore: self.filestore.clone(),
            backend: self.backend.map(BackendKind::from),
            dry_run: self.dry_run,
        }
    }
}

/// Run one subcommand and return the process exit code
pub async fn run(args: &CliArgs) -> i32 {
    let filestore = match args.config().build() {
        Ok(filestore) => filestore,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("{} {}", style("Error:").red().bold(), e);
            return 2;
        }
    };

    match dispatch(&filestore, &args.command).await {
        Ok(result) => {
            print!("{}", result.stdout);
            0
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            e.retcode().filter(|code| *code > 0).unwrap_or(1)
        }
    }
}

async fn dispatch(filestore: &Filestore, command: &Commands) -> FilestoreResult<ProcessResult> {
    match command {
        Commands::Cp(cp) => {
            let options = CpOptions {
                recursive: cp.recursive,
                parallel: cp.parallel,
                expect_zero: !cp.allow_failure,
            };
            filestore.cp(&cp.source, &cp.destination, options).await
        }
        Commands::Ls(ls) => {
            let options = LsOptions {
                must_exist: !ls.allow_missing,
            };
            let mut result = filestore.ls(&ls.path, options).await?;
            debug!(entries = result.lines().count(), retcode = result.retcode, "Listed");
            if !result.success() {
                // Missing path tolerated; report it as empty
                result.stdout.clear();
            }
            Ok(result)
        }
        Commands::Rm(rm) => {
            let options = RmOptions {
                recursive: rm.recursive,
                force: rm.force,
                parallel: rm.parallel,
            };
            filestore.rm(&rm.path, options).await
        }
        Commands::Rsync(rsync) => {
            let options = RsyncOptions {
                delete: !rsync.no_delete,
                recursive: !rsync.no_recursive,
                gsutil_options: rsync.gsutil_options.clone(),
                options: rsync.options.clone(),
                parallel: rsync.parallel,
            };
            filestore
                .rsync(&rsync.source, &rsync.destination, options)
                .await
        }
        Commands::Cat(cat) => filestore.cat(&cat.path, CatOptions::default()).await,
    }
}
