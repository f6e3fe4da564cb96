use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace, warn};

use flightwatch_common::{init_logging, ConfigFile, ConfigError};
use flightwatch_engine::TrackerConfig;
use trackctl::{list, predict_one, track, Opts, SubCommand};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging early
    //
    init_logging(NAME, opts.debug, opts.log_dir.clone())?;
    trace!("Logging initialised.");

    banner()?;

    handle_subcmd(&opts).await
}

/// Load and check our configuration.  A missing default file is fine, we have defaults for
/// everything, but a file given with `-c` must be there.
///
fn load_config(opts: &Opts) -> Result<TrackerConfig> {
    let fname = opts.config.as_ref().map(|p| p.to_string_lossy().to_string());

    let cfg = match ConfigFile::<TrackerConfig>::load(fname.as_deref()) {
        Ok(cfg) => Ok(cfg.into_inner()),
        Err(e) if fname.is_none() => match e.downcast_ref::<ConfigError>() {
            Some(ConfigError::MissingConfig(..)) | Some(ConfigError::NoHome) => {
                warn!("No configuration file, using defaults.");
                Ok(TrackerConfig::default())
            }
            _ => Err(e),
        },
        Err(e) => Err(e),
    }?;
    cfg.validate()?;
    Ok(cfg)
}

pub async fn handle_subcmd(opts: &Opts) -> Result<()> {
    match &opts.subcmd {
        // Handle `track`
        //
        SubCommand::Track(topts) => {
            trace!("track");

            let cfg = load_config(opts)?;
            let stats = track(&cfg, topts).await?;
            info!("{stats}");
            eprintln!("Stats: {stats}");
        }

        // Handle `predict`
        //
        SubCommand::Predict(popts) => {
            trace!("predict");

            println!("{}", predict_one(popts));
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => {
            let str = list(lopts)?;
            eprintln!("{}", str);
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", flightwatch_common::version());
            eprintln!("\t{}", flightwatch_engine::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
