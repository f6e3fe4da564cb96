//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for various configuration files for
//! `flightwatch`.  This is a configuration file/struct neutral loading engine, storing only the
//! base directory and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.inner_mut()`.
//!
//! Any struct can be loaded as long as it implements `IntoConfig`, which is what the
//! `#[into_configfile]` attribute does.
//!

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{makepath, ConfigError};

/// Main name for the directory base
const TAG: &str = "flightwatch";

/// Anything with a version number.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

/// Describe a configuration file: which version we expect and the default filename.
///
pub trait IntoConfig: Versioned {
    const VERSION: usize;
    const FILENAME: &'static str;
}

/// Configuration file loader, storing the base directory and the loaded data.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + IntoConfig> {
    /// Tag is the project name.
    tag: String,
    /// This is the base directory for all files.
    basedir: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + IntoConfig,
{
    /// Returns the base directory for `tag`, based on $HOME or $LOCALAPPDATA.
    ///
    #[tracing::instrument]
    pub fn basedir(tag: &str) -> Result<PathBuf> {
        let basedir = match BaseDirs::new() {
            Some(base) => {
                #[cfg(unix)]
                let base = base.home_dir().join(".config");

                #[cfg(windows)]
                let base = base.data_local_dir().to_path_buf();

                debug!("base = {base:?}");
                makepath!(base, tag)
            }
            None => {
                #[cfg(unix)]
                let homedir = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;

                #[cfg(windows)]
                let homedir = std::env::var("LOCALAPPDATA").map_err(|_| ConfigError::NoHome)?;

                debug!("base = {homedir}");

                #[cfg(unix)]
                let base: PathBuf = makepath!(homedir, ".config", tag);

                #[cfg(windows)]
                let base: PathBuf = makepath!(homedir, tag);

                base
            }
        };
        Ok(basedir)
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file() -> Result<PathBuf> {
        let cfg = Self::basedir(TAG)?.join(T::FILENAME);
        debug!("default = {cfg:?}");
        Ok(cfg)
    }

    /// Parse a string and check the version.
    ///
    #[tracing::instrument(skip(data))]
    pub fn parse(data: &str) -> Result<T> {
        let data: T = hcl::from_str(data)?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadFileVersion(data.version(), T::VERSION).into());
        }
        Ok(data)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>) -> Result<ConfigFile<T>> {
        let basedir = Self::basedir(TAG)?;
        let default = basedir.join(T::FILENAME);

        let fname = match fname {
            Some(fname) => PathBuf::from(fname),
            None => default.clone(),
        };

        // Use a full path
        //
        let fname = if fname.exists() {
            fname.canonicalize()?
        } else {
            return Err(ConfigError::MissingConfig(
                fname.to_string_lossy().to_string(),
                default.to_string_lossy().to_string(),
            )
            .into());
        };

        trace!("Loading config file {fname:?} from {basedir:?}");

        let data = fs::read_to_string(fname)?;
        let inner = Self::parse(&data)?;

        Ok(ConfigFile {
            tag: TAG.to_string(),
            basedir,
            inner,
        })
    }

    /// Returns the path of the config directory
    ///
    #[inline]
    pub fn root(&self) -> PathBuf {
        self.basedir.clone()
    }

    /// Project tag
    ///
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Return the inner configuration file as putable
    ///
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the loader and keep the data
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
