//! netver - identify the .NET runtime a program runs on.
//!
//! Runtimes report themselves inconsistently: .NET Framework through a
//! registry release code, Mono through a display name, .NET 5+ through its
//! environment version, and .NET Core before 3.0 only through the build
//! number of its core library. netver resolves all of them to a family and a
//! public version, and builds the catalog that maps pre-3.0 build numbers
//! back to releases.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`catalog`] - The .NET Core build catalog and its JSON format
//! - [`detect`] - Runtime identification from live signals
//! - [`error`] - Error types and result aliases
//! - [`inventory`] - Building the catalog from published runtimes
//! - [`ui`] - Terminal output and progress bars
//! - [`version`] - Dotted numeric versions
//!
//! # Example
//!
//! ```
//! use netver::detect::{Resolver, RuntimeFamily, StaticSignals};
//! use netver::version::Version;
//!
//! let signals = StaticSignals::default()
//!     .with_description(".NET Core 4.6.26919.02")
//!     .with_environment_version("4.0.30319.42000".parse().unwrap())
//!     .with_corelib("4.6.26919.02".parse().unwrap(), "4.6.26919.02 @Commit: 0f2c6e1");
//!
//! let identity = Resolver::embedded().unwrap().resolve(&signals).unwrap();
//! assert_eq!(identity.family(), RuntimeFamily::ModularRuntime);
//! assert_eq!(identity.version(), Some(Version::with_build(2, 1, 5)));
//! ```

pub mod catalog;
pub mod cli;
pub mod detect;
pub mod error;
pub mod inventory;
pub mod ui;
pub mod version;

pub use catalog::BuildCatalog;
pub use detect::{Resolver, RuntimeFamily, RuntimeIdentity};
pub use error::{NetverError, Result};
pub use version::Version;
