// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::{DiscoveryOptions, SortBy};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Largest undo history accepted on the command line
pub const MAX_HISTORY_DEPTH: usize = 1000;

/// ApproveIT - sort a folder of images into approved and disapproved
///
/// Walk through the images one by one: approve moves a file into `approved/`,
/// disapprove into `disapproved/`. Recent actions can be undone.
#[derive(Parser, Debug, Clone)]
#[command(name = "approveit")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder containing the images to review
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Order in which images are presented
    #[arg(short = 's', long = "sort", value_enum, default_value = "name")]
    pub sort_by: SortOrder,

    /// Reverse sort order
    #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
    pub reverse: bool,

    /// Include hidden files (files starting with .)
    #[arg(long = "hidden", action = ArgAction::SetTrue)]
    pub show_hidden: bool,

    /// How many actions can be undone (overrides the config file)
    #[arg(long = "history")]
    pub history_depth: Option<usize>,

    /// Show the welcome screen even if it was seen before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,

    /// Write debug-level logs
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Sort by file name (alphabetical)
    #[default]
    Name,
    /// Sort by modification date (oldest first)
    Date,
    /// Sort by file size (smallest first)
    Size,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => SortBy::Name,
            SortOrder::Date => SortBy::Date,
            SortOrder::Size => SortBy::Size,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if let Some(depth) = self.history_depth {
            if depth == 0 || depth > MAX_HISTORY_DEPTH {
                return Err(format!(
                    "history must be between 1 and {}, got {}",
                    MAX_HISTORY_DEPTH, depth
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub sort_by: SortOrder,
    pub reverse: bool,
    pub show_hidden: bool,
    pub history_depth: Option<usize>,
    pub show_welcome: bool,
    pub verbose: bool,
}

impl AppConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            show_hidden: self.show_hidden,
            sort_by: self.sort_by.into(),
            reverse: self.reverse,
        }
    }

    /// Undo depth from the command line, falling back to the user config
    pub fn effective_history_depth(&self, user_config: &UserConfig) -> usize {
        self.history_depth
            .unwrap_or(user_config.history_depth)
            .clamp(1, MAX_HISTORY_DEPTH)
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            directory: args.directory,
            sort_by: args.sort_by,
            reverse: args.reverse,
            show_hidden: args.show_hidden,
            history_depth: args.history_depth,
            show_welcome: args.show_welcome,
            verbose: args.verbose,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            sort_by: SortOrder::Name,
            reverse: false,
            show_hidden: false,
            history_depth: None,
            show_welcome: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(directory: &str) -> Args {
        Args {
            directory: PathBuf::from(directory),
            sort_by: SortOrder::Name,
            reverse: false,
            show_hidden: false,
            history_depth: None,
            show_welcome: false,
            verbose: false,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_args_parse_defaults() {
            let args = Args::try_parse_from(["approveit"]).unwrap();
            assert_eq!(args.directory, PathBuf::from("."));
            assert_eq!(args.sort_by, SortOrder::Name);
            assert!(!args.reverse);
            assert!(args.history_depth.is_none());
        }

        #[test]
        fn test_args_parse_flags() {
            let args = Args::try_parse_from([
                "approveit",
                "/photos",
                "--sort",
                "date",
                "-r",
                "--hidden",
                "--history",
                "25",
                "-v",
            ])
            .unwrap();

            assert_eq!(args.directory, PathBuf::from("/photos"));
            assert_eq!(args.sort_by, SortOrder::Date);
            assert!(args.reverse);
            assert!(args.show_hidden);
            assert_eq!(args.history_depth, Some(25));
            assert!(args.verbose);
        }

        #[test]
        fn test_args_validate_nonexistent_directory() {
            let result = args("/nonexistent/path/12345").validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_args_validate_history_bounds() {
            let mut a = args(".");
            a.history_depth = Some(0);
            assert!(a.validate().unwrap_err().contains("history"));

            a.history_depth = Some(MAX_HISTORY_DEPTH + 1);
            assert!(a.validate().is_err());

            a.history_depth = Some(10);
            assert!(a.validate().is_ok());
        }

        #[test]
        fn test_sort_order_conversion() {
            assert_eq!(SortBy::from(SortOrder::Name), SortBy::Name);
            assert_eq!(SortBy::from(SortOrder::Date), SortBy::Date);
            assert_eq!(SortBy::from(SortOrder::Size), SortBy::Size);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let mut a = args("/test/path");
            a.sort_by = SortOrder::Size;
            a.reverse = true;
            a.history_depth = Some(3);

            let config: AppConfig = a.into();

            assert_eq!(config.directory, PathBuf::from("/test/path"));
            let options = config.discovery_options();
            assert_eq!(options.sort_by, SortBy::Size);
            assert!(options.reverse);
            assert!(!options.show_hidden);
            assert_eq!(config.history_depth, Some(3));
        }

        #[test]
        fn test_effective_history_depth_prefers_cli() {
            let user = UserConfig {
                history_depth: 20,
                ..Default::default()
            };

            let config = AppConfig::default();
            assert_eq!(config.effective_history_depth(&user), 20);

            let config = AppConfig {
                history_depth: Some(5),
                ..Default::default()
            };
            assert_eq!(config.effective_history_depth(&user), 5);
        }

        #[test]
        fn test_effective_history_depth_clamps_config_value() {
            let user = UserConfig {
                history_depth: 0,
                ..Default::default()
            };
            assert_eq!(AppConfig::default().effective_history_depth(&user), 1);
        }
    }
}
