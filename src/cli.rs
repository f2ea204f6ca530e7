use clap::Parser;

#[derive(Parser)]
#[command(name = "xdftag")]
#[command(about = "Manage metadata tags in XDF files")]
#[command(author, version)]
#[command(long_about = "Manage metadata tags in XDF files.

Tags are written into a stream named Metadata, of type Metadata, and the
stream is created if not already present. --set, --clear and --show can
each be given multiple times to handle several tags in a single run.

Example:
xdftag --set subject.name=\"My Name\" --set subject.id=subj001 \\
       --clear subject.handedness --show subject.age '*.xdf'")]
pub struct Cli {
    /// Set or override the given NAME=VALUE tag
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Clear all tags of the given name
    #[arg(long = "clear", value_name = "NAME")]
    pub clear: Vec<String>,

    /// Show the current values of all tags of the given name
    #[arg(long = "show", value_name = "NAME")]
    pub show: Vec<String>,

    /// Suffix that will be spliced in before the .xdf file ending.
    /// Ignored if --inplace is given
    #[arg(long, default_value = ".processed")]
    pub suffix: String,

    /// Process files in-place (a temp file is still used internally)
    #[arg(long)]
    pub inplace: bool,

    /// Also process files that already carry the suffix
    #[arg(long)]
    pub process_suffixed: bool,

    /// Allow overwriting existing output files. --inplace always overwrites
    #[arg(long)]
    pub overwrite: bool,

    /// Select logging level
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub loglevel: String,

    /// File paths (wildcard patterns) to process
    #[arg(required = true, value_name = "PATHS")]
    pub paths: Vec<String>,
}
