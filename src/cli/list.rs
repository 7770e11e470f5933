use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List dependencies of the package in the current directory:\n    tythe list .\n\n\
                  List dependencies of a remote package at a tag:\n    tythe list github.com/owner/repo#v1.2.0\n\n\
                  Show where each dependency was found:\n    tythe list . --detailed")]
pub struct ListArgs {
    /// Package references (paths, git URLs, owner/repo, module paths)
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Show directory, required-by and ecosystem for each dependency
    #[arg(long)]
    pub detailed: bool,
}
