use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    tythe completions bash > ~/.bash_completion.d/tythe\n\n\
                  Generate zsh completions:\n    tythe completions zsh > ~/.zfunc/_tythe\n\n\
                  Generate fish completions:\n    tythe completions fish > ~/.config/fish/completions/tythe.fish\n\n\
                  Generate PowerShell completions:\n    tythe completions powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
