use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    vcl-deploy completions bash > ~/.bash_completion.d/vcl-deploy\n\n\
                  Generate zsh completions:\n    vcl-deploy completions zsh > ~/.zfunc/_vcl-deploy\n\n\
                  Generate fish completions:\n    vcl-deploy completions fish > ~/.config/fish/completions/vcl-deploy.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: clap_complete::Shell,
}
