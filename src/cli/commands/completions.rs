//! Shell completions generation.
//!
//! The `netver completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::Console;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    fn generate(&self, out: &mut dyn std::io::Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "netver", out);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _console: &Console) -> crate::error::Result<CommandResult> {
        self.generate(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn completions_for(shell: Shell) -> String {
        let mut buf = Vec::new();
        CompletionsCommand::new(CompletionsArgs { shell }).generate(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn generates_bash_completions() {
        let output = completions_for(Shell::Bash);
        assert!(output.contains("netver"));
        assert!(output.contains("complete"));
        assert!(output.contains("scrape"));
    }

    #[test]
    fn generates_zsh_completions() {
        assert!(completions_for(Shell::Zsh).contains("netver"));
    }

    #[test]
    fn generates_fish_completions() {
        assert!(completions_for(Shell::Fish).contains("netver"));
    }
}
