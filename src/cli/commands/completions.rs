use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io::{self, Write};

const BIN_NAME: &str = "camunda-cli";

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => ClapShell::Bash,
            Shell::Zsh => ClapShell::Zsh,
            Shell::Fish => ClapShell::Fish,
            Shell::PowerShell => ClapShell::PowerShell,
            Shell::Elvish => ClapShell::Elvish,
        }
    }
}

fn install_hint(shell: &Shell) -> &'static str {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\n#   eval \"$(camunda-cli completions bash)\"",
        Shell::Zsh => "# Add to ~/.zshrc:\n#   eval \"$(camunda-cli completions zsh)\"",
        Shell::Fish => {
            "# Save to fish completion directory:\n#   camunda-cli completions fish > ~/.config/fish/completions/camunda-cli.fish"
        }
        Shell::PowerShell => {
            "# Add to PowerShell profile:\n#   camunda-cli completions powershell | Out-String | Invoke-Expression"
        }
        Shell::Elvish => "# Add to Elvish config:\n#   eval (camunda-cli completions elvish | slurp)",
    }
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(ClapShell::from(shell), &mut cmd, BIN_NAME, out);
}

pub fn execute(shell: Shell) {
    eprintln!("Generating completion file for {:?}...", shell);
    let hint = install_hint(&shell);
    write_completions(shell, &mut io::stdout());
    eprintln!("\n# Installation instructions:\n{}", hint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("camunda-cli"));
        assert!(script.contains("list"));
        assert!(script.contains("completions"));
    }

    #[test]
    fn test_every_shell_has_a_hint() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Elvish,
        ] {
            assert!(install_hint(&shell).contains("camunda-cli completions"));
        }
    }
}
