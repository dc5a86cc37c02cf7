//! # Shell Completion Module
//!
//! ```bash
//! musify completion bash > ~/.local/share/bash-completion/completions/musify
//! musify completion zsh > ~/.config/zsh/completions/_musify
//! ```

use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

/// Write completions for `cmd` to `out`.
pub fn write_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Generate shell completions for the given shell on stdout
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    write_completions(gen, cmd, &mut io::stdout());
}

/// Map our CLI shell enum onto clap_complete's.
#[must_use]
pub fn shell_to_completion_shell(shell: crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, Shell};
    use clap::CommandFactory;

    #[test]
    fn test_bash_completion_mentions_subcommands() {
        let mut out = Vec::new();
        write_completions(shell_to_completion_shell(Shell::Bash), &mut Args::command(), &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("_musify"));
        assert!(script.contains("shuffle"));
        assert!(script.contains("suggest"));
    }
}
