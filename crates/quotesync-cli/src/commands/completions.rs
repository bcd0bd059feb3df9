use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::aot::Generator;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "quotes";

impl CompletionShell {
    /// Conventional script name when writing into a completions directory
    pub const fn script_file_name(self) -> &'static str {
        match self {
            Self::Bash => "quotes.bash",
            Self::Zsh => "_quotes",
            Self::Fish => "quotes.fish",
        }
    }
}

pub fn render_completions(shell: CompletionShell) -> Vec<u8> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();
    match shell {
        CompletionShell::Bash => write_script(shells::Bash, &mut command, &mut buffer),
        CompletionShell::Zsh => write_script(shells::Zsh, &mut command, &mut buffer),
        CompletionShell::Fish => write_script(shells::Fish, &mut command, &mut buffer),
    }
    buffer
}

pub fn run_completions(
    shell: CompletionShell,
    output_path: Option<&Path>,
) -> Result<Option<PathBuf>, CliError> {
    let script = render_completions(shell);

    let Some(path) = output_path else {
        io::stdout().write_all(&script)?;
        return Ok(None);
    };

    let path = if path.is_dir() {
        path.join(shell.script_file_name())
    } else {
        path.to_path_buf()
    };
    std::fs::write(&path, &script)?;
    println!("{}", path.display());
    Ok(Some(path))
}

fn write_script<G: Generator>(generator: G, command: &mut clap::Command, buffer: &mut Vec<u8>) {
    generate(generator, command, BIN_NAME, buffer);
}
