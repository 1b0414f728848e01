include!("src/cli.rs");

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;
use clap_mangen::Man;
use std::{env, fs, io};

/// Writes the shell completions and the man pages of `oxhydra` to `OUT_DIR`.
fn main() -> io::Result<()> {
    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::other("OUT_DIR is not set"))?;
    let mut command = Args::command().disable_help_subcommand(true);

    let completions = out_dir.join("complete");
    fs::create_dir_all(&completions)?;
    for shell in Shell::value_variants() {
        clap_complete::generate_to(*shell, &mut command, "oxhydra", &completions)?;
    }

    let man_pages = out_dir.join("man");
    fs::create_dir_all(&man_pages)?;
    Man::new(command.clone()).generate_to(&man_pages)?;
    for subcommand in command.get_subcommands() {
        Man::new(subcommand.clone()).generate_to(&man_pages)?;
    }
    Ok(())
}
