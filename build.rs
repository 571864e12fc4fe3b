//! General build script used by cpuload to generate completion files and the man page.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use clap_complete::{generate_to, shells::Shell};

include!("src/options/args.rs");

fn create_dir(dir: &Path) -> io::Result<()> {
    let res = fs::create_dir_all(dir);
    if let Err(err) = &res {
        eprintln!("Failed to create a directory at location {dir:?}, encountered error {err:?}.  Aborting...",);
    }

    res
}

fn generate_completions() -> io::Result<()> {
    const COMPLETION_DIR: &str = "./target/tmp/cpuload/completion/";
    const MANPAGE_DIR: &str = "./target/tmp/cpuload/manpage/";

    let completion_out_dir = PathBuf::from(COMPLETION_DIR);
    let manpage_out_dir = PathBuf::from(MANPAGE_DIR);

    create_dir(&completion_out_dir)?;
    create_dir(&manpage_out_dir)?;

    let mut cmd = build_cmd();
    for shell in [
        Shell::Bash,
        Shell::Zsh,
        Shell::Fish,
        Shell::PowerShell,
        Shell::Elvish,
    ] {
        generate_to(shell, &mut cmd, "cpuload", &completion_out_dir)?;
    }

    let man = clap_mangen::Man::new(cmd);
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;
    fs::write(manpage_out_dir.join("cpuload.1"), buffer)?;

    Ok(())
}

fn main() -> io::Result<()> {
    match env::var_os("CPULOAD_GENERATE") {
        Some(var) if !var.is_empty() => generate_completions()?,
        _ => {}
    }

    println!("cargo:rerun-if-env-changed=CPULOAD_GENERATE");

    Ok(())
}
