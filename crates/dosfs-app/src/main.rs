//! dosfs entry point.
//!
//! Opens a volume image, runs one command against it and saves the image
//! back when the command may have changed it.

mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use dosfs_core::Prompter;
use dosfs_terminal::{
    CommandOutput, CommandRegistry, Environment, StdinPrompter, register_builtins,
};
use dosfs_types::config::DosfsConfig;
use dosfs_types::error::DosError;
use dosfs_vfs::MemoryVolume;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DosError>() {
                Some(dos) if matches!(dos.root(), DosError::InvalidUsage(_)) => {
                    eprintln!("{}", dos.root());
                },
                _ => eprintln!("dosfs: {err:#}"),
            }
            ExitCode::FAILURE
        },
    }
}

fn run() -> Result<()> {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "dosfs".to_string());
    let inv = cli::parse(&program, argv)?;

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);

    let Some(name) = inv.command else {
        println!("{}\n\n{}", cli::USAGE, registry.help());
        return Ok(());
    };
    let Some(command) = registry.get(&name) else {
        let message = format!("unknown command: {name}\n{}", registry.help());
        return Err(DosError::InvalidUsage(message).into());
    };
    if inv.help {
        println!("{}", command.usage());
        return Ok(());
    }

    let config = DosfsConfig::load()?;
    let image = inv.image.unwrap_or_else(|| config.image.clone());
    let mut vol = open_image(&image, &config, name == "format")?;

    let args: Vec<&str> = inv.args.iter().map(String::as_str).collect();
    let output = run_command(
        &registry,
        &name,
        &args,
        &mut vol,
        &image,
        &config,
        &mut StdinPrompter,
    )?;

    let mut stdout = std::io::stdout().lock();
    match output {
        CommandOutput::Text(text) => stdout.write_all(text.as_bytes())?,
        CommandOutput::Bytes(bytes) => stdout.write_all(&bytes)?,
        CommandOutput::None => {},
    }
    stdout.flush()?;
    Ok(())
}

/// Run one command and save the image if the command mutates it.
///
/// The image is saved even when the command fails part way: work done on
/// earlier arguments stays done.
fn run_command(
    registry: &CommandRegistry,
    name: &str,
    args: &[&str],
    vol: &mut MemoryVolume,
    image: &Path,
    config: &DosfsConfig,
    prompter: &mut dyn Prompter,
) -> Result<CommandOutput> {
    let result = {
        let mut env = Environment {
            vol: &mut *vol,
            prompter,
            device: cli::device_name(image),
            stdin: None,
        };
        registry.run(name, args, &mut env)
    };

    if cli::mutates(name) && !config.read_only {
        let saved = vol
            .save(image)
            .with_context(|| format!("cannot save {}", image.display()));
        if let Err(err) = saved {
            if result.is_ok() {
                return Err(err);
            }
            log::error!("{err:#}");
        }
    }
    Ok(result?)
}

/// Load the image, or start from a blank volume when formatting a file
/// that does not exist yet.
fn open_image(image: &Path, config: &DosfsConfig, formatting: bool) -> Result<MemoryVolume> {
    let mut vol = if formatting && !image.exists() {
        log::info!("creating {} ({} bytes)", image.display(), config.capacity);
        MemoryVolume::with_capacity(config.capacity)
    } else {
        MemoryVolume::load(image)
            .with_context(|| format!("cannot open {}", image.display()))?
    };
    vol.set_read_only(config.read_only);
    vol.set_max_open_dirs(config.max_open_dirs);
    Ok(vol)
}
