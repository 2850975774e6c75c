use std::error::Error;

use clap::Parser;

use ascii_booth::cli::{self, Args, Command, StripOptions};
use ascii_booth::config::Config;

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    // If --config is specified, require it to load
    // Otherwise, fall back to defaults if the default config is broken
    match args.config.as_deref() {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file not found: {}", path.display()).into());
            }
            Ok(Config::load(Some(path))?)
        }
        None => match Config::load(None) {
            Ok(c) => Ok(c),
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Ok(Config::default())
            }
        },
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Command::Palettes => {
            cli::list_palettes();
            Ok(())
        }
        Command::Config { ref action } => {
            cli::handle_config_action(action.clone(), args.config.as_deref())
        }
        Command::Render {
            ref image,
            ref render,
            save,
            ref out_dir,
        } => {
            let mut config = load_config(&args)?;
            cli::apply_render_options(&mut config, render);
            cli::run_render(image, save, out_dir.clone(), &config)
        }
        Command::Live {
            ref path,
            ref render,
            fps,
            no_transition,
        } => {
            let mut config = load_config(&args)?;
            cli::apply_render_options(&mut config, render);
            cli::run_live(path, fps, no_transition, &config)
        }
        Command::Strip {
            ref path,
            ref render,
            single,
            json,
            ref caption,
            no_mirror,
            ref out_dir,
        } => {
            let mut config = load_config(&args)?;
            cli::apply_render_options(&mut config, render);
            let opts = StripOptions {
                single,
                json,
                caption: caption.clone(),
                mirror: config.camera.mirror && !no_mirror,
                out_dir: out_dir.clone(),
            };
            cli::run_strip(path, opts, &config)
        }
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
