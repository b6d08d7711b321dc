use clap::Parser;

use log::{error, info};
use std::process::ExitCode;

use kitti_rescale::{run, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            if let Err(print_err) = e.print() {
                error!("Failed to print usage: {}", print_err);
            }
            return ExitCode::from(1);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    if !args.img_dir.is_dir() {
        error!(
            "The specified image directory does not exist: {}",
            args.img_dir.display()
        );
        return ExitCode::from(1);
    }

    let config = args.to_config();
    info!(
        "Rescaling {} to {}x{}",
        args.img_dir.display(),
        config.target.width,
        config.target.height
    );

    match run(&args.img_dir, &args.kitti_dir, &config) {
        Ok(_) => {
            info!("Rescaling completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to rescale dataset: {}", e);
            ExitCode::from(1)
        }
    }
}
