//! Generate command - build and write the mip chain for one source file.

use std::path::PathBuf;
use std::sync::Arc;

use mipchain::codec::PngCodec;
use mipchain::config::MipConfig;
use mipchain::mip::MipGenerator;
use mipchain::pipeline::MipPipeline;

use super::common::{resolve_execution, resolve_filter, resolve_source_type, FilterKind};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the generate command.
pub struct GenerateArgs {
    pub source: PathBuf,
    pub normal_map: bool,
    pub data: bool,
    pub single_thread: bool,
    pub filter: Option<FilterKind>,
    pub kaiser_alpha: Option<f32>,
    pub kaiser_radius: Option<f32>,
    pub threads: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

/// Resolve the full run configuration from args and the config file.
pub fn build_config(args: &GenerateArgs, runner: &CliRunner) -> Result<MipConfig, CliError> {
    let config = runner.config();
    let source_type = resolve_source_type(args.normal_map, args.data);
    let filter = resolve_filter(args.filter, args.kaiser_alpha, args.kaiser_radius, config)?;
    let (execution, threads) = resolve_execution(args.single_thread, args.threads, config);

    Ok(MipConfig::new(source_type, filter)
        .with_execution(execution)
        .with_threads(threads))
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref(), args.verbose)?;
    runner.log_startup("generate");

    let mip_config = build_config(&args, &runner)?;
    let generator = MipGenerator::new(mip_config)?;

    println!("mipchain v{}", mipchain::VERSION);
    println!();
    println!("Source:      {}", args.source.display());
    println!("Source type: {}", mip_config.source_type);
    println!("Filter:      {}", mip_config.filter);
    println!(
        "Scheduling:  {} ({} worker{})",
        mip_config.execution,
        generator.scheduler().workers(),
        if generator.scheduler().workers() == 1 { "" } else { "s" }
    );
    println!();

    let pipeline =
        MipPipeline::new(Arc::new(PngCodec::new()), generator).with_output_dir(args.output_dir);
    let written = pipeline.run(&args.source)?;

    for level in &written {
        println!(
            "  mip {:>2}  {:>5}×{:<5}  {}",
            level.level,
            level.width,
            level.height,
            level.path.display()
        );
    }
    println!();
    println!("Wrote {} levels.", written.len());

    Ok(())
}
