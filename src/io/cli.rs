//! Command-line interface for batch measurement of TIFF stacks

use crate::detection::analyzer::{AnalysisConfig, Analyzer};
use crate::geometry::fit::FitMethod;
use crate::io::configuration::{
    DEFAULT_BF_CHANNEL, DEFAULT_CELL_RADIUS_UM, DEFAULT_EDGE_REL_MIN, DEFAULT_EDGE_SIZE_UM,
    DEFAULT_FL_CHANNEL, DEFAULT_PIXEL_SIZE, OUTPUT_SUFFIX, OVERLAY_SUFFIX, SELECTIONS_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::overlay::export_overlay_png;
use crate::io::progress::ProgressManager;
use crate::io::report::export_measurements;
use crate::io::selections::load_selections;
use crate::io::stack::ImageStack;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Ellipse fitting method selectable on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum MethodArg {
    /// Direct least-squares conic fit
    #[default]
    Algebraic,
    /// Iterative geometric fit refined with Levenberg-Marquardt
    Geometric,
}

impl std::fmt::Display for MethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Algebraic => "algebraic",
            Self::Geometric => "geometric",
        };
        f.write_str(name)
    }
}

impl From<MethodArg> for FitMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Algebraic => Self::Algebraic,
            MethodArg::Geometric => Self::Geometric,
        }
    }
}

#[derive(Parser)]
#[command(name = "budquant")]
#[command(
    author,
    version,
    about = "Measure yeast cell geometry and fluorescence in TIFF stacks"
)]
/// Command-line arguments for the measurement tool
pub struct Cli {
    /// Input TIFF stack or directory of stacks to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Selections CSV (defaults to <input>_selections.csv next to the stack)
    #[arg(short, long)]
    pub selections: Option<PathBuf>,

    /// Report output path (single-file targets only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pixel size in micrometers
    #[arg(short, long, default_value_t = DEFAULT_PIXEL_SIZE)]
    pub pixel_size: f64,

    /// Maximum cell radius in micrometers
    #[arg(short = 'r', long, default_value_t = DEFAULT_CELL_RADIUS_UM)]
    pub cell_radius: f64,

    /// Cell wall thickness in micrometers
    #[arg(short, long, default_value_t = DEFAULT_EDGE_SIZE_UM)]
    pub edge_size: f64,

    /// Minimum relative intensity drop for an edge, percent of background
    #[arg(long, default_value_t = DEFAULT_EDGE_REL_MIN)]
    pub edge_rel_min: f64,

    /// Number of channels interleaved in each stack
    #[arg(short, long, default_value_t = 1)]
    pub channels: usize,

    /// Brightfield channel used for edge detection
    #[arg(short, long, default_value_t = DEFAULT_BF_CHANNEL)]
    pub bf_channel: usize,

    /// Fluorescence channels to measure (repeatable)
    #[arg(short, long)]
    pub fl_channel: Vec<usize>,

    /// Ellipse fitting method
    #[arg(short, long, value_enum, default_value_t = MethodArg::Algebraic)]
    pub method: MethodArg,

    /// Export per-frame overlay images of the fitted cells
    #[arg(long)]
    pub overlay: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the analysis configuration from the parsed arguments
    ///
    /// Without explicit fluorescence channels, multi-channel stacks measure
    /// the default fluorescence channel and single-channel stacks measure
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error when an argument fails validation.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        if self.pixel_size <= 0.0 {
            return Err(invalid_parameter(
                "pixel_size",
                &self.pixel_size,
                &"pixel size must be positive",
            ));
        }
        if self.channels == 0 {
            return Err(invalid_parameter(
                "channels",
                &self.channels,
                &"channel count must be at least 1",
            ));
        }
        if self.bf_channel >= self.channels {
            return Err(invalid_parameter(
                "bf_channel",
                &self.bf_channel,
                &format!("stack only has {} channels", self.channels),
            ));
        }

        let fl_channels = if self.fl_channel.is_empty() {
            if self.channels > DEFAULT_FL_CHANNEL {
                vec![DEFAULT_FL_CHANNEL]
            } else {
                Vec::new()
            }
        } else {
            self.fl_channel.clone()
        };
        for &channel in &fl_channels {
            if channel >= self.channels {
                return Err(invalid_parameter(
                    "fl_channel",
                    &channel,
                    &format!("stack only has {} channels", self.channels),
                ));
            }
        }

        Ok(AnalysisConfig {
            pixel_size: self.pixel_size,
            bf_channel: self.bf_channel,
            fl_channels,
            cell_radius: self.cell_radius,
            edge_size: self.edge_size,
            edge_rel_min: self.edge_rel_min,
            method: self.method.into(),
            ..AnalysisConfig::default()
        })
    }
}

/// Report path derived from an input stack path
pub fn output_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, OUTPUT_SUFFIX, "csv")
}

/// Selections path derived from an input stack path
pub fn selections_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, SELECTIONS_SUFFIX, "csv")
}

/// Overlay path for one frame derived from an input stack path
pub fn overlay_path(input_path: &Path, frame: usize) -> PathBuf {
    sibling_path(input_path, &format!("{OVERLAY_SUFFIX}_{frame:04}"), "png")
}

fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

fn is_tiff(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("tif" | "tiff")
    )
}

/// Orchestrates batch processing of TIFF stacks with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or stack processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_tiff(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(crate::io::error::io_error(
                    "Target file must be a TIFF stack",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_tiff(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(crate::io::error::io_error(
                "Target must be a TIFF stack or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let report_path = self.report_path_for(input_path);
        if report_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (report exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for user feedback for missing selections file
    #[allow(clippy::print_stderr)]
    fn process_file(&mut self, input_path: &Path) -> Result<()> {
        let selections_file = self.selections_path_for(input_path);
        if !selections_file.exists() {
            if !self.cli.quiet {
                eprintln!(
                    "No selections found at: {} (skipping stack)",
                    selections_file.display()
                );
            }
            if let Some(ref mut pm) = self.progress_manager {
                pm.finish_stack();
            }
            return Ok(());
        }

        let config = self.cli.analysis_config()?;
        let stack = ImageStack::from_tiff_path(input_path, self.cli.channels)?;

        let mut analyzer = Analyzer::new(config);
        for record in load_selections(&selections_file)? {
            analyzer.add_selection(record.frame, record.x, record.y);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_stack(input_path, analyzer.selection_count());
        }

        let mut cells = Vec::new();
        for (id, (frame, x, y)) in analyzer.selections().into_iter().enumerate() {
            cells.extend(analyzer.track_selection(&stack, frame, x, y, id + 1)?);
            if let Some(ref pm) = self.progress_manager {
                pm.update_selection();
            }
        }

        let fl_channels = analyzer.config().fl_channels.clone();
        export_measurements(&cells, &fl_channels, self.report_path_for(input_path))?;

        if self.cli.overlay {
            let bf_channel = analyzer.config().bf_channel;
            let mut frames: Vec<usize> = cells.iter().map(|cell| cell.frame).collect();
            frames.sort_unstable();
            frames.dedup();
            for frame in frames {
                export_overlay_png(
                    &stack,
                    frame,
                    bf_channel,
                    &cells,
                    overlay_path(input_path, frame),
                )?;
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish_stack();
        }

        Ok(())
    }

    fn report_path_for(&self, input_path: &Path) -> PathBuf {
        if self.cli.target.is_file()
            && let Some(ref output) = self.cli.output
        {
            return output.clone();
        }
        output_path(input_path)
    }

    fn selections_path_for(&self, input_path: &Path) -> PathBuf {
        if self.cli.target.is_file()
            && let Some(ref selections) = self.cli.selections
        {
            return selections.clone();
        }
        selections_path(input_path)
    }
}
