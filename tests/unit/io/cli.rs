//! Tests for command-line parsing and derived paths

#[cfg(test)]
mod tests {
    use budquant::geometry::fit::FitMethod;
    use budquant::io::cli::{Cli, FileProcessor, output_path, overlay_path, selections_path};
    use budquant::io::configuration::{DEFAULT_EDGE_REL_MIN, DEFAULT_PIXEL_SIZE};
    use clap::Parser;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    // Tests defaults match the configuration constants
    // Verified by changing one default on the command line
    #[test]
    fn test_default_arguments() {
        let cli = parse(&["budquant", "stack.tif"]);

        assert!((cli.pixel_size - DEFAULT_PIXEL_SIZE).abs() < f64::EPSILON);
        assert!((cli.edge_rel_min - DEFAULT_EDGE_REL_MIN).abs() < f64::EPSILON);
        assert_eq!(cli.channels, 1);
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
        assert!(!cli.overlay);
    }

    // Tests flags invert the skip and progress accessors
    // Verified by swapping the two flags
    #[test]
    fn test_flag_accessors() {
        let cli = parse(&["budquant", "stack.tif", "--quiet", "--no-skip"]);
        assert!(!cli.skip_existing());
        assert!(!cli.should_show_progress());
    }

    // Tests the method argument maps onto the fitting strategy
    // Verified by defaulting to the geometric method
    #[test]
    fn test_method_selection() {
        let cli = parse(&["budquant", "stack.tif", "--method", "geometric"]);
        let config = cli.analysis_config().unwrap();
        assert_eq!(config.method, FitMethod::Geometric);

        let cli = parse(&["budquant", "stack.tif"]);
        let config = cli.analysis_config().unwrap();
        assert_eq!(config.method, FitMethod::Algebraic);
    }

    // Tests fluorescence channel defaults depend on the channel count
    // Verified by defaulting single-channel stacks to channel one
    #[test]
    fn test_fluorescence_channel_defaults() {
        let cli = parse(&["budquant", "stack.tif", "--channels", "2"]);
        assert_eq!(cli.analysis_config().unwrap().fl_channels, vec![1]);

        let cli = parse(&["budquant", "stack.tif"]);
        assert!(cli.analysis_config().unwrap().fl_channels.is_empty());

        let cli = parse(&[
            "budquant",
            "stack.tif",
            "--channels",
            "3",
            "-f",
            "1",
            "-f",
            "2",
        ]);
        assert_eq!(cli.analysis_config().unwrap().fl_channels, vec![1, 2]);
    }

    // Tests configuration validation rejects impossible arguments
    // Verified by accepting a brightfield channel beyond the stack
    #[test]
    fn test_analysis_config_validation() {
        let cli = parse(&["budquant", "stack.tif", "--pixel-size", "0"]);
        assert!(cli.analysis_config().is_err());

        let cli = parse(&["budquant", "stack.tif", "--bf-channel", "1"]);
        assert!(cli.analysis_config().is_err());

        let cli = parse(&["budquant", "stack.tif", "--channels", "2", "-f", "5"]);
        assert!(cli.analysis_config().is_err());
    }

    // Tests derived sibling paths keep the stem and add the suffix
    // Verified by dropping the parent directory
    #[test]
    fn test_derived_paths() {
        let input = Path::new("/data/run1/pos_07.tif");

        assert_eq!(
            output_path(input),
            Path::new("/data/run1/pos_07_measurements.csv")
        );
        assert_eq!(
            selections_path(input),
            Path::new("/data/run1/pos_07_selections.csv")
        );
        assert_eq!(
            overlay_path(input, 12),
            Path::new("/data/run1/pos_07_overlay_0012.png")
        );
    }

    // Tests a non-TIFF target is rejected by the processor
    // Verified by pointing at a CSV file
    #[test]
    fn test_processor_rejects_non_tiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.csv");
        std::fs::write(&path, "frame,x,y\n").unwrap();

        let cli = parse(&["budquant", path.to_str().unwrap(), "--quiet"]);
        let mut processor = FileProcessor::new(cli);
        assert!(processor.process().is_err());
    }

    // Tests an empty directory processes cleanly with no output
    // Verified by erroring on empty batches
    #[test]
    fn test_processor_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let cli = parse(&["budquant", dir.path().to_str().unwrap(), "--quiet"]);
        let mut processor = FileProcessor::new(cli);
        assert!(processor.process().is_ok());
    }
}
