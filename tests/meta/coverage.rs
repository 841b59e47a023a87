//! Meta tests keeping the unit test tree aligned with the src tree

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module organization files need no dedicated test file
    fn is_organizational(path: &str) -> bool {
        path == "main.rs" || path == "lib.rs" || path.ends_with("mod.rs")
    }

    fn relative_rust_paths(root: &Path) -> Result<BTreeSet<String>, io::Error> {
        let mut paths = BTreeSet::new();
        collect(root, root, &mut paths)?;
        Ok(paths)
    }

    fn collect(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> Result<(), io::Error> {
        if !dir.is_dir() {
            return Ok(());
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_| io::Error::other("path outside scanned root"))?
                .to_string_lossy()
                .to_string();

            if path.is_dir() {
                paths.insert(relative);
                collect(&path, base, paths)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    #[test]
    fn test_every_src_file_has_a_unit_test_file() {
        let src_paths = relative_rust_paths(Path::new(SRC_DIR)).unwrap_or_default();
        assert!(!src_paths.is_empty(), "src directory scan came up empty");
        let test_paths = relative_rust_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let missing: Vec<&String> = src_paths
            .iter()
            .filter(|path| !is_organizational(path) && !test_paths.contains(*path))
            .collect();

        assert!(
            missing.is_empty(),
            "src files without unit test counterparts:\n{}",
            missing
                .iter()
                .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    #[test]
    fn test_every_unit_test_file_has_a_src_counterpart() {
        let src_paths = relative_rust_paths(Path::new(SRC_DIR)).unwrap_or_default();
        let test_paths = relative_rust_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let orphaned: Vec<&String> = test_paths
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(*path))
            .collect();

        assert!(
            orphaned.is_empty(),
            "unit test files without src counterparts:\n{}",
            orphaned
                .iter()
                .map(|path| format!("  - tests/unit/{path} -> src/{path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    #[test]
    fn test_every_test_file_contains_tests() {
        let tests_dir = Path::new("tests");
        let paths = relative_rust_paths(tests_dir).unwrap_or_default();
        let mut empty_files = Vec::new();

        for relative in &paths {
            let path = tests_dir.join(relative);
            if !path.is_file() {
                continue;
            }
            let at_top_level = !relative.contains(std::path::MAIN_SEPARATOR);
            if relative.ends_with("mod.rs") || (at_top_level && relative == "main.rs") {
                continue;
            }

            let content = fs::read_to_string(&path).unwrap_or_default();
            if !content.contains("#[test]") {
                empty_files.push(format!("  - tests/{relative}"));
            }
        }

        assert!(
            empty_files.is_empty(),
            "test files without any #[test] functions:\n{}",
            empty_files.join("\n")
        );
    }
}
