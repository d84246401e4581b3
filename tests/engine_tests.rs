//! Engine behaviour on real files under `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use uprocess::{
    process_file, process_text, DefineSet, ErrorKind, Preprocessor, WarningBuffer, WarningKind,
};

fn fixture(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(path)
}

fn defines(names: &[&str]) -> DefineSet {
    names.iter().copied().collect()
}

#[cfg(test)]
mod conditional_include_tests {
    use super::*;

    const TEXT: &str = "// #ifdef flag1\n\
                        // #include \"dataFile1.js\"\n\
                        // #endif\n\
                        // #ifndef flag1\n\
                        // #include \"dataFile2.js\"\n\
                        // #endif";

    #[test]
    fn test_flag_selects_first_file() {
        let out = process_text(TEXT, &defines(&["flag1"]), fixture("conditional")).unwrap();
        assert_eq!(out, "dataFile1");
    }

    #[test]
    fn test_no_flag_selects_second_file() {
        let out = process_text(TEXT, &DefineSet::new(), fixture("conditional")).unwrap();
        assert_eq!(out, "dataFile2");
    }
}

#[cfg(test)]
mod equivalence_tests {
    use super::*;

    #[test]
    fn test_process_file_equals_process_text() {
        let file = fixture("equivalence/scriptFile.js");
        let text = fs::read_to_string(&file).unwrap();
        let defines = defines(&["flag1"]);

        let from_text = process_text(&text, &defines, fixture("equivalence")).unwrap();
        let from_file = process_file(&file, &defines).unwrap();
        assert_eq!(from_text, from_file);
        assert_eq!(from_file, "dataFile1\ntext");
    }

    #[test]
    fn test_equivalence_without_defines() {
        let file = fixture("equivalence/scriptFile.js");
        let text = fs::read_to_string(&file).unwrap();
        assert_eq!(
            process_text(&text, &DefineSet::new(), fixture("equivalence")).unwrap(),
            process_file(&file, &DefineSet::new()).unwrap()
        );
    }
}

#[cfg(test)]
mod relative_include_tests {
    use super::*;

    #[test]
    fn test_nested_include_is_relative_to_its_own_folder() {
        let out = process_text(
            "// #include \"testFolder/scriptFile.js\"",
            &DefineSet::new(),
            fixture("relative"),
        )
        .unwrap();
        assert_eq!(out, "dataFile1");
    }

    #[test]
    fn test_same_file_included_from_elsewhere_resolves_the_same() {
        let out = process_file(fixture("relative/testFolder/scriptFile.js"), &DefineSet::new())
            .unwrap();
        assert_eq!(out, "dataFile1");
    }
}

#[cfg(test)]
mod define_propagation_tests {
    use super::*;

    #[test]
    fn test_defines_cross_include_boundaries() {
        let out = process_file(fixture("defines/main.js"), &defines(&["REMOVED"])).unwrap();
        assert_eq!(out, "sibling sees setter\nyes\nremoved");
    }

    #[test]
    fn test_repeated_calls_start_from_caller_defines() {
        let caller = defines(&["REMOVED"]);
        let first = process_file(fixture("defines/main.js"), &caller).unwrap();
        let second = process_file(fixture("defines/main.js"), &caller).unwrap();
        assert_eq!(first, second);
        assert_eq!(caller, defines(&["REMOVED"]));
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_nested_error_directive_trail() {
        let err = process_file(fixture("errors/main.js"), &DefineSet::new()).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::ErrorDirective { message } if message == "inner failure")
        );

        let trail = err.trail();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].file.as_deref(), Some(fixture("errors/nested/inner.js").as_path()));
        assert_eq!(trail[0].line, Some(4));
        assert_eq!(trail[1].file.as_deref(), Some(fixture("errors/main.js").as_path()));
        assert_eq!(trail[1].line, Some(2));

        let rendered = err.to_string();
        assert!(rendered.starts_with("#error: inner failure\noccurred while processing '"));
        assert!(rendered.contains("inner.js' line 4"));
        assert!(rendered.contains("main.js' line 2"));
    }

    #[test]
    fn test_missing_include_is_fatal() {
        let err = process_file(fixture("errors/missing_include.js"), &DefineSet::new()).unwrap_err();
        match err.kind() {
            ErrorKind::IncludeRead { path, source } => {
                assert_eq!(path, &fixture("errors/nested/missing.js"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.trail()[0].line, Some(2));
    }

    #[test]
    fn test_unterminated_block_reported_in_its_own_file() {
        let err = process_file(fixture("errors/includes_unterminated.js"), &DefineSet::new())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingEndif { count: 1 }));
        assert_eq!(
            err.trail()[0].file.as_deref(),
            Some(fixture("errors/nested/unterminated.js").as_path())
        );
        assert_eq!(err.trail()[0].line, Some(1));
    }

    #[test]
    fn test_missing_top_level_file() {
        let err = process_file(fixture("does-not-exist.js"), &DefineSet::new()).unwrap_err();
        match err.kind() {
            ErrorKind::SourceRead { path, source } => {
                assert_eq!(path, &fixture("does-not-exist.js"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.trail().is_empty());
        assert!(!err.to_string().contains("included"));
    }
}

#[cfg(test)]
mod warning_tests {
    use super::*;

    #[test]
    fn test_warning_located_in_file() {
        let buffer = Arc::new(WarningBuffer::new());
        let engine = Preprocessor::new().with_sink(buffer.clone());
        let out = engine
            .process_file(fixture("cli/main.js"), &defines(&["flag1"]))
            .unwrap();
        assert_eq!(out, "dataFile1");

        let warnings = buffer.take();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].kind,
            WarningKind::Directive {
                message: "built from main".to_string()
            }
        );
        let location = warnings[0].location.as_ref().unwrap();
        assert_eq!(location.file.as_deref(), Some(fixture("cli/main.js").as_path()));
        assert_eq!(location.line, Some(7));
    }
}
