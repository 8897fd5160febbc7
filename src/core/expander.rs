use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::classify::{Classifier, Directive};
use crate::core::resolver::{self, IMPL_SUBDIR};
use crate::domain::model::UnitRole;
use crate::utils::error::Result;

const END_LABEL_PREFIX: &str = "// ========== End of";

/// Depth-first expansion state for one merge run.
///
/// Owns the visited set and the aggregated external includes; both are
/// request-scoped and threaded through the recursion, so each physical file
/// is expanded at most once per run and every angle-bracket include surfaces
/// exactly once in the final header block. Inclusion cycles terminate because
/// a unit is marked visited before its content is expanded.
pub struct Expander {
    root: PathBuf,
    include_dir: PathBuf,
    source_dir: PathBuf,
    search_dirs: Vec<PathBuf>,
    classifier: Classifier,
    visited: HashSet<PathBuf>,
    externals: BTreeSet<String>,
}

impl Expander {
    pub fn new(root: &Path, include_dir: &str, source_dir: &str) -> Self {
        let include_dir = root.join(include_dir);
        let source_dir = root.join(source_dir);
        let search_dirs = vec![
            include_dir.clone(),
            include_dir.join(IMPL_SUBDIR),
            source_dir.clone(),
        ];
        Self {
            root: root.to_path_buf(),
            include_dir,
            source_dir,
            search_dirs,
            classifier: Classifier::new(),
            visited: HashSet::new(),
            externals: BTreeSet::new(),
        }
    }

    /// Seeds the visited set; the entry unit is marked before expansion so a
    /// back-reference to it contributes nothing.
    pub fn mark_visited(&mut self, path: PathBuf) {
        self.visited.insert(path);
    }

    /// Expands one unit's content line by line. Content is split on `\n`, so
    /// a trailing newline yields a final blank line subject to the blank-line
    /// suppression rules below.
    pub fn expand(&mut self, content: &str, current_file: &Path) -> Result<Vec<String>> {
        let mut out = Vec::new();

        for line in content.split('\n') {
            match self.classifier.classify(line) {
                Directive::Local(reference) => {
                    self.expand_local(&reference, current_file, &mut out)?;
                }
                Directive::External(raw) => {
                    self.externals.insert(raw);
                }
                Directive::PragmaOnce => {
                    // The guard line itself is dropped; so is the blank line
                    // it typically leaves behind.
                    if out.last().is_some_and(|prev| prev.trim().is_empty()) {
                        out.pop();
                    }
                }
                Directive::Plain => {
                    // Blank lines are suppressed at the start of a unit's
                    // output and directly after a block end label.
                    if !line.trim().is_empty()
                        || out.last().is_some_and(|prev| !prev.starts_with(END_LABEL_PREFIX))
                    {
                        out.push(line.to_string());
                    }
                }
            }
        }

        Ok(out)
    }

    /// Handles one quoted include. Unresolved references and references to
    /// already-expanded units both contribute no output line; the directive
    /// is dropped, not echoed.
    fn expand_local(
        &mut self,
        reference: &str,
        current_file: &Path,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let Some(target) = resolver::resolve_include(
            reference,
            current_file,
            &self.search_dirs,
        ) else {
            // May reference a pre-generated or vendored file outside the
            // project tree; not an error.
            tracing::debug!("Unresolved include \"{}\", dropping directive", reference);
            return Ok(());
        };

        if !self.visited.insert(target.clone()) {
            return Ok(());
        }
        self.emit_unit(&target, UnitRole::Header, out)?;

        if let Some(companion) =
            resolver::find_companion_source(&target, &self.include_dir, &self.source_dir)
        {
            if self.visited.insert(companion.clone()) {
                self.emit_unit(&companion, UnitRole::Source, out)?;
            }
        }

        Ok(())
    }

    fn emit_unit(&mut self, path: &Path, role: UnitRole, out: &mut Vec<String>) -> Result<()> {
        let relative = resolver::relative_display(path, &self.root);
        match role {
            UnitRole::Source => tracing::info!("Processing Source for Header: {}", relative),
            _ => tracing::info!("Processing Header: {}", relative),
        }

        let content = fs::read_to_string(path)?;
        let block = self.expand(&content, path)?;

        out.push(format!(
            "// ========== From {} {} ==========",
            role.label(),
            relative
        ));
        out.extend(block);
        out.push(format!(
            "// ========== End of {} {} ==========",
            role.label(),
            relative
        ));
        out.push(String::new());
        Ok(())
    }

    /// Consumes the expander, yielding the sorted external includes and the
    /// sorted root-relative paths of every unit expanded during the run.
    pub fn finish(self) -> (Vec<String>, Vec<String>) {
        let externals: Vec<String> = self.externals.into_iter().collect();
        let mut processed: Vec<String> = self
            .visited
            .iter()
            .map(|path| resolver::relative_display(path, &self.root))
            .collect();
        processed.sort();
        (externals, processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn expand_entry(root: &Path, entry_rel: &str) -> (Vec<String>, Vec<String>, Vec<String>) {
        let entry = root.join(entry_rel).canonicalize().unwrap();
        let content = fs::read_to_string(&entry).unwrap();
        let mut expander = Expander::new(root, "include", "src");
        expander.mark_visited(entry.clone());
        let body = expander.expand(&content, &entry).unwrap();
        let (externals, processed) = expander.finish();
        (body, externals, processed)
    }

    #[test]
    fn test_shared_header_expanded_once() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/common.hpp"), "int common();\n");
        touch(
            &root.join("include/a.hpp"),
            "#include \"common.hpp\"\nint a();\n",
        );
        touch(
            &root.join("include/b.hpp"),
            "#include \"common.hpp\"\nint b();\n",
        );
        touch(
            &root.join("src/main.cpp"),
            "#include \"a.hpp\"\n#include \"b.hpp\"\nint main() {}\n",
        );

        let (body, _, processed) = expand_entry(&root, "src/main.cpp");

        let common_blocks = body
            .iter()
            .filter(|line| line.as_str() == "// ========== From Header include/common.hpp ==========")
            .count();
        assert_eq!(common_blocks, 1);
        assert_eq!(processed.len(), 4);
        assert!(body.contains(&"int common();".to_string()));
        assert!(body.contains(&"int a();".to_string()));
        assert!(body.contains(&"int b();".to_string()));
    }

    #[test]
    fn test_inclusion_cycle_terminates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(
            &root.join("include/a.hpp"),
            "#include \"b.hpp\"\nint a();\n",
        );
        touch(
            &root.join("include/b.hpp"),
            "#include \"a.hpp\"\nint b();\n",
        );
        touch(&root.join("src/main.cpp"), "#include \"a.hpp\"\n");

        let (body, _, processed) = expand_entry(&root, "src/main.cpp");

        assert_eq!(processed.len(), 3);
        let a_blocks = body
            .iter()
            .filter(|line| line.as_str() == "// ========== From Header include/a.hpp ==========")
            .count();
        let b_blocks = body
            .iter()
            .filter(|line| line.as_str() == "// ========== From Header include/b.hpp ==========")
            .count();
        assert_eq!(a_blocks, 1);
        assert_eq!(b_blocks, 1);
    }

    #[test]
    fn test_companion_source_follows_header_block() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/widget.hpp"), "struct Widget;\n");
        touch(&root.join("src/widget.cpp"), "void widget_impl() {}\n");
        touch(&root.join("src/main.cpp"), "#include \"widget.hpp\"\n");

        let (body, _, processed) = expand_entry(&root, "src/main.cpp");

        let header_end = body
            .iter()
            .position(|line| line == "// ========== End of Header include/widget.hpp ==========")
            .unwrap();
        let source_start = body
            .iter()
            .position(|line| line == "// ========== From Source src/widget.cpp ==========")
            .unwrap();
        // Implementation block directly follows the header block, separated
        // by the blank line every block appends.
        assert_eq!(source_start, header_end + 2);
        assert_eq!(processed.len(), 3);
    }

    #[test]
    fn test_companion_included_once_across_fan_in() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/widget.hpp"), "struct Widget;\n");
        touch(&root.join("src/widget.cpp"), "void widget_impl() {}\n");
        touch(
            &root.join("include/panel.hpp"),
            "#include \"widget.hpp\"\nstruct Panel;\n",
        );
        touch(
            &root.join("src/main.cpp"),
            "#include \"widget.hpp\"\n#include \"panel.hpp\"\n",
        );

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let source_blocks = body
            .iter()
            .filter(|line| line.as_str() == "// ========== From Source src/widget.cpp ==========")
            .count();
        assert_eq!(source_blocks, 1);
    }

    #[test]
    fn test_external_includes_hoisted_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(
            &root.join("include/a.hpp"),
            "#include <vector>\n#include <algorithm>\nint a();\n",
        );
        touch(
            &root.join("src/main.cpp"),
            "#include <vector>\n#include \"a.hpp\"\n#include <cstdint>\nint main() {}\n",
        );

        let (body, externals, _) = expand_entry(&root, "src/main.cpp");

        assert_eq!(
            externals,
            vec![
                "#include <algorithm>".to_string(),
                "#include <cstdint>".to_string(),
                "#include <vector>".to_string(),
            ]
        );
        assert!(body.iter().all(|line| !line.contains("#include <")));
    }

    #[test]
    fn test_unresolved_include_dropped_silently() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(
            &root.join("src/main.cpp"),
            "#include \"generated/tables.hpp\"\nint main() {}\n",
        );

        let (body, _, processed) = expand_entry(&root, "src/main.cpp");

        assert!(body.iter().all(|line| !line.contains("generated/tables.hpp")));
        assert!(body.contains(&"int main() {}".to_string()));
        assert_eq!(processed.len(), 1);
    }

    #[test]
    fn test_pragma_once_and_trailing_blank_stripped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/a.hpp"), "#pragma once\n\nint x;\n");
        touch(&root.join("src/main.cpp"), "#include \"a.hpp\"\n");

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let start = body
            .iter()
            .position(|line| line == "// ========== From Header include/a.hpp ==========")
            .unwrap();
        // Block content begins directly with the declaration: no guard line,
        // no leading blank line.
        assert_eq!(body[start + 1], "int x;");
        assert!(body.iter().all(|line| !line.contains("#pragma once")));
    }

    #[test]
    fn test_pragma_once_removes_preceding_blank() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(
            &root.join("include/a.hpp"),
            "int before;\n\n#pragma once\nint after;\n",
        );
        touch(&root.join("src/main.cpp"), "#include \"a.hpp\"\n");

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let before = body.iter().position(|line| line == "int before;").unwrap();
        assert_eq!(body[before + 1], "int after;");
    }

    #[test]
    fn test_blank_line_suppressed_after_block_end() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/a.hpp"), "int x;\n");
        // The pragma pops the block separator, leaving the end label as the
        // last emitted line; the following blank must then be suppressed.
        touch(
            &root.join("src/main.cpp"),
            "#include \"a.hpp\"\n#pragma once\n\nint main() {}\n",
        );

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let end = body
            .iter()
            .position(|line| line == "// ========== End of Header include/a.hpp ==========")
            .unwrap();
        assert_eq!(body[end + 1], "int main() {}");
    }

    #[test]
    fn test_leading_blank_lines_suppressed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/a.hpp"), "\n\nint x;\n");
        touch(&root.join("src/main.cpp"), "#include \"a.hpp\"\n");

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let start = body
            .iter()
            .position(|line| line == "// ========== From Header include/a.hpp ==========")
            .unwrap();
        assert_eq!(body[start + 1], "int x;");
    }

    #[test]
    fn test_revisited_include_emits_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        touch(&root.join("include/a.hpp"), "int x;\n");
        touch(
            &root.join("src/main.cpp"),
            "#include \"a.hpp\"\n#include \"a.hpp\"\nint main() {}\n",
        );

        let (body, _, _) = expand_entry(&root, "src/main.cpp");

        let blocks = body
            .iter()
            .filter(|line| line.as_str() == "// ========== From Header include/a.hpp ==========")
            .count();
        assert_eq!(blocks, 1);
    }
}
