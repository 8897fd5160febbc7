use std::fs;
use std::path::{Path, PathBuf};

/// Extensions that identify a declaration unit eligible for companion lookup.
pub const HEADER_EXTENSIONS: [&str; 3] = ["hpp", "tpp", "h"];
/// Extension of companion implementation units.
pub const SOURCE_EXTENSION: &str = "cpp";
/// Fixed name of the implementation-detail subdirectory under the include dir.
pub const IMPL_SUBDIR: &str = "impl";

/// Resolves a quoted include reference to a canonical path, or `None`.
///
/// Search order: relative to the directory of the including file first, then
/// each search directory in the given order. An unresolved reference is not
/// an error; it may point at a pre-generated or vendored file outside the
/// project tree.
pub fn resolve_include(
    reference: &str,
    current_file: &Path,
    search_dirs: &[PathBuf],
) -> Option<PathBuf> {
    if let Some(current_dir) = current_file.parent() {
        let candidate = current_dir.join(reference);
        if candidate.exists() {
            return fs::canonicalize(candidate).ok();
        }
    }

    for search_dir in search_dirs {
        let candidate = search_dir.join(reference);
        if candidate.exists() {
            return fs::canonicalize(candidate).ok();
        }
    }

    None
}

/// Looks up the companion `.cpp` for a header: same stem, under the source
/// directory. Applies only to recognized header extensions located inside the
/// include or source directory; containment is checked on path ancestry, not
/// on substrings, so a `third_party/include` elsewhere does not qualify.
pub fn find_companion_source(
    header: &Path,
    include_dir: &Path,
    source_dir: &Path,
) -> Option<PathBuf> {
    let extension = header.extension().and_then(|ext| ext.to_str())?;
    if !HEADER_EXTENSIONS.contains(&extension) {
        return None;
    }
    if !header.starts_with(include_dir) && !header.starts_with(source_dir) {
        return None;
    }

    let stem = header.file_stem().and_then(|stem| stem.to_str())?;
    let candidate = source_dir.join(format!("{}.{}", stem, SOURCE_EXTENSION));
    if candidate.exists() {
        return fs::canonicalize(candidate).ok();
    }
    None
}

/// Root-relative display form used in block labels and listings. Falls back
/// to the full path for files outside the project root.
pub fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
