use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Separator used when splitting stored directory strings.
pub const SEPARATOR: char = MAIN_SEPARATOR;

/// Canonical string form of a path for storage, comparison and map keys.
///
/// The path is made absolute against the working directory and lexically
/// cleaned (`.`, `..`, repeated and trailing separators). Symlinks are not
/// resolved. On Windows the result is case-folded with `\` separators.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    fold_case(lexically_normalize(&absolute).to_string_lossy().into_owned())
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            other => result.push(other.as_os_str()),
        }
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

#[cfg(target_os = "windows")]
fn fold_case(path: String) -> String {
    path.to_lowercase().replace('/', "\\")
}

#[cfg(not(target_os = "windows"))]
fn fold_case(path: String) -> String {
    path
}

/// Final segment of a normalized path; empty for a bare root such as `/` or `c:\`.
pub fn basename(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or("")
}
