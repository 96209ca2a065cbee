//! Signal shaping: derive per-PR evaluation inputs from raw platform data.

use crate::types::FileChange;

/// Newline-join all present patches, in file-listing order. Files without
/// diff content (binary files) contribute nothing.
pub fn concat_diff(files: &[FileChange]) -> String {
  files
    .iter()
    .filter_map(|f| f.patch.as_deref())
    .collect::<Vec<_>>()
    .join("\n")
}

/// Newline-join title then body; absent fields contribute an empty string.
pub fn concat_body(title: Option<&str>, body: Option<&str>) -> String {
  format!("{}\n{}", title.unwrap_or(""), body.unwrap_or(""))
}

/// An author with fewer public repositories than the threshold counts as new.
/// A missing count reads as zero.
pub fn is_newbie(public_repos: Option<u32>, threshold: u32) -> bool {
  public_repos.unwrap_or(0) < threshold
}
