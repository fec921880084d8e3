//! Download of the jmdict-simplified JSON dump from its GitHub releases.

use std::fs;
use std::io::{self, Cursor, Read, Seek};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/scriptin/jmdict-simplified/releases/latest";

/// English-only dump, the one the lexicon is built from.
const ASSET_PREFIX: &str = "jmdict-eng-";
const ASSET_SUFFIX: &str = ".json.zip";

const DOWNLOAD_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no jmdict-eng-*.json.zip asset in release {0}")]
    NoAsset(String),

    #[error("archive error: {0}")]
    Archive(String),
}

#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created_at: String,
    pub browser_download_url: String,
}

pub fn parse_release(json: &str) -> Result<Release, FetchError> {
    serde_json::from_str(json).map_err(|e| FetchError::Parse(format!("release: {e}")))
}

impl Release {
    /// The English dictionary asset, if the release has one.
    pub fn dictionary_asset(&self) -> Option<&ReleaseAsset> {
        self.assets
            .iter()
            .find(|a| a.name.starts_with(ASSET_PREFIX) && a.name.ends_with(ASSET_SUFFIX))
    }
}

fn latest_release() -> Result<Release, FetchError> {
    let body = ureq::get(LATEST_RELEASE_URL)
        .header("Accept", "application/vnd.github+json")
        .call()
        .map_err(|e| FetchError::Http(format!("{LATEST_RELEASE_URL}: {e}")))?
        .into_body()
        .read_to_string()
        .map_err(|e| FetchError::Http(format!("{LATEST_RELEASE_URL}: {e}")))?;
    parse_release(&body)
}

/// Extract the only file in a ZIP archive to `dest`. Returns the entry's
/// base name. Directory entries are ignored.
pub fn extract_single_file<R: Read + Seek>(reader: R, dest: &Path) -> Result<String, FetchError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(zip_err)?;

    let mut files = Vec::new();
    for i in 0..archive.len() {
        let file = archive.by_index(i).map_err(zip_err)?;
        if !file.is_dir() {
            files.push(i);
        }
    }
    let &[index] = files.as_slice() else {
        return Err(FetchError::Archive(format!(
            "expected exactly one file, found {}",
            files.len()
        )));
    };

    let mut file = archive.by_index(index).map_err(zip_err)?;
    let raw_name = file.name().to_string();
    let basename = Path::new(&raw_name)
        .file_name()
        .ok_or_else(|| FetchError::Archive(format!("invalid ZIP entry name: {raw_name}")))?
        .to_string_lossy()
        .into_owned();

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    // Write next to the destination, then rename, so a failed extraction
    // never leaves a truncated dump in place.
    let tmp = dest.with_extension("tmp");
    let mut out = fs::File::create(&tmp)?;
    io::copy(&mut file, &mut out)?;
    out.sync_all()?;
    fs::rename(&tmp, dest)?;
    Ok(basename)
}

fn zip_err(e: impl std::fmt::Display) -> FetchError {
    FetchError::Archive(e.to_string())
}

/// Download the latest English dump and extract it to `dest`.
pub fn fetch(dest: &Path) -> Result<(), FetchError> {
    let release = latest_release()?;
    let asset = release
        .dictionary_asset()
        .ok_or_else(|| FetchError::NoAsset(release.tag_name.clone()))?;
    info!(
        release = %release.tag_name,
        asset = %asset.name,
        created_at = %asset.created_at,
        size_mb = format_args!("{:.1}", asset.size as f64 / 1_048_576.0),
        "downloading"
    );

    let url = &asset.browser_download_url;
    let body = ureq::get(url)
        .call()
        .map_err(|e| FetchError::Http(format!("{url}: {e}")))?
        .into_body()
        .with_config()
        .limit(DOWNLOAD_LIMIT)
        .read_to_vec()
        .map_err(|e| FetchError::Http(format!("{url}: {e}")))?;
    debug!(bytes = body.len(), "downloaded");

    let name = extract_single_file(Cursor::new(body), dest)?;
    info!(entry = %name, dest = %dest.display(), "extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    const RELEASE_JSON: &str = r#"{
        "tag_name": "3.6.1+20250101123456",
        "assets": [
            {
                "name": "jmdict-all-3.6.1+20250101123456.json.zip",
                "size": 30000000,
                "created_at": "2025-01-01T12:34:56Z",
                "browser_download_url": "https://example.invalid/all.zip"
            },
            {
                "name": "jmdict-eng-3.6.1+20250101123456.json.tgz",
                "size": 10000000,
                "created_at": "2025-01-01T12:34:56Z",
                "browser_download_url": "https://example.invalid/eng.tgz"
            },
            {
                "name": "jmdict-eng-3.6.1+20250101123456.json.zip",
                "size": 10000000,
                "created_at": "2025-01-01T12:34:56Z",
                "uploader": {"login": "github-actions[bot]"},
                "browser_download_url": "https://example.invalid/eng.zip"
            }
        ]
    }"#;

    fn zip_with(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data.as_bytes()).unwrap();
            }
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn select_english_zip_asset() {
        let release = parse_release(RELEASE_JSON).unwrap();
        let asset = release.dictionary_asset().unwrap();
        assert_eq!(asset.browser_download_url, "https://example.invalid/eng.zip");
    }

    #[test]
    fn release_without_asset() {
        let release = parse_release(r#"{"tag_name": "v1", "assets": []}"#).unwrap();
        assert!(release.dictionary_asset().is_none());
    }

    #[test]
    fn malformed_release() {
        let err = parse_release("{}").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn extract_single_entry() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("data").join("jmdict.json");
        let archive = zip_with(&[("dump/", ""), ("dump/jmdict-eng.json", "{\"words\": []}")]);

        let name = extract_single_file(archive, &dest).unwrap();
        assert_eq!(name, "jmdict-eng.json");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{\"words\": []}");
        assert!(!dest.with_extension("tmp").exists());
    }

    #[test]
    fn extract_rejects_multiple_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("jmdict.json");
        let archive = zip_with(&[("a.json", "[]"), ("b.json", "[]")]);

        let err = extract_single_file(archive, &dest).unwrap_err();
        assert!(matches!(err, FetchError::Archive(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn extract_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_single_file(Cursor::new(b"not a zip".to_vec()), &dir.path().join("x"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Archive(_)));
    }
}
