use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root directory every media path is resolved against.
pub const ASSET_ROOT: &str = "assets";

/// Media type of a month asset, decided from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if [".mp4", ".webm", ".mov", ".m4v"].iter().any(|ext| lower.ends_with(ext)) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// A font to load, keyed by the family name it registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    /// Relative path to the typeface JSON.
    pub path: String,
}

/// One media file of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub month: String,
    pub filename: String,
    pub kind: MediaKind,
}

impl ManifestEntry {
    /// Relative fetch path (`assets/<month>/<filename>`).
    pub fn path(&self) -> String {
        asset_path(&self.month, &self.filename)
    }

    /// Bundle key (`<month>/<filename>`).
    pub fn key(&self) -> String {
        format!("{}/{}", self.month, self.filename)
    }
}

pub fn asset_path(month: &str, filename: &str) -> String {
    format!("{ASSET_ROOT}/{month}/{filename}")
}

/// Month key → ordered media file names, plus the fonts to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub months: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub fonts: Vec<FontDescriptor>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_month(mut self, month: impl Into<String>, files: Vec<String>) -> Self {
        self.months.insert(month.into(), files);
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, path: impl Into<String>) -> Self {
        self.fonts.push(FontDescriptor {
            family: family.into(),
            path: path.into(),
        });
        self
    }

    /// Ordered file names of a month (empty if unknown).
    pub fn files(&self, month: &str) -> &[String] {
        self.months.get(month).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every media entry, month by month, in file order.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry> + '_ {
        self.months.iter().flat_map(|(month, files)| {
            files.iter().map(move |filename| ManifestEntry {
                month: month.clone(),
                filename: filename.clone(),
                kind: MediaKind::from_filename(filename),
            })
        })
    }

    /// Media files plus fonts.
    pub fn total_count(&self) -> usize {
        self.months.values().map(Vec::len).sum::<usize>() + self.fonts.len()
    }

    /// A manifest restricted to the given months, without fonts.
    pub fn subset<'a>(&self, months: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out = Self::new();
        for month in months {
            if let Some(files) = self.months.get(month) {
                out.months.insert(month.to_string(), files.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_fonts() {
        let json = r#"{
            "months": { "jan": ["a.png", "b.png"], "feb": ["c.mp4"] },
            "fonts": [ { "family": "Gentilis", "path": "fonts/gentilis_regular.typeface.json" } ]
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.files("jan"), ["a.png", "b.png"]);
        assert_eq!(manifest.fonts[0].family, "Gentilis");
        assert_eq!(manifest.total_count(), 4);
    }

    #[test]
    fn media_kind_from_extension() {
        assert_eq!(MediaKind::from_filename("wave.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_filename("CLIP.MOV"), MediaKind::Video);
        assert_eq!(MediaKind::from_filename("ok.png"), MediaKind::Image);
    }

    #[test]
    fn entries_carry_paths_and_kinds() {
        let manifest = AssetManifest::new().with_month("feb", vec!["c.mp4".into()]);
        let entry = manifest.entries().next().unwrap();
        assert_eq!(entry.path(), "assets/feb/c.mp4");
        assert_eq!(entry.key(), "feb/c.mp4");
        assert_eq!(entry.kind, MediaKind::Video);
    }

    #[test]
    fn subset_keeps_only_requested_months() {
        let manifest = AssetManifest::new()
            .with_month("intro", vec!["ok.png".into()])
            .with_month("jan", vec!["a.png".into()])
            .with_font("Gentilis", "fonts/g.json");
        let sub = manifest.subset(["jan", "missing"]);
        assert_eq!(sub.months.len(), 1);
        assert!(sub.fonts.is_empty());
    }
}
