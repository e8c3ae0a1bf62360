//! Artifact kinds and the file-naming contract.

use super::RunDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The kind of document a stage produces.
///
/// Each kind owns its place in the date-partitioned layout. The resulting
/// names are part of the public contract: external triggers and dashboards
/// inspect outputs by these exact paths, so naming is a pure function of
/// `(RunDate, kind)` and reruns overwrite in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// News and forum research notes (`research/hn_reddit_{date}.md`).
    NewsResearch,
    /// Academic-paper research notes (`research/arxiv_{date}.md`).
    PaperResearch,
    /// The daily summary report (`reports/daily_report_{date}.md`).
    Report,
    /// Cross-run trend analysis (`trends/trends_{date}.md`).
    TrendAnalysis,
    /// The podcast script (`podcasts/{date}/script.md`).
    Script,
    /// The rendered podcast audio (`podcasts/{date}/audio.wav`).
    Audio,
}

impl ArtifactKind {
    /// All kinds, in the order the daily pipeline produces them.
    pub const ALL: [Self; 6] = [
        Self::NewsResearch,
        Self::PaperResearch,
        Self::Report,
        Self::TrendAnalysis,
        Self::Script,
        Self::Audio,
    ];

    /// Returns a human-readable title used in document headings.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewsResearch => "AI News Research",
            Self::PaperResearch => "AI Research Papers",
            Self::Report => "Daily AI Report",
            Self::TrendAnalysis => "AI Trend Analysis",
            Self::Script => "Podcast Script",
            Self::Audio => "Podcast Audio",
        }
    }

    /// Returns true if the artifact body is text (ingestable by the
    /// knowledge index).
    #[must_use]
    pub fn is_text(&self) -> bool {
        !matches!(self, Self::Audio)
    }

    /// Returns the file name for the given run date.
    #[must_use]
    pub fn file_name(&self, run_date: RunDate) -> String {
        match self {
            Self::NewsResearch => format!("hn_reddit_{run_date}.md"),
            Self::PaperResearch => format!("arxiv_{run_date}.md"),
            Self::Report => format!("daily_report_{run_date}.md"),
            Self::TrendAnalysis => format!("trends_{run_date}.md"),
            Self::Script => "script.md".to_string(),
            Self::Audio => "audio.wav".to_string(),
        }
    }

    /// Returns the date partition directory, relative to the store root.
    ///
    /// Research, report, and trend kinds share flat category directories with
    /// the date embedded in file names; podcast kinds live under a per-date
    /// directory.
    #[must_use]
    pub fn partition_dir(&self, run_date: RunDate) -> PathBuf {
        match self {
            Self::NewsResearch | Self::PaperResearch => PathBuf::from("research"),
            Self::Report => PathBuf::from("reports"),
            Self::TrendAnalysis => PathBuf::from("trends"),
            Self::Script | Self::Audio => {
                PathBuf::from("podcasts").join(run_date.to_string())
            }
        }
    }

    /// Returns the full path relative to the store root.
    #[must_use]
    pub fn relative_path(&self, run_date: RunDate) -> PathBuf {
        self.partition_dir(run_date).join(self.file_name(run_date))
    }

    /// Substrings a fallback lookup requires in a candidate file name when
    /// the exact expected name is absent.
    ///
    /// Both research kinds scope the scan to names containing the run date;
    /// the paper kind additionally requires "arxiv" so a stray news file is
    /// never mistaken for paper research. Podcast kinds are already scoped by
    /// their per-date directory.
    #[must_use]
    pub fn fallback_hints(&self, run_date: RunDate) -> Vec<String> {
        match self {
            Self::PaperResearch => vec![run_date.to_string(), "arxiv".to_string()],
            Self::Script => vec!["script".to_string()],
            Self::Audio => vec!["audio".to_string()],
            _ => vec![run_date.to_string()],
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewsResearch => write!(f, "news_research"),
            Self::PaperResearch => write!(f, "paper_research"),
            Self::Report => write!(f, "report"),
            Self::TrendAnalysis => write!(f, "trend_analysis"),
            Self::Script => write!(f, "script"),
            Self::Audio => write!(f, "audio"),
        }
    }
}
