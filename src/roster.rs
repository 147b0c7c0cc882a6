//! Contender rosters: free-text parsing, roster files and built-in presets

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::game::constants::game::MIN_CONTENDERS;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Add at least two contenders to start the battle (got {found})")]
    TooFewContenders { found: usize },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("failed to read roster file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Named fight that can be started without typing names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub contenders: &'static [&'static str],
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Top 5 AI Companies",
        contenders: &["OpenAI", "Google DeepMind", "Anthropic", "Meta AI", "Amazon AI"],
    },
    Preset {
        name: "Last 10 US Presidents",
        contenders: &[
            "Joe Biden",
            "Donald Trump",
            "Barack Obama",
            "George W. Bush",
            "Bill Clinton",
            "George H. W. Bush",
            "Ronald Reagan",
            "Jimmy Carter",
            "Gerald Ford",
            "Richard Nixon",
        ],
    },
    Preset {
        name: "LoL Champions",
        contenders: &[
            "Ahri", "Yasuo", "Zed", "Lux", "Jinx", "Thresh", "Vayne", "Lee Sin", "Darius", "Ekko",
        ],
    },
    Preset {
        name: "Greek Mythology",
        contenders: &[
            "Zeus", "Hades", "Athena", "Apollo", "Ares", "Artemis", "Hermes", "Poseidon",
        ],
    },
    Preset {
        name: "Anime Heroes",
        contenders: &[
            "Naruto", "Goku", "Luffy", "Ichigo", "Saitama", "Tanjiro", "Eren", "Gon",
        ],
    },
];

/// Looks up a preset by name, ignoring case and surrounding whitespace
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let wanted = name.trim();
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(wanted))
}

/// Validated list of contender names: trimmed, non-empty, unique, at least two
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Builds a roster from names, keeping the first occurrence of each
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        if names.len() < MIN_CONTENDERS {
            return Err(RosterError::TooFewContenders { found: names.len() });
        }
        Ok(Self { names })
    }

    /// One name per line; blank lines are ignored
    pub fn parse(text: &str) -> Result<Self, RosterError> {
        Self::from_names(text.lines())
    }

    pub fn from_file(path: &Path) -> Result<Self, RosterError> {
        let text = std::fs::read_to_string(path).map_err(|source| RosterError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn from_preset(name: &str) -> Result<Self, RosterError> {
        let preset = find_preset(name).ok_or_else(|| RosterError::UnknownPreset(name.to_string()))?;
        Self::from_names(preset.contenders.iter())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
