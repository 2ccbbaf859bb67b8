//! Section router
//!
//! States are named UI sections crossed with the active mode. A logical
//! section name is remapped to the mode-prefixed concrete section id
//! (`collectionSection` -> `gamesCollectionSection` under Games), all other
//! sections are hidden, and mode-specific side effects fire through an
//! explicit [`SectionHooks`] registry injected per mode.
//!
//! The last shown section is persisted by logical name, independent of mode,
//! and restored on load.

pub use omnibase_common::models::Mode;

use std::collections::HashMap;
use std::sync::Arc;

/// A named UI view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Collection,
    AddTitle,
    Stats,
    /// Mode-independent; never mode-prefixed, never persisted
    Settings,
    AiSuggestions,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Collection,
        Section::AddTitle,
        Section::Stats,
        Section::Settings,
        Section::AiSuggestions,
    ];

    /// Logical (Movies-mode) section id
    pub fn logical_id(&self) -> &'static str {
        match self {
            Section::Collection => "collectionSection",
            Section::AddTitle => "addTitleSection",
            Section::Stats => "statsSection",
            Section::Settings => "settingsSection",
            Section::AiSuggestions => "aiSuggestionsSection",
        }
    }

    /// Mode-prefixed suffix used for Games/Music concrete ids
    fn prefixed_suffix(&self) -> &'static str {
        match self {
            Section::Collection => "CollectionSection",
            Section::AddTitle => "AddTitleSection",
            Section::Stats => "StatsSection",
            Section::Settings => "SettingsSection",
            Section::AiSuggestions => "AiSuggestionsSection",
        }
    }

    /// Concrete section id for a mode. Settings is shared across modes.
    pub fn concrete_id(&self, mode: Mode) -> String {
        if *self == Section::Settings {
            return self.logical_id().to_string();
        }
        match mode {
            Mode::Movies => self.logical_id().to_string(),
            Mode::Games => format!("games{}", self.prefixed_suffix()),
            Mode::Music => format!("music{}", self.prefixed_suffix()),
        }
    }

    /// Parse any known section id, logical or mode-prefixed. This replaces
    /// the original's substring-stripping heuristic with an exact mapping.
    pub fn parse(id: &str) -> Option<Section> {
        let stripped = id
            .strip_prefix("games")
            .or_else(|| id.strip_prefix("music"));
        for section in Section::ALL {
            if id == section.logical_id() {
                return Some(section);
            }
            if stripped == Some(section.prefixed_suffix()) {
                return Some(section);
            }
        }
        None
    }
}

/// Every concrete section id across all modes, used to hide non-targets
pub fn all_concrete_ids() -> Vec<String> {
    let mut ids = Vec::new();
    for section in Section::ALL {
        ids.push(section.logical_id().to_string());
    }
    for mode in [Mode::Games, Mode::Music] {
        for section in Section::ALL {
            if section != Section::Settings {
                ids.push(section.concrete_id(mode));
            }
        }
    }
    ids
}

/// Mode-specific side effects fired on section transitions. Replaces the
/// original's `typeof fn === 'function'` capability probing with an
/// interface the router depends on.
pub trait SectionHooks: Send + Sync {
    /// Stats section became visible; refresh aggregates
    fn stats_shown(&self) {}
    /// AI suggestions section became visible; refresh genre analysis
    /// and favorites
    fn ai_suggestions_shown(&self) {}
    /// Mode became active; reload that mode's collection
    fn mode_activated(&self) {}
}

/// Default hooks: log transitions so server-driven navigation is traceable
pub struct TracingHooks {
    mode: Mode,
}

impl TracingHooks {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl SectionHooks for TracingHooks {
    fn stats_shown(&self) {
        tracing::debug!(mode = %self.mode, "Stats section shown");
    }
    fn ai_suggestions_shown(&self) {
        tracing::debug!(mode = %self.mode, "AI suggestions section shown");
    }
    fn mode_activated(&self) {
        tracing::debug!(mode = %self.mode, "Mode activated");
    }
}

/// Result of a section transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Section actually shown
    pub section: Section,
    /// Concrete id of the shown section
    pub shown: String,
    /// Concrete ids to hide (everything else)
    pub hidden: Vec<String>,
    /// Logical name to persist as the last shown section, when applicable
    pub persist: Option<&'static str>,
}

/// Section router for one UI session
pub struct SectionRouter {
    mode: Mode,
    hooks: HashMap<Mode, Arc<dyn SectionHooks>>,
}

impl SectionRouter {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            hooks: HashMap::new(),
        }
    }

    /// Register the side-effect hooks for a mode
    pub fn register_hooks(&mut self, mode: Mode, hooks: Arc<dyn SectionHooks>) {
        self.hooks.insert(mode, hooks);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch the active mode and fire its activation hook
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if let Some(hooks) = self.hooks.get(&mode) {
            hooks.mode_activated();
        }
    }

    /// Show a section by any known id. Unknown ids fall back to Collection.
    pub fn show(&self, requested: &str) -> Transition {
        let section = Section::parse(requested).unwrap_or(Section::Collection);
        let shown = section.concrete_id(self.mode);
        let hidden = all_concrete_ids()
            .into_iter()
            .filter(|id| *id != shown)
            .collect();

        if let Some(hooks) = self.hooks.get(&self.mode) {
            match section {
                Section::Stats => hooks.stats_shown(),
                Section::AiSuggestions => hooks.ai_suggestions_shown(),
                _ => {}
            }
        }

        // Settings is mode-independent and not remembered
        let persist = (section != Section::Settings).then(|| section.logical_id());

        Transition {
            section,
            shown,
            hidden,
            persist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn collection_resolves_per_mode() {
        assert_eq!(
            Section::Collection.concrete_id(Mode::Games),
            "gamesCollectionSection"
        );
        assert_eq!(
            Section::Collection.concrete_id(Mode::Movies),
            "collectionSection"
        );
        assert_eq!(
            Section::Collection.concrete_id(Mode::Music),
            "musicCollectionSection"
        );
    }

    #[test]
    fn settings_is_mode_independent() {
        for mode in Mode::ALL {
            assert_eq!(Section::Settings.concrete_id(mode), "settingsSection");
        }
    }

    #[test]
    fn parse_accepts_logical_and_prefixed_ids() {
        assert_eq!(Section::parse("collectionSection"), Some(Section::Collection));
        assert_eq!(
            Section::parse("gamesCollectionSection"),
            Some(Section::Collection)
        );
        assert_eq!(Section::parse("musicStatsSection"), Some(Section::Stats));
        assert_eq!(Section::parse("nonsense"), None);
    }

    #[test]
    fn foreign_concrete_id_is_remapped_to_current_mode() {
        // A persisted Games id shown under Movies resolves to the plain id
        let router = SectionRouter::new(Mode::Movies);
        let t = router.show("gamesAddTitleSection");
        assert_eq!(t.shown, "addTitleSection");

        let router = SectionRouter::new(Mode::Games);
        let t = router.show("collectionSection");
        assert_eq!(t.shown, "gamesCollectionSection");
    }

    #[test]
    fn transition_hides_all_other_sections() {
        let router = SectionRouter::new(Mode::Games);
        let t = router.show("statsSection");
        assert_eq!(t.shown, "gamesStatsSection");
        assert!(!t.hidden.contains(&t.shown));
        // 5 movie sections + 4 games + 4 music, minus the shown one
        assert_eq!(t.hidden.len(), 12);
    }

    #[test]
    fn persisted_name_is_logical_and_skips_settings() {
        let router = SectionRouter::new(Mode::Music);
        assert_eq!(
            router.show("musicCollectionSection").persist,
            Some("collectionSection")
        );
        assert_eq!(router.show("settingsSection").persist, None);
    }

    #[test]
    fn unknown_section_falls_back_to_collection() {
        let router = SectionRouter::new(Mode::Movies);
        let t = router.show("doesNotExist");
        assert_eq!(t.section, Section::Collection);
    }

    struct CountingHooks {
        stats: AtomicUsize,
        ai: AtomicUsize,
    }

    impl SectionHooks for CountingHooks {
        fn stats_shown(&self) {
            self.stats.fetch_add(1, Ordering::SeqCst);
        }
        fn ai_suggestions_shown(&self) {
            self.ai.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn hooks_fire_only_for_their_mode_and_section() {
        let hooks = Arc::new(CountingHooks {
            stats: AtomicUsize::new(0),
            ai: AtomicUsize::new(0),
        });
        let mut router = SectionRouter::new(Mode::Games);
        router.register_hooks(Mode::Games, hooks.clone());

        router.show("statsSection");
        router.show("aiSuggestionsSection");
        router.show("collectionSection");
        assert_eq!(hooks.stats.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.ai.load(Ordering::SeqCst), 1);

        // Other modes have no registered hooks; nothing fires
        router.set_mode(Mode::Movies);
        router.show("statsSection");
        assert_eq!(hooks.stats.load(Ordering::SeqCst), 1);
    }
}
