//! Tests for the settings aggregator.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use spyx_missions::{
    Attribution, Avatar, GameSettings, KeyValueStore, MemoryStore, MockUniverseProvider, Player,
    PlayerId, ProviderError, SettingsAggregator, SettingsError, StoreKey, TimeLimit, Universe,
    UniverseProvider, UniversesResponse, World, records,
};

fn world(name: &str, short_name: &str, genre: &str) -> World {
    World::new(name, short_name, genre, Attribution::Studio("Test".to_string()))
}

fn universes() -> Vec<Universe> {
    vec![
        Universe::new(
            "Movie",
            vec![
                world("Star Wars", "SW", "Sci-Fi"),
                world("Alien", "AL", "Horror"),
                world("Dune", "DU", "Sci-Fi"),
            ],
        ),
        Universe::new(
            "Game",
            vec![
                world("Hollow Knight", "HK", "Metroidvania"),
                world("Portal", "PO", "Puzzle"),
            ],
        ),
    ]
}

fn roster(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(PlayerId::new(*name), *name, Avatar::Owl, i))
        .collect()
}

async fn setup(store: Arc<MemoryStore>) -> SettingsAggregator {
    let provider = Arc::new(MockUniverseProvider::from_universes(universes()));
    SettingsAggregator::load(provider, store)
        .await
        .expect("Load failed")
}

fn stored(store: &MemoryStore) -> Option<GameSettings> {
    records::load(store, StoreKey::GameSettings).expect("Read failed")
}

#[derive(Debug)]
struct FailingProvider;

#[async_trait::async_trait]
impl UniverseProvider for FailingProvider {
    async fn get_universes(&self) -> Result<UniversesResponse, ProviderError> {
        Err(ProviderError::new("offline"))
    }

    async fn get_worlds_by_universe(&self, _universe: &str) -> Result<Vec<World>, ProviderError> {
        Err(ProviderError::new("offline"))
    }
}

#[tokio::test]
async fn test_load_without_record_uses_defaults() {
    let store = Arc::new(MemoryStore::new());
    let settings = setup(store.clone()).await;

    assert_eq!(settings.universes().len(), 2);
    assert!(settings.selected_universe().is_none());
    assert_eq!(settings.time_limit().seconds(), TimeLimit::DEFAULT);
    assert!(*settings.show_vote_count());
    assert!(*settings.show_actual_spy());
    assert!(settings.current().is_none());
    assert!(store.is_empty().expect("Failed to count"), "Nothing is stored until a universe is chosen");
}

#[tokio::test]
async fn test_load_failure_reports_error() {
    let store = Arc::new(MemoryStore::new());
    let result = SettingsAggregator::load(Arc::new(FailingProvider), store).await;
    assert!(matches!(result, Err(SettingsError::Load(_))));
}

#[tokio::test]
async fn test_load_drops_unknown_stored_worlds_and_genres() {
    let store = Arc::new(MemoryStore::new());
    let record = GameSettings::new(
        "Movie",
        vec!["SW".to_string(), "GONE".to_string()],
        TimeLimit::new(120),
        vec!["Horror".to_string(), "Western".to_string()],
        false,
        true,
    );
    records::save(&*store, StoreKey::GameSettings, &record).expect("Save failed");

    let settings = setup(store).await;
    assert_eq!(settings.selected_universe().as_deref(), Some("Movie"));
    assert_eq!(settings.available_worlds(), &vec!["SW".to_string()]);
    assert_eq!(settings.selected_genres(), &vec!["Horror".to_string()]);
    assert_eq!(settings.time_limit().seconds(), 120);
    assert!(!*settings.show_vote_count());
}

#[tokio::test]
async fn test_load_snaps_off_grid_time_limit() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(
            StoreKey::GameSettings.as_ref(),
            r#"{"universe":"Movie","availableWorlds":["SW"],"timeLimit":45}"#.to_string(),
        )
        .expect("Set failed");

    let mut settings = setup(store.clone()).await;
    assert_eq!(settings.time_limit().seconds(), 60);

    let limit = settings.adjust_time_limit(true);
    assert_eq!(limit.seconds(), 90);
    assert_eq!(
        stored(&store).expect("Nothing stored").time_limit().seconds(),
        90
    );
}

#[tokio::test]
async fn test_load_clears_vanished_universe() {
    let store = Arc::new(MemoryStore::new());
    let record = GameSettings::new("Anime", vec![], TimeLimit::new(60), vec![], true, false);
    records::save(&*store, StoreKey::GameSettings, &record).expect("Save failed");

    let settings = setup(store).await;
    assert!(settings.selected_universe().is_none());
    assert_eq!(settings.time_limit().seconds(), 60);
    assert!(!*settings.show_actual_spy());
}

#[tokio::test]
async fn test_load_ignores_corrupt_record() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(StoreKey::GameSettings.as_ref(), "{not json".to_string())
        .expect("Set failed");
    let settings = setup(store).await;
    assert!(settings.selected_universe().is_none());
}

#[tokio::test]
async fn test_select_universe_enables_every_world_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;

    settings.select_universe("Movie").expect("Select failed");
    assert_eq!(settings.available_worlds().len(), 3);
    assert!(settings.selected_genres().is_empty());

    let record = stored(&store).expect("Nothing stored");
    assert_eq!(record.universe(), "Movie");
    assert_eq!(record.available_worlds().len(), 3);
}

#[tokio::test]
async fn test_select_unknown_universe_fails() {
    let mut settings = setup(Arc::new(MemoryStore::new())).await;
    let result = settings.select_universe("Anime");
    assert!(matches!(result, Err(SettingsError::UnknownUniverse { .. })));
    assert!(settings.selected_universe().is_none());
}

#[tokio::test]
async fn test_switching_universe_resets_worlds() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;
    settings.select_universe("Movie").expect("Select failed");
    settings.toggle_world("AL").expect("Toggle failed");
    settings.toggle_genre("Sci-Fi").expect("Toggle failed");

    settings.select_universe("Game").expect("Select failed");
    assert_eq!(
        settings.available_worlds(),
        &vec!["HK".to_string(), "PO".to_string()]
    );
    assert!(settings.selected_genres().is_empty());
}

#[tokio::test]
async fn test_selecting_stored_universe_reuses_its_worlds() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;

    let record = GameSettings::new(
        "Movie",
        vec!["DU".to_string()],
        TimeLimit::default(),
        vec!["Horror".to_string()],
        true,
        true,
    );
    records::save(&*store, StoreKey::GameSettings, &record).expect("Save failed");

    settings.select_universe("Movie").expect("Select failed");
    assert_eq!(settings.available_worlds(), &vec!["DU".to_string()]);
    assert_eq!(settings.selected_genres(), &vec!["Horror".to_string()]);
}

#[tokio::test]
async fn test_toggle_world_round_trips() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;
    settings.select_universe("Movie").expect("Select failed");

    assert!(!settings.toggle_world("SW").expect("Toggle failed"));
    assert!(!settings.is_world_available("SW"));
    assert!(
        !stored(&store)
            .expect("Nothing stored")
            .available_worlds()
            .contains(&"SW".to_string())
    );

    assert!(settings.toggle_world("SW").expect("Toggle failed"));
    assert!(settings.is_world_available("SW"));
}

#[tokio::test]
async fn test_toggle_requires_universe_and_known_names() {
    let mut settings = setup(Arc::new(MemoryStore::new())).await;
    assert!(matches!(
        settings.toggle_world("SW"),
        Err(SettingsError::NoUniverseSelected)
    ));

    settings.select_universe("Movie").expect("Select failed");
    assert!(matches!(
        settings.toggle_world("HK"),
        Err(SettingsError::UnknownWorld { .. })
    ));
    assert!(matches!(
        settings.toggle_genre("Puzzle"),
        Err(SettingsError::UnknownGenre { .. })
    ));
}

#[tokio::test]
async fn test_genre_filter_hides_worlds() {
    let mut settings = setup(Arc::new(MemoryStore::new())).await;
    settings.select_universe("Movie").expect("Select failed");
    assert_eq!(settings.genres(), vec!["Sci-Fi".to_string(), "Horror".to_string()]);

    assert!(settings.toggle_genre("Sci-Fi").expect("Toggle failed"));
    assert!(settings.is_genre_excluded("Sci-Fi"));
    let visible: Vec<&str> = settings
        .visible_worlds()
        .iter()
        .map(|w| w.short_name().as_str())
        .collect();
    assert_eq!(visible, vec!["AL"]);
    // Hidden worlds stay switched on.
    assert!(settings.is_world_available("SW"));
}

#[tokio::test]
async fn test_time_limit_steps_and_clamps() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;
    settings.select_universe("Movie").expect("Select failed");

    let limit = settings.adjust_time_limit(true);
    assert_eq!(limit.seconds(), 330);
    assert_eq!(limit.to_string(), "5:30");
    settings.adjust_time_limit(true);
    let limit = settings.adjust_time_limit(true);
    assert_eq!(limit.to_string(), "6:30");
    assert_eq!(
        stored(&store).expect("Nothing stored").time_limit().seconds(),
        390
    );

    for _ in 0..30 {
        settings.adjust_time_limit(false);
    }
    assert_eq!(settings.time_limit().seconds(), TimeLimit::MIN);
    for _ in 0..30 {
        settings.adjust_time_limit(true);
    }
    assert_eq!(settings.time_limit().seconds(), TimeLimit::MAX);
}

#[tokio::test]
async fn test_display_toggles_persist() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;
    settings.select_universe("Game").expect("Select failed");

    assert!(!settings.toggle_show_vote_count());
    assert!(!settings.toggle_show_actual_spy());
    let record = stored(&store).expect("Nothing stored");
    assert!(!*record.show_vote_count());
    assert!(!*record.show_actual_spy());
}

#[tokio::test]
async fn test_start_game_checks_preconditions() {
    let mut settings = setup(Arc::new(MemoryStore::new())).await;
    let mut rng = StdRng::seed_from_u64(7);
    let players = roster(&["A", "B", "C"]);

    assert!(matches!(
        settings.start_game(&players, &mut rng),
        Err(SettingsError::NoUniverseSelected)
    ));

    settings.select_universe("Game").expect("Select failed");
    assert!(matches!(
        settings.start_game(&roster(&["A"]), &mut rng),
        Err(SettingsError::NotEnoughPlayers {
            required: 2,
            actual: 1
        })
    ));

    settings.toggle_genre("Puzzle").expect("Toggle failed");
    settings.toggle_genre("Metroidvania").expect("Toggle failed");
    assert!(matches!(
        settings.start_game(&players, &mut rng),
        Err(SettingsError::NoPlayableWorld)
    ));

    settings.toggle_world("HK").expect("Toggle failed");
    settings.toggle_world("PO").expect("Toggle failed");
    assert!(matches!(
        settings.start_game(&players, &mut rng),
        Err(SettingsError::NoWorldsAvailable)
    ));
}

#[tokio::test]
async fn test_start_game_stores_round_setup() {
    let store = Arc::new(MemoryStore::new());
    let mut settings = setup(store.clone()).await;
    settings.select_universe("Movie").expect("Select failed");
    settings.toggle_world("SW").expect("Toggle failed");
    settings.toggle_genre("Horror").expect("Toggle failed");
    let players = roster(&["A", "B", "C"]);

    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = settings
            .start_game(&players, &mut rng)
            .expect("Start failed");
        assert!(players.contains(start.spy()), "Seed {} drew an outsider", seed);
        assert_eq!(start.world().short_name(), "DU");
    }

    let mut rng = StdRng::seed_from_u64(42);
    let start = settings
        .start_game(&players, &mut rng)
        .expect("Start failed");

    // SW is switched off and AL is filtered, so only Dune can be drawn.
    assert_eq!(start.world().short_name(), "DU");

    let spy: Player = records::load(&*store, StoreKey::SelectedPlayer)
        .expect("Read failed")
        .expect("No spy stored");
    assert_eq!(&spy, start.spy());
    let world: String = records::load(&*store, StoreKey::SelectedWorld)
        .expect("Read failed")
        .expect("No world stored");
    assert_eq!(world, "Dune");
    assert_eq!(stored(&store).as_ref(), Some(start.settings()));
}
