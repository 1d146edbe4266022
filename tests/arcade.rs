//! End-to-end runs through the public API: input in, persisted results out

use calm_arcade::arcade::{ActiveGame, Arcade};
use calm_arcade::persistence::{CheckIn, KeyValueStore, MemoryStore, Streak};
use calm_arcade::platform::{GameChoice, InputEvent, map_key};
use calm_arcade::renderer::{Hud, Palette, RenderSink, TextSink, scene_shapes};
use calm_arcade::sim::{FlightSession, FrameClock, GamePhase, TickInput, tick};
use calm_arcade::{GameKind, HighScores, Settings};

/// Play a flight session with a fixed flap cadence and return its trace
fn flight_trace(seed: u64) -> Vec<(f32, f32, u64)> {
    let mut session = FlightSession::new(seed, Settings::default().runner);
    let mut trace = Vec::new();
    for step in 0..400 {
        let input = TickInput {
            impulse: step % 22 == 0,
            restart: false,
        };
        tick(&mut session, &input, calm_arcade::consts::SIM_DT);
        let gap = session.obstacles.first().map_or(0.0, |o| o.gap_top);
        trace.push((session.body.pos.y, gap, session.score));
    }
    trace
}

#[test]
fn same_seed_same_run() {
    assert_eq!(flight_trace(77), flight_trace(77));
}

#[test]
fn finished_run_lands_in_persisted_leaderboard() {
    let mut store = MemoryStore::new();
    let settings = Settings::default();
    let mut arcade = Arcade::new(GameChoice::Flappy, 9, &settings).unwrap();
    let mut board = HighScores::load(&store, GameKind::Flappy);
    assert!(board.is_empty());

    arcade.handle(InputEvent::Impulse);
    let mut clock = FrameClock::new();
    let mut ended = None;
    let mut time = 0.0;
    while ended.is_none() && time < 60_000.0 {
        time += 1000.0 / 60.0;
        let steps = clock.frame(time);
        ended = arcade.update(steps);
    }
    let run = ended.expect("an unattended run must crash");
    assert_eq!(run.game, GameKind::Flappy);
    assert_eq!(arcade.phase(), GamePhase::Over);

    // A crash without passing anything scores zero and does not qualify
    assert_eq!(board.add_score(run.score, 1.0), None);
    board.add_score(12, 2.0);
    board.save(&mut store, GameKind::Flappy).unwrap();

    let reloaded = HighScores::load(&store, GameKind::Flappy);
    assert_eq!(reloaded.top_score(), Some(12));
    assert!(HighScores::load(&store, GameKind::Snake).is_empty());
}

#[test]
fn keyboard_drives_snake_into_wall() {
    let settings = Settings::default();
    let mut arcade = Arcade::new(GameChoice::Snake, 4, &settings).unwrap();
    // First turn starts the game; Up is the initial heading so use Left
    arcade.handle(map_key("ArrowLeft").unwrap());
    assert_eq!(arcade.phase(), GamePhase::Running);

    let mut ended = None;
    for _ in 0..(60 * 10) {
        if let Some(run) = arcade.update(1) {
            ended = Some(run);
            break;
        }
    }
    let run = ended.expect("snake heading left must reach the wall");
    assert_eq!(run.game, GameKind::Snake);
    assert_eq!(run.score % 10, 0);

    // Restart from the keyboard returns to the start screen
    arcade.handle(map_key("r").unwrap());
    assert_eq!(arcade.phase(), GamePhase::Idle);
    assert_eq!(arcade.score(), 0);
}

#[test]
fn memory_round_via_taps() {
    let settings = Settings::default();
    let mut arcade = Arcade::new(GameChoice::Memory, 21, &settings).unwrap();
    arcade.handle(InputEvent::Impulse);
    // Watch the one-tile playback
    arcade.update(70);
    let first = match &arcade.game {
        ActiveGame::Memory(m) => m.sequence[0],
        _ => unreachable!(),
    };
    assert_eq!(arcade.handle(InputEvent::Tap(first)), None);
    assert_eq!(arcade.score(), 60);
    assert_eq!(arcade.phase(), GamePhase::Running);
}

#[test]
fn settings_and_streak_share_one_store() {
    let mut store = MemoryStore::new();
    let mut settings = Settings::default();
    settings.high_contrast = true;
    settings.save(&mut store).unwrap();

    let mut streak = Streak::load(&store);
    assert_eq!(streak.check_in(20_000), CheckIn::First);
    streak.save(&mut store).unwrap();

    assert_eq!(store.len(), 2);
    assert!(Settings::load(&store).high_contrast);

    let mut streak = Streak::load(&store);
    assert_eq!(streak.check_in(20_000), CheckIn::AlreadyToday);
    assert_eq!(streak.check_in(20_001), CheckIn::Continued);
    assert_eq!(streak.current, 2);

    // Corrupt records fall back instead of failing
    store.set(Streak::STORAGE_KEY, "{not json").unwrap();
    assert_eq!(Streak::load(&store), Streak::default());
}

#[test]
fn every_game_renders_a_text_frame() {
    let settings = Settings::default();
    let palette = Palette::calm();
    for choice in [
        GameChoice::Flappy,
        GameChoice::Runner,
        GameChoice::Maze,
        GameChoice::Snake,
        GameChoice::Memory,
    ] {
        let arcade = Arcade::new(choice, 5, &settings).unwrap();
        let hud = Hud {
            score: arcade.score(),
            high_score: Some(3),
            fps: None,
            phase: arcade.phase(),
            reduced_motion: false,
        };
        let mut sink = TextSink::new(30, 40, &palette);
        sink.render(&scene_shapes(&arcade.scene(), &hud, &palette))
            .unwrap();
        let out = sink.output();
        assert_eq!(out.lines().count(), 40 + 3, "{choice:?}");
        assert!(out.contains("Best: 3"));
    }
}
