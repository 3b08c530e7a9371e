//! End-to-end tests on the demo menu scene
//!
//! The offline keyword resolver stands in for the language model, so these
//! cover the whole pipeline: flatten, resolve, validate, replay and the
//! effects the clicks have on the scene.

use std::fs;
use std::sync::Arc;
use voice_navigator::core::config::{NavigationConfig, NavigatorConfig, ParentResolution};
use voice_navigator::demo::DemoScene;
use voice_navigator::graph::NodeListWrapper;
use voice_navigator::llm::KeywordResolver;
use voice_navigator::navigation::Navigator;
use voice_navigator::ui::StatusView;

fn quiet_config() -> NavigationConfig {
    NavigationConfig {
        diagnostics_path: Default::default(),
        ..NavigationConfig::default()
    }
}

async fn run(demo: &DemoScene, utterance: &str) -> Navigator {
    let navigator = Navigator::new(demo.graph.clone(), Arc::new(KeywordResolver), quiet_config());
    navigator.submit(utterance);
    navigator.wait_idle().await;
    navigator
}

#[tokio::test(start_paused = true)]
async fn test_equip_laser_gun_clicks_through_menus() {
    let demo = DemoScene::build();
    let navigator = run(&demo, "equip the laser gun").await;

    let state = demo.state();
    assert_eq!(state.clicks, vec!["Inventory", "Weapons", "Laser Gun"]);
    assert_eq!(state.open_menu.as_deref(), Some("Inventory"));
    assert_eq!(state.selected_item.as_deref(), Some("Laser Gun"));

    let view = StatusView::from_status(&navigator.status());
    assert_eq!(view.label, "Laser Gun");
    assert!(view.result_visible);

    // The menu the clicks opened is now showing
    let tree = demo.scene.read();
    let menu = tree.find_by_name("InventoryMenu").unwrap();
    assert!(tree.is_active_in_hierarchy(menu));
}

#[tokio::test(start_paused = true)]
async fn test_settings_toggle_through_audio_group() {
    let demo = DemoScene::build();
    run(&demo, "mute the music").await;

    let state = demo.state();
    assert_eq!(state.clicks, vec!["Settings", "Mute Music"]);
    assert_eq!(state.open_menu.as_deref(), Some("Settings"));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_request_asks_for_clarification() {
    let demo = DemoScene::build();
    let navigator = run(&demo, "order a pizza").await;

    assert!(demo.state().clicks.is_empty());
    let status = navigator.status();
    assert_eq!(status.selected_label, "");
    assert!(status.selected_reason.contains("order a pizza"));
}

#[tokio::test(start_paused = true)]
async fn test_registration_time_parents_miss_late_anchor() {
    // Submenus register before the buttons that open them, so cached links
    // fall back to the containing menu and the opening click is lost
    let demo = DemoScene::build_with(ParentResolution::Registration);
    run(&demo, "equip the laser gun").await;
    assert_eq!(demo.state().clicks, vec!["Weapons", "Laser Gun"]);

    let live = DemoScene::build_with(ParentResolution::Live);
    run(&live, "equip the laser gun").await;
    assert_eq!(live.state().clicks, vec!["Inventory", "Weapons", "Laser Gun"]);
}

#[tokio::test(start_paused = true)]
async fn test_unregistered_panel_drops_out_of_requests() {
    let demo = DemoScene::build();
    let credits = demo.control_by_label("Credits Menu").unwrap();
    let before = demo.graph.lock().len();

    assert!(demo.graph.lock().unregister(credits));
    assert!(!demo.graph.lock().unregister(credits));
    assert_eq!(demo.graph.lock().len(), before - 1);

    let snapshot = demo.graph.lock().flatten();
    assert!(snapshot.nodes().iter().all(|n| n.name != "Credits Menu"));
}

#[tokio::test(start_paused = true)]
async fn test_request_writes_navigation_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Logs").join("ActiveMap.json");
    let config = NavigationConfig {
        diagnostics_path: path.clone(),
        ..NavigationConfig::default()
    };

    let demo = DemoScene::build();
    let navigator = Navigator::new(demo.graph.clone(), Arc::new(KeywordResolver), config);
    navigator.submit("frag grenade");
    navigator.wait_idle().await;

    let dump: NodeListWrapper = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(dump.nodes.len(), demo.graph.lock().len());
    assert!(dump.nodes.iter().any(|n| n.name == "Frag Grenade"));
    assert_eq!(demo.state().selected_item.as_deref(), Some("Frag Grenade"));
}

#[test]
fn test_config_file_drives_navigation_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("navigator.toml");
    fs::write(
        &path,
        r#"
        [navigation]
        step_delay_ms = 250
        pulse_decay_ms = 750
        parent_resolution = "registration"
        diagnostics_path = ""

        [llm]
        api_url = "https://api.anthropic.com/v1/messages"
        api_key_env = "VOICE_NAVIGATOR_TEST_KEY"
        "#,
    )
    .unwrap();

    let config = NavigatorConfig::load(&path).unwrap();
    assert_eq!(config.navigation.step_delay().as_millis(), 250);
    assert_eq!(config.navigation.pulse_decay().as_millis(), 750);
    assert_eq!(config.navigation.parent_resolution, ParentResolution::Registration);
    assert!(config.navigation.diagnostics_path().is_none());
    assert_eq!(config.llm.api_key_env, "VOICE_NAVIGATOR_TEST_KEY");
}
