//! Sample menu scene used by the binary and the integration tests
//!
//! Main menu with Inventory / Settings / Credits, an inventory with weapon,
//! grenade and potion tabs, and a settings page. Submenus and tab contents
//! anchor on the button that opens them, so a path to an item walks
//! through the clicks that reveal it.

use crate::core::config::ParentResolution;
use crate::core::types::{ControlId, ElementKind};
use crate::graph::element::NavigableElement;
use crate::graph::graph::{ElementGraph, SharedGraph};
use crate::scene::{SceneTree, SharedScene};
use parking_lot::Mutex;
use std::sync::Arc;

/// Observable effects of clicks in the demo scene
#[derive(Debug, Default, Clone)]
pub struct DemoState {
    pub open_menu: Option<String>,
    pub active_tab: Option<String>,
    pub selected_item: Option<String>,
    /// Every click, in order
    pub clicks: Vec<String>,
}

pub struct DemoScene {
    pub scene: SharedScene,
    pub graph: SharedGraph,
    pub state: Arc<Mutex<DemoState>>,
}

const WEAPONS: [&str; 3] = ["Laser Gun", "Plasma Rifle", "Combat Knife"];
const GRENADES: [&str; 3] = ["Smoke Grenade", "Frag Grenade", "Flashbang"];
const POTIONS: [&str; 2] = ["Health Potion", "Mana Potion"];

/// Lays out controls before the scene is shared
struct Builder {
    tree: SceneTree,
}

impl Builder {
    fn control(&mut self, container: Option<ControlId>, name: &str) -> ControlId {
        self.tree.add_control(name, container)
    }

    fn labelled(&mut self, container: ControlId, name: &str, label: &str) -> ControlId {
        let id = self.tree.add_child(container, name);
        self.tree.set_text(id, label);
        id
    }
}

impl DemoScene {
    pub fn build() -> Self {
        Self::build_with(ParentResolution::Live)
    }

    pub fn build_with(resolution: ParentResolution) -> Self {
        let state = Arc::new(Mutex::new(DemoState::default()));
        let mut b = Builder {
            tree: SceneTree::new(),
        };

        let canvas = b.control(None, "Canvas");
        let main_menu = b.control(Some(canvas), "MainMenu");
        let main_layer = b.control(Some(main_menu), "MainMenuLayer");

        let inventory_button = b.labelled(main_layer, "InventoryButton", "Inventory");
        let settings_button = b.labelled(main_layer, "SettingsButton", "Settings");
        let credits_button = b.labelled(main_layer, "CreditsButton", "Credits");

        let inventory = b.control(Some(main_menu), "InventoryMenu");
        let inventory_back = b.labelled(inventory, "BackButton", "Back");
        let tab_bar = b.control(Some(inventory), "InventoryTabs");

        let tab_specs: [(&str, &[&str]); 3] =
            [("Weapons", &WEAPONS), ("Grenades", &GRENADES), ("Potions", &POTIONS)];
        let mut tabs = Vec::new();
        for (tab_name, items) in tab_specs {
            let button = b.labelled(tab_bar, &format!("{}Tab", tab_name), tab_name);
            let content = b.control(Some(inventory), &format!("{}Content", tab_name));
            let slots: Vec<(ControlId, &str)> = items
                .iter()
                .map(|item| (b.labelled(content, &item.replace(' ', ""), item), *item))
                .collect();
            tabs.push((tab_name, button, content, slots));
        }

        let settings = b.control(Some(main_menu), "SettingsMenu");
        let settings_back = b.labelled(settings, "BackButton", "Back");
        let audio = b.control(Some(settings), "Audio");
        let mute_music = b.labelled(audio, "MuteMusic", "Mute Music");
        let mute_effects = b.labelled(audio, "MuteEffects", "Mute Sound Effects");
        let video = b.control(Some(settings), "Video");
        let fullscreen = b.labelled(video, "Fullscreen", "Fullscreen");

        let credits = b.control(Some(main_menu), "CreditsMenu");
        let credits_back = b.labelled(credits, "BackButton", "Back");

        for submenu in [inventory, settings, credits] {
            b.tree.set_active(submenu, false);
        }

        let scene = b.tree.shared();
        let mut elements = Vec::new();

        // Menus and containers
        elements.push(NavigableElement::new(main_menu, "MainMenu", ElementKind::Menu).with_label_text("Main Menu"));
        elements.push(
            NavigableElement::new(inventory, "InventoryMenu", ElementKind::Menu)
                .with_label_text("Inventory Menu")
                .with_context_anchor(inventory_button),
        );
        elements.push(
            NavigableElement::new(settings, "SettingsMenu", ElementKind::Menu)
                .with_label_text("Settings Menu")
                .with_context_anchor(settings_button),
        );
        elements.push(
            NavigableElement::new(credits, "CreditsMenu", ElementKind::Menu)
                .with_label_text("Credits Menu")
                .with_context_anchor(credits_button),
        );
        elements.push(NavigableElement::new(audio, "Audio", ElementKind::Context));
        elements.push(NavigableElement::new(video, "Video", ElementKind::Context));

        // Main menu buttons
        let submenus = [
            (inventory_button, "Inventory", inventory),
            (settings_button, "Settings", settings),
            (credits_button, "Credits", credits),
        ];
        for (button, label, menu) in submenus {
            let effect = open_menu(&scene, &state, main_layer, menu, label);
            elements.push(button_element(&scene, button, label).with_activation(effect));
        }
        for (button, menu) in [
            (inventory_back, inventory),
            (settings_back, settings),
            (credits_back, credits),
        ] {
            let effect = close_menu(&scene, &state, main_layer, menu);
            elements.push(button_element(&scene, button, "Back").with_activation(effect));
        }

        // Tabs and their contents
        let contents: Vec<ControlId> = tabs.iter().map(|(_, _, content, _)| *content).collect();
        for (tab_name, button, content, slots) in &tabs {
            let effect = select_tab(&scene, &state, &contents, *content, tab_name);
            elements.push(button_element(&scene, *button, tab_name).with_activation(effect));
            elements.push(
                NavigableElement::new(*content, format!("{}Content", tab_name), ElementKind::Context)
                    .with_label_text(*tab_name)
                    .with_context_anchor(*button),
            );
            for (slot, item) in slots {
                let effect = select_item(&state, item);
                elements.push(button_element(&scene, *slot, item).with_activation(effect));
            }
        }

        // Settings toggles
        for (control, label) in [
            (mute_music, "Mute Music"),
            (mute_effects, "Mute Sound Effects"),
            (fullscreen, "Fullscreen"),
        ] {
            let effect = record_click(&state, label);
            elements.push(button_element(&scene, control, label).with_activation(effect));
        }

        // Start on the first tab
        select_tab(&scene, &state, &contents, contents[0], "Weapons")();
        state.lock().clicks.clear();

        let mut graph = ElementGraph::with_resolution(scene.clone(), resolution);
        graph.register_all(elements);

        Self {
            scene,
            graph: graph.shared(),
            state,
        }
    }

    pub fn state(&self) -> DemoState {
        self.state.lock().clone()
    }

    /// Find a registered control by its label
    pub fn control_by_label(&self, label: &str) -> Option<ControlId> {
        self.graph
            .lock()
            .elements()
            .find(|e| e.label() == label)
            .map(|e| e.control())
    }
}

/// Button whose label comes from the scene's text component
fn button_element(scene: &SharedScene, control: ControlId, fallback: &str) -> NavigableElement {
    let tree = scene.read();
    let name = tree.name(control).unwrap_or(fallback).to_string();
    let element = NavigableElement::new(control, name, ElementKind::Button);
    match tree.text(control) {
        Some(text) => element.with_label_text(text),
        None => element,
    }
}

fn record_click(state: &Arc<Mutex<DemoState>>, label: &str) -> impl Fn() + Send + Sync + 'static {
    let state = state.clone();
    let label = label.to_string();
    move || state.lock().clicks.push(label.clone())
}

fn open_menu(
    scene: &SharedScene,
    state: &Arc<Mutex<DemoState>>,
    main_layer: ControlId,
    menu: ControlId,
    label: &str,
) -> impl Fn() + Send + Sync + 'static {
    let (scene, state, label) = (scene.clone(), state.clone(), label.to_string());
    move || {
        let mut tree = scene.write();
        tree.set_active(menu, true);
        tree.set_active(main_layer, false);
        let mut state = state.lock();
        state.open_menu = Some(label.clone());
        state.clicks.push(label.clone());
    }
}

fn close_menu(
    scene: &SharedScene,
    state: &Arc<Mutex<DemoState>>,
    main_layer: ControlId,
    menu: ControlId,
) -> impl Fn() + Send + Sync + 'static {
    let (scene, state) = (scene.clone(), state.clone());
    move || {
        let mut tree = scene.write();
        tree.set_active(menu, false);
        tree.set_active(main_layer, true);
        let mut state = state.lock();
        state.open_menu = None;
        state.clicks.push("Back".to_string());
    }
}

fn select_tab(
    scene: &SharedScene,
    state: &Arc<Mutex<DemoState>>,
    contents: &[ControlId],
    selected: ControlId,
    label: &str,
) -> impl Fn() + Send + Sync + 'static {
    let (scene, state, label) = (scene.clone(), state.clone(), label.to_string());
    let contents = contents.to_vec();
    move || {
        let mut tree = scene.write();
        for content in &contents {
            tree.set_active(*content, *content == selected);
        }
        let mut state = state.lock();
        state.active_tab = Some(label.clone());
        state.clicks.push(label.clone());
    }
}

fn select_item(state: &Arc<Mutex<DemoState>>, item: &str) -> impl Fn() + Send + Sync + 'static {
    let (state, item) = (state.clone(), item.to_string());
    move || {
        let mut state = state.lock();
        state.selected_item = Some(item.clone());
        state.clicks.push(item.clone());
    }
}
