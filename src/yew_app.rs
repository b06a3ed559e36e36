use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use kyubu_core::{format_sequence, Move, RaceOutcome, RacePhase, ALL_MOVES};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use crate::app_core::{AppCore, AppSnapshot, SubmitError};
use crate::app_router::parse_race_length;
use crate::app_runtime;

#[derive(Properties)]
struct AppProps {
    core: Rc<AppCore>,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let app_core = props.core.clone();
    let app_snapshot = use_state_eq(|| app_core.snapshot());
    {
        let app_core = app_core.clone();
        let app_snapshot = app_snapshot.clone();
        use_effect_with((), move |_| {
            let app_core_for_cb = app_core.clone();
            let subscription = app_core.subscribe(Rc::new(move || {
                app_snapshot.set(app_core_for_cb.snapshot());
            }));
            move || drop(subscription)
        });
    }
    {
        let app_core = app_core.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                let options = EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                };
                EventListener::new_with_options(&window, "keydown", options, move |event: &Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if event.repeat() || !is_race_key(&event.key(), &event.code()) {
                        return;
                    }
                    if targets_text_field(event) {
                        return;
                    }
                    if app_core.race_key() {
                        event.prevent_default();
                    }
                })
            });
            move || drop(listener)
        });
    }

    let snapshot = (*app_snapshot).clone();
    html! {
        <div class="panel">
            <h1 class="panel-title">{ "kyubu" }</h1>
            <MovePad core={app_core.clone()} locked={snapshot.controls_locked} />
            <AlgorithmField core={app_core.clone()} locked={snapshot.controls_locked} />
            <CubeActions core={app_core.clone()} snapshot={snapshot.clone()} />
            <RecentMoves moves={snapshot.recent.clone()} />
            <p class="renderer-label">{ format!("Renderer: {}", snapshot.renderer_kind.label()) }</p>
            <RacePanel core={app_core} snapshot={snapshot} />
        </div>
    }
}

#[derive(Properties)]
struct LockedProps {
    core: Rc<AppCore>,
    locked: bool,
}

impl PartialEq for LockedProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core) && self.locked == other.locked
    }
}

#[function_component(MovePad)]
fn move_pad(props: &LockedProps) -> Html {
    let buttons = ALL_MOVES.iter().map(|mv| {
        let mv: Move = *mv;
        let core = props.core.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            core.submit_move(mv);
        });
        html! {
            <button class="move-button" disabled={props.locked} {onclick}>
                { mv.to_string() }
            </button>
        }
    });
    html! {
        <div class="move-pad">{ for buttons }</div>
    }
}

#[function_component(AlgorithmField)]
fn algorithm_field(props: &LockedProps) -> Html {
    let text = use_state(String::new);
    let error = use_state(|| None::<String>);
    let oninput = {
        let text = text.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            text.set(input.value());
        })
    };
    let onsubmit = {
        let core = props.core.clone();
        let text = text.clone();
        let error = error.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            match core.submit_algorithm(&text) {
                Ok(_) => {
                    text.set(String::new());
                    error.set(None);
                }
                // Locked keeps the typed text so it can be resubmitted.
                Err(SubmitError::Locked) => error.set(Some(SubmitError::Locked.to_string())),
                Err(err) => {
                    #[cfg(target_arch = "wasm32")]
                    gloo::console::warn!("algorithm rejected", err.to_string());
                    error.set(Some(err.to_string()));
                }
            }
        })
    };
    html! {
        <form class="algorithm" {onsubmit}>
            <input
                class="algorithm-input"
                type="text"
                placeholder="R U R' U'"
                value={(*text).clone()}
                disabled={props.locked}
                {oninput}
            />
            <button type="submit" disabled={props.locked}>{ "Run" }</button>
            if let Some(message) = (*error).clone() {
                <p class="algorithm-error">{ message }</p>
            }
        </form>
    }
}

#[derive(Properties)]
struct SnapshotProps {
    core: Rc<AppCore>,
    snapshot: AppSnapshot,
}

impl PartialEq for SnapshotProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core) && self.snapshot == other.snapshot
    }
}

#[function_component(CubeActions)]
fn cube_actions(props: &SnapshotProps) -> Html {
    let locked = props.snapshot.controls_locked;
    let on_scramble = {
        let core = props.core.clone();
        Callback::from(move |_: MouseEvent| {
            core.scramble();
        })
    };
    let on_resolve = {
        let core = props.core.clone();
        Callback::from(move |_: MouseEvent| core.resolve())
    };
    let on_reset = {
        let core = props.core.clone();
        Callback::from(move |_: MouseEvent| core.reset())
    };
    let history_len = props.snapshot.history_len;
    html! {
        <div class="cube-actions">
            <button disabled={locked} onclick={on_scramble}>{ "Scramble" }</button>
            <button disabled={locked || history_len == 0} onclick={on_resolve}>
                { format!("Resolve ({history_len})") }
            </button>
            <button onclick={on_reset}>{ "Reset" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct RecentMovesProps {
    moves: Vec<Move>,
}

#[function_component(RecentMoves)]
fn recent_moves(props: &RecentMovesProps) -> Html {
    let text = if props.moves.is_empty() {
        "-".to_string()
    } else {
        format_sequence(&props.moves)
    };
    html! {
        <div class="recent-moves">
            <span class="label">{ "Recent" }</span>
            <code>{ text }</code>
        </div>
    }
}

#[function_component(RacePanel)]
fn race_panel(props: &SnapshotProps) -> Html {
    let length = use_state(|| app_runtime::init_config().race_length.to_string());
    let error = use_state(|| None::<String>);
    let snapshot = &props.snapshot;
    let oninput = {
        let length = length.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            length.set(input.value());
        })
    };
    let on_start = {
        let core = props.core.clone();
        let length = length.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let started = parse_race_length(&length)
                .and_then(|parsed| core.start_race(parsed).map_err(|err| err.to_string()));
            match started {
                Ok(()) => error.set(None),
                Err(message) => error.set(Some(message)),
            }
        })
    };
    let on_try_again = {
        let core = props.core.clone();
        Callback::from(move |_: MouseEvent| core.try_again())
    };
    let sequence = format_sequence(&snapshot.race_sequence);
    let body = match snapshot.race_phase {
        RacePhase::Idle => html! {
            <>
                <label>
                    { "Moves " }
                    <input
                        class="race-length"
                        type="number"
                        min={snapshot.race_length_min.to_string()}
                        max={snapshot.race_length_max.to_string()}
                        value={(*length).clone()}
                        disabled={snapshot.controls_locked}
                        {oninput}
                    />
                </label>
                <button disabled={snapshot.controls_locked} onclick={on_start}>{ "Start race" }</button>
                if let Some(message) = (*error).clone() {
                    <p class="race-error">{ message }</p>
                }
            </>
        },
        RacePhase::Showing => html! {
            <>
                <p>{ "Watch the sequence..." }</p>
                <p class="race-sequence">{ "Sequence: " }<code>{ sequence.clone() }</code></p>
            </>
        },
        RacePhase::Ready => html! {
            <p>{ "Press Space to start the resolve." }</p>
        },
        RacePhase::Racing => html! {
            <p>{ "Press Space the moment you think it is solved!" }</p>
        },
        RacePhase::Finished(outcome) => {
            let verdict = match outcome {
                RaceOutcome::Win => "You beat the resolve!",
                RaceOutcome::Lose => "Too slow, the resolve finished first.",
            };
            html! {
                <>
                    <p class="race-verdict">{ verdict }</p>
                    <p class="race-sequence">{ "Sequence: " }<code>{ sequence }</code></p>
                    <button onclick={on_try_again}>{ "Try again" }</button>
                </>
            }
        }
    };
    html! {
        <section class="race">
            <h2>{ "Memory race" }</h2>
            { body }
        </section>
    }
}

fn is_race_key(key: &str, code: &str) -> bool {
    key == " " || code == "Space"
}

fn targets_text_field(event: &KeyboardEvent) -> bool {
    let Some(target) = event.target() else {
        return false;
    };
    if target.dyn_ref::<HtmlInputElement>().is_some() {
        return true;
    }
    target
        .dyn_ref::<HtmlElement>()
        .is_some_and(|element| element.is_content_editable())
}

pub(crate) fn run_panel(core: Rc<AppCore>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let Some(root) = document.get_element_by_id("panel-root") else {
        return;
    };
    let _app_handle = yew::Renderer::<App>::with_root_and_props(root, AppProps { core }).render();
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::app_router::InitConfig;
    use console_error_panic_hook::set_once as set_panic_hook;
    use kyubu_core::{CubeModel, STANDARD_CUBE_JSON};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn space_is_the_race_key() {
        assert!(is_race_key(" ", "Space"));
        assert!(is_race_key("Unidentified", "Space"));
        assert!(!is_race_key("Enter", "Enter"));
    }

    fn mount_root() -> web_sys::Element {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document");
        let root = document.create_element("div").expect("root");
        document
            .body()
            .expect("body")
            .append_child(&root)
            .expect("append root");
        root
    }

    fn app_core() -> Rc<AppCore> {
        let model = CubeModel::from_json(STANDARD_CUBE_JSON).expect("bundled asset");
        AppCore::new(Rc::new(model), &InitConfig::default())
    }

    #[wasm_bindgen_test]
    async fn panel_renders_move_buttons() {
        set_panic_hook();
        let root = mount_root();
        let core = app_core();
        let _handle = yew::Renderer::<App>::with_root_and_props(root.clone(), AppProps { core })
            .render();
        gloo::timers::future::TimeoutFuture::new(0).await;
        let buttons = root.query_selector_all(".move-button").expect("query");
        assert_eq!(buttons.length(), 18);
    }

    #[wasm_bindgen_test]
    async fn showing_race_lists_the_sequence() {
        set_panic_hook();
        let root = mount_root();
        let core = app_core();
        core.start_race(3).expect("idle race");
        let expected = format_sequence(&core.snapshot().race_sequence);
        assert!(!expected.is_empty());
        let _handle = yew::Renderer::<App>::with_root_and_props(
            root.clone(),
            AppProps { core: core.clone() },
        )
        .render();
        gloo::timers::future::TimeoutFuture::new(0).await;
        assert_eq!(core.snapshot().race_phase, RacePhase::Showing);
        let code = root
            .query_selector(".race-sequence code")
            .expect("query")
            .expect("sequence shown while the race plays back");
        assert_eq!(code.text_content().as_deref(), Some(expected.as_str()));
    }
}
