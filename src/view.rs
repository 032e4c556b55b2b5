use std::sync::atomic::{AtomicUsize, Ordering};

use gloo::console;
use rand::thread_rng;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, KeyboardEvent};
use yew::events::MouseEvent;
use yew::prelude::*;

use crate::answer_key::{fetch_answer_set, AnswerSet};
use crate::board::{Phase, Pool, TagBoard};
use crate::config::WidgetConfig;
use crate::grading::Grade;

static NEXT_WIDGET_ID: AtomicUsize = AtomicUsize::new(0);

/// Drag payload type scoped to one mounted widget, so chips never move
/// between widgets on the same page.
fn drag_format(widget_id: usize) -> String {
    format!("application/x-tagging-question-{widget_id}")
}

enum LoadState {
    Loading,
    Ready(AnswerSet),
    Failed,
}

#[derive(Properties, PartialEq)]
pub struct TaggingQuestionProps {
    pub config: WidgetConfig,
}

#[function_component(TaggingQuestion)]
pub fn tagging_question(props: &TaggingQuestionProps) -> Html {
    let config = &props.config;
    let load = use_state(|| LoadState::Loading);
    let board = use_state(|| Option::<TagBoard>::None);
    let grade = use_state(|| Option::<Grade>::None);
    let widget_id = *use_state(|| NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed));
    let drag_type = drag_format(widget_id);

    // Fetch the answer key once per mount (or when the config changes).
    {
        let load = load.clone();
        let board = board.clone();
        let grade = grade.clone();
        use_effect_with(config.clone(), move |config| {
            let config = config.clone();
            load.set(LoadState::Loading);
            board.set(None);
            grade.set(None);

            spawn_local(async move {
                match fetch_answer_set(&config.source, &config.answer_set).await {
                    Ok(set) => {
                        for dup in &set.duplicate_options {
                            console::warn!("tagging question: duplicate option dropped", dup.clone());
                        }
                        let mut rng = thread_rng();
                        board.set(Some(TagBoard::new(&set.options, &mut rng)));
                        console::log!(
                            "tagging question: loaded answer set",
                            set.name.clone(),
                            set.options.len()
                        );
                        load.set(LoadState::Ready(set));
                    }
                    Err(err) => {
                        console::error!("tagging question: error loading tags", err.to_string());
                        load.set(LoadState::Failed);
                    }
                }
            });
            || ()
        });
    }

    // Click / Enter on a chip
    let on_toggle = {
        let board = board.clone();
        Callback::from(move |tag: String| {
            let Some(mut next) = (*board).clone() else {
                return;
            };
            if next.toggle(&tag) {
                board.set(Some(next));
            }
        })
    };

    // Chip dropped on a pool container
    let on_drop = {
        let board = board.clone();
        Callback::from(move |(tag, destination): (String, Pool)| {
            let Some(mut next) = (*board).clone() else {
                return;
            };
            if next.drop_tag(&tag, destination) {
                board.set(Some(next));
            }
        })
    };

    let on_submit = {
        let load = load.clone();
        let board = board.clone();
        let grade = grade.clone();
        let policy = config.unmatched;
        Callback::from(move |_: MouseEvent| {
            let LoadState::Ready(answers) = &*load else {
                return;
            };
            let Some(mut next) = (*board).clone() else {
                return;
            };
            match next.submit(answers, policy) {
                Ok(result) => {
                    if result.celebrate() {
                        console::log!("tagging question: all answers correct");
                    }
                    grade.set(Some(result));
                    board.set(Some(next));
                }
                Err(err) => {
                    console::warn!("tagging question: submit ignored", err.to_string());
                }
            }
        })
    };

    let on_reset = {
        let board = board.clone();
        let grade = grade.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(mut next) = (*board).clone() else {
                return;
            };
            next.reset(&mut thread_rng());
            grade.set(None);
            board.set(Some(next));
        })
    };

    let ready = matches!(&*load, LoadState::Ready(_));
    let can_submit = ready && (*board).as_ref().map(TagBoard::can_submit).unwrap_or(false);
    let celebrate = (*grade).as_ref().map(Grade::celebrate).unwrap_or(false);
    let phase = match ((*board).as_ref(), &*load) {
        (Some(board), _) => match board.phase() {
            Phase::Loaded => "loaded",
            Phase::Answering => "answering",
            Phase::Submitted => "submitted",
        },
        (None, LoadState::Failed) => "failed",
        (None, _) => "loading",
    };

    html! {
        <confetti-container class="confetti" popped={celebrate.then_some("")}>
            <div class="tag-container" data-phase={phase} data-widget={widget_id.to_string()}>
                <div class="image-container">
                    <img class="image" src={config.image.clone()} alt={config.question.clone()} />
                </div>
                <div class="tag-question">
                    <p>{ &config.question }</p>
                </div>

                if matches!(&*load, LoadState::Loading) {
                    <p class="loading">{"Loading tags…"}</p>
                }

                { render_pool((*board).as_ref(), Pool::Available, (*grade).as_ref(), &drag_type, &on_toggle, &on_drop) }
                { render_pool((*board).as_ref(), Pool::Selected, (*grade).as_ref(), &drag_type, &on_toggle, &on_drop) }

                <div class="button-container">
                    <button id="submit-button" onclick={on_submit} disabled={!can_submit}>
                        {"Submit"}
                    </button>
                    <button id="reset-button" onclick={on_reset} disabled={!ready}>
                        {"Reset"}
                    </button>
                </div>

                if let Some(result) = &*grade {
                    { render_feedback(result) }
                }
            </div>
        </confetti-container>
    }
}

// --- Helper rendering functions -------------------------------------------------

fn render_pool(
    board: Option<&TagBoard>,
    pool: Pool,
    grade: Option<&Grade>,
    drag_format: &str,
    on_toggle: &Callback<String>,
    on_drop: &Callback<(String, Pool)>,
) -> Html {
    let (container_class, label) = match pool {
        Pool::Available => ("option-container", "Options"),
        Pool::Selected => ("answer-area", "Your tags"),
    };
    let tags = match (board, pool) {
        (Some(board), Pool::Available) => board.options(),
        (Some(board), Pool::Selected) => board.selected(),
        (None, _) => Vec::new(),
    };
    let locked = board.map(TagBoard::is_submitted).unwrap_or(true);

    let ondragover = Callback::from(|e: DragEvent| e.prevent_default());
    let ondrop = {
        let on_drop = on_drop.clone();
        let drag_format = drag_format.to_string();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            let Some(transfer) = e.data_transfer() else {
                return;
            };
            // Foreign payloads (other widgets, plain text) have no data under our format.
            if let Ok(tag) = transfer.get_data(&drag_format) {
                if !tag.is_empty() {
                    on_drop.emit((tag, pool));
                }
            }
        })
    };

    html! {
        <div class={classes!(container_class, locked.then_some("locked"))} {ondragover} {ondrop}>
            <span class="pool-label">{ label }</span>
            {
                for tags.into_iter().map(|tag| {
                    let verdict = grade.and_then(|g| g.feedback.iter().find(|f| f.tag == tag));
                    render_chip(tag, verdict.map(|f| f.correct), locked, drag_format, on_toggle)
                })
            }
        </div>
    }
}

fn render_chip(
    tag: String,
    verdict: Option<bool>,
    locked: bool,
    drag_format: &str,
    on_toggle: &Callback<String>,
) -> Html {
    let onclick = {
        let on_toggle = on_toggle.clone();
        let tag = tag.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(tag.clone()))
    };
    let onkeydown = {
        let on_toggle = on_toggle.clone();
        let tag = tag.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                e.prevent_default();
                on_toggle.emit(tag.clone());
            }
        })
    };
    let ondragstart = {
        let tag = tag.clone();
        let drag_format = drag_format.to_string();
        Callback::from(move |e: DragEvent| {
            let Some(transfer) = e.data_transfer() else {
                return;
            };
            if let Err(err) = transfer.set_data(&drag_format, &tag) {
                console::warn!("tagging question: could not start drag", tag.clone(), err);
            }
        })
    };
    let verdict_class = verdict.map(|correct| if correct { "correct" } else { "incorrect" });

    html! {
        <div
            class={classes!("tag-option", verdict_class)}
            tabindex="0"
            draggable={if locked { "false" } else { "true" }}
            {onclick}
            {onkeydown}
            {ondragstart}
        >
            { tag }
        </div>
    }
}

fn render_feedback(result: &Grade) -> Html {
    html! {
        <div class="feedback-container">
            <h2>{"Feedback"}</h2>
            {
                for result.feedback.iter().map(|entry| {
                    let class = if entry.correct { "correct" } else { "incorrect" };
                    html! {
                        <div class={classes!("feedback", class)}>
                            { format!("{}: {}", entry.tag, entry.message) }
                        </div>
                    }
                })
            }
        </div>
    }
}
