mod answer_key;
mod board;
mod config;
mod error;
mod grading;
mod view;

use gloo::console;

use crate::config::{WidgetConfig, HOST_TAG};
use crate::view::{TaggingQuestion, TaggingQuestionProps};

fn main() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    let hosts = document.get_elements_by_tag_name(HOST_TAG);
    if hosts.length() == 0 {
        // No host markup on the page: render a single widget with defaults.
        yew::Renderer::<TaggingQuestion>::with_props(TaggingQuestionProps {
            config: WidgetConfig::default(),
        })
        .render();
        return;
    }

    // Collect first; the live collection is not safe to walk while mounting.
    let hosts: Vec<_> = (0..hosts.length()).filter_map(|i| hosts.item(i)).collect();
    for host in hosts {
        match WidgetConfig::from_element(&host) {
            Ok(config) => {
                yew::Renderer::<TaggingQuestion>::with_root_and_props(
                    host,
                    TaggingQuestionProps { config },
                )
                .render();
            }
            Err(err) => {
                console::error!("tagging question: invalid host attributes", err.to_string());
            }
        }
    }
}
