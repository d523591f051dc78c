use yew::prelude::*;

use crate::format::{format_progress, tier_class};
use yardline_sim::{HealthTier, TrainId};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: TrainId,
    pub tier: HealthTier,
    #[prop_or_default]
    pub progress: Option<f32>,
    #[prop_or_default]
    pub exiting: bool,
}

/// A single train rendered as a colored chip, with a progress bar while
/// its repair is running.
#[function_component(TrainChip)]
pub fn train_chip(p: &Props) -> Html {
    let mut class = classes!("train-chip", tier_class(p.tier));
    if p.exiting {
        class.push("train-chip-exiting");
    }
    html! {
        <span {class} data-train={p.id.to_string()}>
            <span class="train-chip-id">{ p.id.to_string() }</span>
            if let Some(progress) = p.progress {
                <span class="train-chip-progress">
                    <span
                        class="train-chip-progress-fill"
                        style={format!("width: {}", format_progress(progress))}
                    />
                    <span class="train-chip-progress-label">{ format_progress(progress) }</span>
                </span>
            }
            if p.exiting {
                <span class="train-chip-exit-label">{ "departing" }</span>
            }
        </span>
    }
}
