use yew::prelude::*;

use crate::components::TrainChip;
use crate::format::format_days;
use yardline_sim::{Location, TrackView, TrainView, YardSnapshot};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub snapshot: YardSnapshot,
}

fn train_view<'a>(snapshot: &'a YardSnapshot, id: &yardline_sim::TrainId) -> Option<&'a TrainView> {
    snapshot.train(id)
}

fn slot(snapshot: &YardSnapshot, occupant: Option<&yardline_sim::TrainId>, label: &str) -> Html {
    let inner = occupant
        .and_then(|id| train_view(snapshot, id))
        .map_or_else(
            || html! { <span class="slot-empty">{ "-" }</span> },
            |view| {
                html! {
                    <TrainChip
                        id={view.id.clone()}
                        tier={view.tier}
                        progress={view.healing_progress}
                        exiting={view.exiting}
                    />
                }
            },
        );
    html! {
        <div class={classes!("yard-slot", format!("yard-slot-{label}"))}>
            <span class="yard-slot-label">{ label.to_string() }</span>
            { inner }
        </div>
    }
}

fn track_row(snapshot: &YardSnapshot, track: &TrackView) -> Html {
    html! {
        <div class="yard-track" key={track.id.to_string()}>
            <span class="yard-track-name">{ track.id.to_string() }</span>
            { slot(snapshot, track.staged.as_ref(), "next") }
            { slot(snapshot, track.repair.as_ref(), "repair") }
        </div>
    }
}

fn lane(snapshot: &YardSnapshot, title: &str, trains: Vec<&TrainView>) -> Html {
    html! {
        <section class="yard-lane">
            <h3>{ title.to_string() }</h3>
            if trains.is_empty() {
                <p class="yard-lane-empty">{ "Empty" }</p>
            } else {
                <ul>
                    { for trains.into_iter().map(|view| html! {
                        <li key={view.id.to_string()}>
                            <TrainChip id={view.id.clone()} tier={view.tier} />
                            <span class="yard-lane-days">{ format_days(view.days_to_service) }</span>
                        </li>
                    }) }
                </ul>
            }
        </section>
    }
}

/// The depot yard: four tracks with staged and repair slots, the waiting
/// queue, and the trains currently out in service.
#[function_component(YardView)]
pub fn yard_view(p: &Props) -> Html {
    let snapshot = &p.snapshot;
    let queued: Vec<&TrainView> = snapshot
        .waiting
        .iter()
        .filter_map(|id| train_view(snapshot, id))
        .collect();
    let in_service: Vec<&TrainView> = snapshot
        .trains
        .iter()
        .filter(|view| view.location == Location::InService)
        .collect();
    let re_entry: Vec<&TrainView> = snapshot
        .trains
        .iter()
        .filter(|view| view.location == Location::ReEntry)
        .collect();

    html! {
        <div class="yard-view">
            <div class="yard-tracks">
                { for snapshot.tracks.iter().map(|track| track_row(snapshot, track)) }
            </div>
            { lane(snapshot, "Waiting queue", queued) }
            { lane(snapshot, "Out in service", in_service) }
            if !re_entry.is_empty() {
                { lane(snapshot, "Awaiting re-entry", re_entry) }
            }
        </div>
    }
}
