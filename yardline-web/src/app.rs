//! Application shell: shared state, timer wiring, and routing.
//!
//! All simulation mutation happens inside interval callbacks on the single
//! browser thread; components only ever see immutable snapshots.

use yew::prelude::*;

use yardline_sim::{Recommendation, StatusRecord, YardSnapshot};

#[cfg(target_arch = "wasm32")]
use {
    crate::backend,
    crate::components::Header,
    crate::format::notice_text,
    crate::pages::{PlanPage, YardPage},
    crate::router::Route,
    gloo::timers::callback::Interval,
    std::cell::RefCell,
    std::rc::Rc,
    wasm_bindgen_futures::spawn_local,
    yardline_sim::{SimNow, SimTuning, YardSim},
    yew_router::prelude::*,
};

/// Most recent notifications kept visible.
pub const MAX_NOTICES: usize = 8;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: UseStateHandle<YardSnapshot>,
    pub status: UseStateHandle<Vec<StatusRecord>>,
    pub recommendations: UseStateHandle<Vec<Recommendation>>,
    pub notices: UseStateHandle<Vec<String>>,
    pub backend_live: UseStateHandle<bool>,
}

#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        snapshot: use_state(YardSnapshot::default),
        status: use_state(Vec::new),
        recommendations: use_state(Vec::new),
        notices: use_state(Vec::new),
        backend_live: use_state(|| false),
    }
}

#[cfg(target_arch = "wasm32")]
fn wall_now() -> SimNow {
    SimNow::from_millis(js_sys::Date::now() as u64)
}

/// Push the current snapshot and any drained events out to the UI. The
/// notice buffer lives outside hook state so interval closures always see
/// the latest history.
#[cfg(target_arch = "wasm32")]
fn publish(state: &AppState, notice_buffer: &Rc<RefCell<Vec<String>>>, sim: &mut YardSim) {
    let events = sim.take_events();
    if !events.is_empty() {
        let mut buffer = notice_buffer.borrow_mut();
        for event in &events {
            buffer.insert(0, notice_text(event));
        }
        buffer.truncate(MAX_NOTICES);
        state.notices.set(buffer.clone());
    }
    state.snapshot.set(sim.snapshot(wall_now()));
}

/// Install the simulation timers: fitness clock, movement check, healing
/// progress, cycle trigger, and the backend status poll.
#[cfg(target_arch = "wasm32")]
#[hook]
fn use_sim_timers(state: &AppState, sim: &Rc<RefCell<YardSim>>) {
    let state = state.clone();
    let sim = sim.clone();
    let notice_buffer = use_mut_ref(Vec::new);
    use_effect_with((), move |_| {
        // First load comes from the embedded provider so the yard fills
        // immediately; the HTTP poll takes over when a backend answers.
        let (status, recommendations) = backend::embedded_feed();
        sim.borrow_mut().refresh(&status, &recommendations);
        state.status.set(status);
        state.recommendations.set(recommendations);
        publish(&state, &notice_buffer, &mut sim.borrow_mut());

        let tuning: SimTuning = sim.borrow().tuning().clone();
        let clock = {
            let sim = sim.clone();
            Interval::new(tuning.clock_tick_ms as u32, move || {
                sim.borrow_mut().tick_clock(wall_now());
            })
        };
        let movement = {
            let sim = sim.clone();
            let state = state.clone();
            let notice_buffer = notice_buffer.clone();
            Interval::new(tuning.movement_poll_ms as u32, move || {
                let mut sim = sim.borrow_mut();
                sim.poll_movement(wall_now());
                publish(&state, &notice_buffer, &mut sim);
            })
        };
        let progress = {
            let sim = sim.clone();
            let state = state.clone();
            let notice_buffer = notice_buffer.clone();
            Interval::new(tuning.progress_poll_ms as u32, move || {
                let mut sim = sim.borrow_mut();
                sim.poll_progress(wall_now());
                publish(&state, &notice_buffer, &mut sim);
            })
        };
        let cycle = {
            let sim = sim.clone();
            Interval::new(tuning.cycle_trigger_ms as u32, move || {
                sim.borrow_mut().trigger_cycle(wall_now());
            })
        };
        let status_poll = {
            let sim = sim.clone();
            let state = state.clone();
            Interval::new(tuning.status_poll_ms as u32, move || {
                let sim = sim.clone();
                let state = state.clone();
                spawn_local(async move {
                    match backend::fetch_live_feed().await {
                        Ok((status, recommendations)) => {
                            sim.borrow_mut().refresh(&status, &recommendations);
                            state.status.set(status);
                            state.recommendations.set(recommendations);
                            state.backend_live.set(true);
                        }
                        Err(err) => {
                            log::warn!("backend poll failed, keeping last data: {err}");
                            state.backend_live.set(false);
                        }
                    }
                });
            })
        };

        move || {
            drop(clock);
            drop(movement);
            drop(progress);
            drop(cycle);
            drop(status_poll);
        }
    });
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <AppInner />
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let state = use_app_state();
    let sim = use_mut_ref(|| YardSim::new(SimTuning::default()));
    use_sim_timers(&state, &sim);

    let render = {
        let state = state.clone();
        move |route: Route| match route {
            Route::Yard | Route::NotFound => html! {
                <YardPage
                    snapshot={(*state.snapshot).clone()}
                    notices={(*state.notices).clone()}
                />
            },
            Route::Plan => html! {
                <PlanPage
                    status={(*state.status).clone()}
                    recommendations={(*state.recommendations).clone()}
                />
            },
        }
    };

    html! {
        <>
            <Header backend_live={*state.backend_live} />
            <Switch<Route> render={render} />
        </>
    }
}
