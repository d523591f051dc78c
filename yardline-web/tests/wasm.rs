#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use yardline_sim::{SimNow, SimTuning, YardSim};
use yardline_web::backend::embedded_feed;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn embedded_feed_fills_the_yard() {
    let (status, recommendations) = embedded_feed();
    assert_eq!(status.len(), 10);

    let mut sim = YardSim::new(SimTuning::default());
    sim.refresh(&status, &recommendations);
    let snapshot = sim.snapshot(SimNow::from_millis(0));
    assert_eq!(snapshot.trains.len(), 10);
    assert_eq!(snapshot.tracks.len(), 4);
    assert!(snapshot.tracks.iter().all(|track| track.repair.is_some()));
}
