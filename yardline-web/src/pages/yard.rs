use yew::prelude::*;

use crate::components::{Notices, YardView};
use yardline_sim::YardSnapshot;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub snapshot: YardSnapshot,
    pub notices: Vec<String>,
}

#[function_component(YardPage)]
pub fn yard_page(p: &Props) -> Html {
    html! {
        <main id="main" class="page page-yard">
            <h2>{ "Depot Yard" }</h2>
            <YardView snapshot={p.snapshot.clone()} />
            <Notices notices={p.notices.clone()} />
        </main>
    }
}
