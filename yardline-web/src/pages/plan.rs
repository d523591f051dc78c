use yew::prelude::*;

use crate::components::{PlanTable, StatusTable};
use yardline_sim::{Recommendation, StatusRecord};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub status: Vec<StatusRecord>,
    pub recommendations: Vec<Recommendation>,
}

#[function_component(PlanPage)]
pub fn plan_page(p: &Props) -> Html {
    html! {
        <main id="main" class="page page-plan">
            <h2>{ "Induction Plan" }</h2>
            <PlanTable recommendations={p.recommendations.clone()} />
            <h2>{ "Fleet Status" }</h2>
            <StatusTable status={p.status.clone()} />
        </main>
    }
}
