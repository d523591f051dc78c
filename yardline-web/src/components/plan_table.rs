use yew::prelude::*;

use crate::format::tier_class;
use yardline_sim::Recommendation;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub recommendations: Vec<Recommendation>,
}

/// Induction recommendations, urgency-ordered by the backend.
#[function_component(PlanTable)]
pub fn plan_table(p: &Props) -> Html {
    html! {
        <table class="plan-table">
            <thead>
                <tr>
                    <th>{ "Priority" }</th>
                    <th>{ "Train" }</th>
                    <th>{ "Fitness" }</th>
                    <th>{ "Reason" }</th>
                    <th>{ "If skipped" }</th>
                </tr>
            </thead>
            <tbody>
                { for p.recommendations.iter().enumerate().map(|(index, rec)| html! {
                    <tr key={rec.train_id.to_string()}>
                        <td>{ index + 1 }</td>
                        <td>{ rec.train_id.to_string() }</td>
                        <td class={tier_class(rec.fitness_status)}>
                            { rec.fitness_status.to_string() }
                        </td>
                        <td>{ rec.reason.clone() }</td>
                        <td>{ rec.consequence_if_skipped.clone() }</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}
